mod debug_report;

use bangtown::{
    BangEntry, Context, DefaultNamespace, Options, Validation, decode_share_code, encode_share_code, parse_params,
    redirect, resolve_verbose_with, validate,
};
use std::io::{self, IsTerminal, Read};

const HOST_ENV: &str = "BANGTOWN_HOST";

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let code = match config.mode {
        Mode::Resolve { ref query } => run_resolve(&config, query),
        Mode::Encode { ref key, ref template } => {
            println!("{}", encode_share_code(&BangEntry::new(key.as_str(), bangtown::strip_scheme(template))));
            0
        }
        Mode::Decode { ref code } => match decode_share_code(code) {
            Ok(entry) => {
                println!("!{} -> https://{}", entry.key, entry.template);
                0
            }
            Err(err) => {
                eprintln!("error: {err}");
                1
            }
        },
        Mode::Validate { ref key, ref template } => {
            let registry = parse_params(&config.params).registry;
            match validate(key, template, &registry, &config.context.host) {
                Ok(Validation::Accepted) => {
                    println!("ok: !{key} can be added");
                    0
                }
                Ok(Validation::AlreadyPresent) => {
                    println!("ok: !{key} already exists with this template");
                    0
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    1
                }
            }
        }
    };
    std::process::exit(code);
}

enum Mode {
    Resolve { query: String },
    Encode { key: String, template: String },
    Decode { code: String },
    Validate { key: String, template: String },
}

struct CliConfig {
    mode: Mode,
    params: String,
    context: Context,
    options: Options,
    color: bool,
    json: bool,
    quiet: bool,
}

fn run_resolve(config: &CliConfig, query: &str) -> i32 {
    let query_string = with_query(&config.params, query);

    if config.quiet {
        let mut print = |url: &str| println!("{url}");
        return match redirect(&query_string, &config.context, &config.options, &mut print) {
            Some(_) => 0,
            None => 1,
        };
    }

    let Some(res) = resolve_verbose_with(&query_string, &config.context, &config.options) else {
        eprintln!("error: nothing to resolve");
        return 1;
    };

    if config.json {
        let out = serde_json::json!({
            "query": res.query,
            "target_url": res.resolution.target_url(),
            "resolution": res.resolution,
            "trace": res.details.trace,
            "formats": res.details.formats.labels(),
        });
        match serde_json::to_string_pretty(&out) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("error: failed to serialize result: {err}");
                return 1;
            }
        }
    } else {
        debug_report::print_run(&res, config.color);
    }
    0
}

/// Append `_q=<query>` to the custom-bang parameters.
fn with_query(params: &str, query: &str) -> String {
    let encoded: String = url::form_urlencoded::Serializer::new(String::new()).append_pair("_q", query).finish();
    let params = params.trim_start_matches('?');
    if params.is_empty() { encoded } else { format!("{params}&{encoded}") }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut query: Option<String> = None;
    let mut mode: Option<Mode> = None;
    let mut params = String::new();
    let mut context = Context::default();
    let mut options = Options::default();
    let mut color = io::stdout().is_terminal();
    let mut json = false;
    let mut quiet = false;
    let mut args = std::env::args().skip(1).peekable();

    if let Ok(host) = std::env::var(HOST_ENV) {
        if !host.trim().is_empty() {
            context.host = host.trim().to_string();
        }
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("bangtown {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "-q" | "--quiet" => quiet = true,
            "--builtin-default" => options.default_namespace = Some(DefaultNamespace::BuiltIn),
            "-p" | "--params" => params = expect_value(&mut args, "--params")?,
            "-u" | "--url" => params = query_of_url(&expect_value(&mut args, "--url")?)?,
            "--host" => context.host = expect_value(&mut args, "--host")?,
            "--fallback" => context.fallback_template = expect_value(&mut args, "--fallback")?,
            "--encode" => {
                let key = expect_value(&mut args, "--encode")?;
                let template = expect_value(&mut args, "--encode")?;
                set_mode(&mut mode, Mode::Encode { key, template })?;
            }
            "--decode" => {
                let code = expect_value(&mut args, "--decode")?;
                set_mode(&mut mode, Mode::Decode { code })?;
            }
            "--validate" => {
                let key = expect_value(&mut args, "--validate")?;
                let template = expect_value(&mut args, "--validate")?;
                set_mode(&mut mode, Mode::Validate { key, template })?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_query(&mut query, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--params=") => params = arg.trim_start_matches("--params=").to_string(),
            _ if arg.starts_with("--host=") => context.host = arg.trim_start_matches("--host=").to_string(),
            _ if arg.starts_with("--url=") => params = query_of_url(arg.trim_start_matches("--url="))?,
            // A bang query starts with '!', never with '-'.
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_query(&mut query, rest)?;
                break;
            }
        }
    }

    let mode = match mode {
        Some(mode) => {
            if query.is_some() {
                return Err("error: a query cannot be combined with --encode/--decode/--validate".to_string());
            }
            mode
        }
        None => {
            let query = match query {
                Some(value) => value,
                None => embedded_query(&params).map_or_else(read_stdin_input, Ok)?,
            };
            let query = query.trim().to_string();
            if query.is_empty() {
                return Err(format!("error: no query provided\n\n{}", help_text()));
            }
            Mode::Resolve { query }
        }
    };

    // The query travels separately; drop any `_q`/`q` that came with --url.
    let params = strip_query_params(&params);

    Ok(CliConfig { mode, params, context, options, color, json, quiet })
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn set_mode(slot: &mut Option<Mode>, mode: Mode) -> Result<(), String> {
    if slot.is_some() {
        return Err("error: only one of --encode, --decode, --validate may be given".to_string());
    }
    *slot = Some(mode);
    Ok(())
}

fn set_query(slot: &mut Option<String>, value: String) -> Result<(), String> {
    if slot.is_some() {
        return Err("error: query provided multiple times".to_string());
    }
    *slot = Some(value);
    Ok(())
}

fn query_of_url(value: &str) -> Result<String, String> {
    let url = url::Url::parse(value).map_err(|err| format!("error: invalid --url '{value}': {err}"))?;
    Ok(url.query().unwrap_or_default().to_string())
}

fn embedded_query(params: &str) -> Option<String> {
    parse_params(params).query
}

fn strip_query_params(params: &str) -> String {
    let kept =
        url::form_urlencoded::parse(params.trim_start_matches('?').as_bytes()).filter(|(k, _)| k != "_q" && k != "q");
    url::form_urlencoded::Serializer::new(String::new()).extend_pairs(kept).finish()
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "bangtown {version}

Bang-shortcut search redirector CLI.

Usage:
  bangtown [OPTIONS] [--] <query...>
  bangtown [OPTIONS] --url <redirect-url>
  bangtown --encode <key> <template>
  bangtown --decode <code>
  bangtown [OPTIONS] --validate <key> <template>

Options:
  -p, --params <string>      Custom bangs as a URL query string, e.g.
                             'mdn=developer.mozilla.org/search?q=%25s&_d=mdn'.
  -u, --url <url>            Full redirect URL; its query string is used as
                             --params and its _q/q value as the query.
  --host <domain>            Hosting domain for loop detection.
                             Default: ${host_env} or {default_host}
  --fallback <template>      External fallback engine template.
                             Default: {default_fallback}
  --builtin-default          Look up the default key in the built-in table only.
  --encode <key> <template>  Print the share code for a bang.
  --decode <code>            Decode a share code.
  --validate <key> <tmpl>    Check whether a bang could be added.
  -q, --quiet                Print only the target URL.
  --json                     Print the resolution as JSON.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Set RUST_LOG=bangtown=debug for resolution logs.

Exit codes:
  0  Success.
  1  Nothing to resolve, invalid share code, or failed validation.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        host_env = HOST_ENV,
        default_host = bangtown::DEFAULT_HOST,
        default_fallback = bangtown::DEFAULT_FALLBACK_TEMPLATE,
    )
}

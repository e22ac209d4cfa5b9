use bangtown::{DefaultNamespace, Resolution, ResolveResultVerbose, Source, display_name};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(res: &ResolveResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    let trace = &details.trace;

    println!("\n{}", palette.bold(palette.paint(format!("⚙  Resolving: \"{}\"", res.query), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Parameters ━━━", ansi::GRAY));
    println!(
        "  {} {}  {} {}",
        palette.dim("custom bangs:"),
        palette.paint(details.custom_count.to_string(), ansi::YELLOW),
        palette.dim("│ default:"),
        match (&details.default_key, details.default_namespace) {
            (Some(key), DefaultNamespace::BuiltIn) => palette.paint(format!("!{key} (built-in only)"), ansi::BLUE),
            (Some(key), DefaultNamespace::Any) => palette.paint(format!("!{key}"), ansi::BLUE),
            (None, _) => palette.dim("none"),
        }
    );
    let labels = details.formats.labels();
    if !labels.is_empty() {
        println!("  {} {}", palette.dim("formats:"), palette.paint(labels.join(", "), ansi::GRAY));
    }

    println!("\n{}", palette.paint("━━━ Query ━━━", ansi::GRAY));
    match &trace.parsed.bang_key {
        Some(key) => println!(
            "  {} {}  {} {}",
            palette.dim("bang:"),
            palette.paint(format!("!{key}"), ansi::BLUE),
            palette.dim("│ terms:"),
            palette.paint(format!("\"{}\"", trace.parsed.search_terms), ansi::YELLOW)
        ),
        None => println!(
            "  {} {}",
            palette.dim("no bang, terms:"),
            palette.paint(format!("\"{}\"", trace.parsed.search_terms), ansi::YELLOW)
        ),
    }

    println!("\n{}", palette.paint("━━━ Resolution ━━━", ansi::GRAY));
    let source = match trace.source {
        Source::Fallback => palette.paint(trace.source.name(), ansi::YELLOW),
        _ => palette.paint(trace.source.name(), ansi::GREEN),
    };
    match &trace.key {
        Some(key) => {
            let label = match trace.source {
                Source::BuiltIn => format!("!{key} ({})", display_name(key)),
                _ => format!("!{key}"),
            };
            println!(
                "  {} {}  {} {}",
                palette.dim("source:"),
                source,
                palette.dim("│ key:"),
                palette.paint(label, ansi::CYAN)
            );
        }
        None => println!("  {} {}", palette.dim("source:"), source),
    }
    if let Some(template) = &trace.template {
        println!("  {} {}", palette.dim("template:"), palette.paint(template, ansi::BLUE));
    }
    if trace.placeholder_missing {
        println!("  {}", palette.paint("⚠ template has no %s, used as-is", ansi::YELLOW));
    }

    match &res.resolution {
        Resolution::Redirect { destination_url } => {
            println!("  {} {}", palette.dim("→"), palette.bold(palette.paint(destination_url, ansi::GREEN)));
        }
        Resolution::SettingsNavigation { params } => {
            let target = res.resolution.target_url();
            println!("  {} {}", palette.dim("→"), palette.bold(palette.paint(target, ansi::GREEN)));
            for (key, value) in params {
                println!("    {} {}", palette.paint(key, ansi::BLUE), palette.dim(value));
            }
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Params: {}  │  Resolve: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.params), ansi::CYAN),
        palette.dim(format!("{:?}", details.resolve)),
    );
    println!();
}

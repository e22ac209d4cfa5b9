use crate::engine::{self, ResolveTrace};
use crate::params::{ParamFormats, parse_params};
use crate::{BangRegistry, DefaultNamespace, Resolution};
use log::debug;
use std::time::{Duration, Instant};

/// Hosting domain used for loop detection when none is configured.
pub const DEFAULT_HOST: &str = "bang.town";

/// External search engine used when nothing else matches.
pub const DEFAULT_FALLBACK_TEMPLATE: &str = "duckduckgo.com/?q=%s";

/// Environment the redirector runs in.
#[derive(Debug, Clone)]
pub struct Context {
    /// Domain serving the redirect page; bangs pointing here are rejected as loops.
    pub host: String,
    /// Template for the external fallback engine (scheme-less, one `%s`).
    pub fallback_template: String,
}

impl Default for Context {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), fallback_template: DEFAULT_FALLBACK_TEMPLATE.to_string() }
    }
}

/// Options that affect resolution.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Force the namespace used for the default key, ignoring `_b`.
    pub default_namespace: Option<DefaultNamespace>,
}

/// Performs the actual navigation (browser, HTTP redirect, stdout, ...).
pub trait Navigator {
    fn navigate_to(&mut self, url: &str);
}

impl<F: FnMut(&str)> Navigator for F {
    fn navigate_to(&mut self, url: &str) {
        self(url)
    }
}

/// Result from [`resolve_with`].
#[derive(Debug, Clone)]
pub struct ResolveResult {
    /// The query text that was resolved (decoded).
    pub query: String,
    pub resolution: Resolution,
    /// Total elapsed time spent parsing parameters and resolving.
    pub elapsed: Duration,
}

/// Extra details returned by [`resolve_verbose_with`].
#[derive(Debug, Clone)]
pub struct ResolveDetails {
    pub total: Duration,
    /// Time spent in the compatibility layer.
    pub params: Duration,
    /// Time spent in the resolver.
    pub resolve: Duration,
    pub formats: ParamFormats,
    /// Number of custom bangs in the request.
    pub custom_count: usize,
    pub default_key: Option<String>,
    pub default_namespace: DefaultNamespace,
    pub trace: ResolveTrace,
}

/// Result from [`resolve_verbose_with`].
#[derive(Debug, Clone)]
pub struct ResolveResultVerbose {
    pub query: String,
    pub resolution: Resolution,
    pub elapsed: Duration,
    pub details: ResolveDetails,
}

/// Resolve `raw_query` against `registry` with the default fallback engine.
///
/// `raw_query` should be non-empty; entry points filter absent queries
/// before calling this.
///
/// # Example
/// ```
/// use bangtown::{BangRegistry, resolve};
///
/// let registry = BangRegistry::with_builtins(Default::default());
/// let res = resolve("!g cats", &registry);
/// assert_eq!(res.destination_url(), Some("https://www.google.com/search?q=cats"));
/// ```
pub fn resolve(raw_query: &str, registry: &BangRegistry) -> Resolution {
    engine::resolve_query(raw_query, registry, DEFAULT_FALLBACK_TEMPLATE).0
}

/// Parse a redirect query string and resolve the query it carries.
///
/// Returns `None` when the string has no query (`_q`/`q` absent or blank).
pub fn resolve_with(query_string: &str, context: &Context, options: &Options) -> Option<ResolveResult> {
    let run = run(query_string, context, options)?;
    Some(ResolveResult { query: run.query, resolution: run.resolution, elapsed: run.details.total })
}

/// Like [`resolve_with`] but also returns the resolution trace and timings.
pub fn resolve_verbose_with(query_string: &str, context: &Context, options: &Options) -> Option<ResolveResultVerbose> {
    run(query_string, context, options)
}

/// Redirect entry point: resolve and hand the target URL to `navigator`.
///
/// An absent query is a no-op and returns `None`.
pub fn redirect<N: Navigator + ?Sized>(
    query_string: &str,
    context: &Context,
    options: &Options,
    navigator: &mut N,
) -> Option<Resolution> {
    let result = resolve_with(query_string, context, options)?;
    navigator.navigate_to(&result.resolution.target_url());
    Some(result.resolution)
}

fn run(query_string: &str, context: &Context, options: &Options) -> Option<ResolveResultVerbose> {
    let start = Instant::now();

    let mut parsed = parse_params(query_string);
    let params_elapsed = start.elapsed();

    let query = match parsed.query.take() {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            debug!("no query in request, nothing to resolve");
            return None;
        }
    };

    if let Some(ns) = options.default_namespace {
        parsed.registry.default_namespace = ns;
    }

    let resolve_start = Instant::now();
    let (resolution, trace) = engine::resolve_query(&query, &parsed.registry, &context.fallback_template);
    let resolve_elapsed = resolve_start.elapsed();
    let total = start.elapsed();

    let details = ResolveDetails {
        total,
        params: params_elapsed,
        resolve: resolve_elapsed,
        formats: parsed.formats,
        custom_count: parsed.registry.custom.len(),
        default_key: parsed.registry.default_key.clone(),
        default_namespace: parsed.registry.default_namespace,
        trace,
    };

    Some(ResolveResultVerbose { query, resolution, elapsed: total, details })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;

    #[test]
    fn resolve_with_reads_query_and_custom_bangs() {
        let query_string = "mdn=developer.mozilla.org/search?q=%25s&_q=!mdn+grid";
        let res = resolve_with(query_string, &Context::default(), &Options::default()).unwrap();
        assert_eq!(res.query, "!mdn grid");
        assert_eq!(res.resolution.destination_url(), Some("https://developer.mozilla.org/search?q=grid"));
        assert!(res.elapsed >= Duration::ZERO);
    }

    #[test]
    fn absent_or_blank_query_is_noop() {
        let ctx = Context::default();
        assert!(resolve_with("g=x.test", &ctx, &Options::default()).is_none());
        assert!(resolve_with("_q=+++", &ctx, &Options::default()).is_none());
    }

    #[test]
    fn custom_fallback_template() {
        let ctx = Context { fallback_template: "search.example/?q=%s".into(), ..Context::default() };
        let res = resolve_with("_q=plain+words", &ctx, &Options::default()).unwrap();
        assert_eq!(res.resolution.destination_url(), Some("https://search.example/?q=plain+words"));
    }

    #[test]
    fn option_overrides_namespace_flag() {
        let opts = Options { default_namespace: Some(DefaultNamespace::BuiltIn) };
        let res = resolve_with("g=mine.test/?q=%25s&_d=g&_q=cats", &Context::default(), &opts).unwrap();
        assert_eq!(res.resolution.destination_url(), Some("https://www.google.com/search?q=cats"));
    }

    #[test]
    fn verbose_includes_trace() {
        let res = resolve_verbose_with("_q=!w+rust", &Context::default(), &Options::default()).unwrap();
        assert_eq!(res.details.trace.source, Source::BuiltIn);
        assert_eq!(res.details.trace.key.as_deref(), Some("w"));
        assert_eq!(res.elapsed, res.details.total);
        assert!(res.details.resolve <= res.details.total);
        assert!(res.details.formats.contains(ParamFormats::QUERY));
    }

    #[test]
    fn redirect_navigates_once() {
        let mut visited = Vec::new();
        let mut nav = |url: &str| visited.push(url.to_string());
        let res = redirect("q=!gh+bangtown", &Context::default(), &Options::default(), &mut nav);
        assert!(res.is_some());
        assert_eq!(visited, ["https://github.com/search?q=bangtown"]);
    }

    #[test]
    fn redirect_without_query_does_not_navigate() {
        let mut visited: Vec<String> = Vec::new();
        let mut nav = |url: &str| visited.push(url.to_string());
        assert!(redirect("", &Context::default(), &Options::default(), &mut nav).is_none());
        assert!(visited.is_empty());
    }
}

use crate::{BangRegistry, Context, Options, Resolution, resolve, resolve_with};
use std::collections::HashMap;

#[test]
fn redirect_scenarios() {
    // (expected destination, redirect query string)
    let cases: Vec<(&str, &str)> = vec![
        ("https://www.google.com/search?q=cats", "_q=!g+cats"),
        ("https://duckduckgo.com/?q=hello+world", "_q=hello+world"),
        ("https://duckduckgo.com/?q=hello+world", "q=hello+world"),
        ("https://en.wikipedia.org/w/index.php?search=rust+lang", "_d=w&_q=rust+lang"),
        ("https://en.wikipedia.org/w/index.php?search=rust+lang", "default=w&q=rust+lang"),
        ("https://mine.test/?q=cats", "g=mine.test%2F%3Fq%3D%25s&_q=!g+cats"),
        ("https://mine.test/?q=cats", "g=mine.test%2F%3Fq%3D%25s&_d=g&_q=cats"),
        ("https://www.google.com/search?q=cats", "g=mine.test%2F%3Fq%3D%25s&_d=g&_b=1&_q=cats"),
        (
            "https://www.google.com/search?q=cats+and+dogs",
            "g=https%3A%2F%2Fwww.google.com%2Fsearch%3Fq%3D&_q=!g+cats+and+dogs",
        ),
        ("https://duckduckgo.com/?q=%21unknown+thing", "_q=!unknown+thing"),
        ("https://duckduckgo.com/?q=%21G+cats", "_q=!G+cats"),
        ("https://www.youtube.com/results?search_query=", "_q=!yt"),
        ("https://github.com/search?q=a%26b%3Dc", "_q=!gh+a%26b%3Dc"),
        ("https://duckduckgo.com/?q=no+default", "_d=missing&_q=no+default"),
        ("https://duckduckgo.com/?q=cats", "_q=&q=cats"),
    ];

    let ctx = Context::default();
    let opts = Options::default();

    for (expected, query_string) in cases {
        let res = resolve_with(query_string, &ctx, &opts)
            .unwrap_or_else(|| panic!("no resolution for '{query_string}'"));
        assert_eq!(
            res.resolution.destination_url(),
            Some(expected),
            "query string '{query_string}' resolved to {:?}",
            res.resolution
        );
    }
}

#[test]
fn settings_carries_forward_custom_params_only() {
    let res = resolve_with(
        "g=mine.test%2F%3Fq%3D%25s&_q=%21settings&yt=tube.test%2F%3Fq%3D%25s",
        &Context::default(),
        &Options::default(),
    )
    .unwrap();

    let Resolution::SettingsNavigation { params } = res.resolution else {
        panic!("expected settings navigation");
    };
    let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["g", "yt"]);
}

#[test]
fn settings_forwards_a_repeated_name_once() {
    let query_string = "g=a.test%2F%3Fq%3D%25s&g=b.test%2F%3Fq%3D%25s&_q=!settings";
    let res = resolve_with(query_string, &Context::default(), &Options::default()).unwrap();
    assert_eq!(res.resolution.target_url(), "/?g=a.test%2F%3Fq%3D%25s");
}

#[test]
fn custom_always_beats_builtin_for_every_builtin_key() {
    let custom: HashMap<String, String> =
        crate::builtins().iter().map(|b| (b.key.to_string(), format!("override.test/{}?q=%s", b.key))).collect();
    let registry = BangRegistry::with_builtins(custom);

    for b in crate::builtins() {
        let res = resolve(&format!("!{} x", b.key), &registry);
        assert_eq!(res.destination_url(), Some(format!("https://override.test/{}?q=x", b.key).as_str()));
    }
}

#[test]
fn non_bang_query_uses_default_template() {
    let registry = BangRegistry::with_builtins(HashMap::new()).default_key("so");
    for q in ["borrow checker", "what is 1+1?", "naïve café"] {
        let expected = crate::substitute("https://stackoverflow.com/search?q=%s", &crate::encode_term(q)).unwrap();
        assert_eq!(resolve(q, &registry).destination_url(), Some(expected.as_str()));
    }
}

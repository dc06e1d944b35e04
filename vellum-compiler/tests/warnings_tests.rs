use std::sync::{Arc, Mutex};
use std::thread;

use pretty_assertions::assert_eq;
use vellum_compiler::{Child, Delimiters, ParseError, ParserOptions, Warning, parse};

#[test_log::test]
fn multiple_roots_warn_once_and_keep_first() {
    let out = parse("<div>a</div><p>b</p><span>c</span>", &ParserOptions::default()).unwrap();
    let multiple: Vec<_> = out
        .warnings
        .iter()
        .filter(|w| **w == Warning::MultipleRoots)
        .collect();
    assert_eq!(multiple.len(), 1);
    assert_eq!(out.template.root().unwrap().tag, "div");
    assert_eq!(out.template.root().unwrap().children.len(), 1);
}

#[test_log::test]
fn content_outside_root_is_dropped() {
    let out = parse("<div></div>tail", &ParserOptions::default()).unwrap();
    assert_eq!(
        out.warnings,
        vec![Warning::ContentOutsideElement {
            text: "tail".into()
        }]
    );
    assert!(out.template.root().unwrap().children.is_empty());
}

#[test_log::test]
fn executable_scripts_and_styles_are_forbidden() {
    for tpl in [
        "<div><script>var x=1;</script></div>",
        r#"<div><script type="text/javascript">var x=1;</script></div>"#,
        "<div><style>.a{}</style></div>",
    ] {
        let out = parse(tpl, &ParserOptions::default()).unwrap();
        let t = &out.template;
        assert!(t.root().unwrap().children.is_empty(), "{tpl}");
        assert!(t.iter().any(|(_, el)| el.forbidden), "{tpl}");
        assert!(
            matches!(out.warnings.as_slice(), [Warning::ForbiddenTag { .. }]),
            "{tpl}"
        );
    }
}

#[test_log::test]
fn template_scripts_are_allowed() {
    let out = parse(
        r#"<div><script type="text/x-template"><p>{{ a }}</p></script></div>"#,
        &ParserOptions::default(),
    )
    .unwrap();
    let t = &out.template;
    assert!(out.warnings.is_empty());
    let script_id = t.root().unwrap().children[0].element().unwrap();
    assert!(!t[script_id].forbidden);
    // the body is one text run, never tokenized into elements
    assert_eq!(t[script_id].children.len(), 1);
    assert!(!matches!(t[script_id].children[0], Child::Element { .. }));
}

#[test_log::test]
fn warn_handler_sees_every_warning() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = ParserOptions::default().with_warn(move |w| {
        sink.lock().unwrap().push(w.to_string());
    });
    let out = parse(r#"<div id="a" id="b"></div><p></p>"#, &options).unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), out.warnings.len());
    assert_eq!(seen[0], "duplicate attribute: id");
    assert_eq!(
        seen[1],
        "Component template should contain exactly one root element."
    );
}

#[test_log::test]
fn empty_delimiters_are_rejected() {
    assert!(Delimiters::new("", "}}").is_err());
    let mut options = ParserOptions::default();
    options.delimiters = Some(Delimiters {
        open: "[[".into(),
        close: String::new(),
    });
    assert_eq!(
        parse("<div></div>", &options).unwrap_err(),
        ParseError::InvalidDelimiters {
            open: "[[".into(),
            close: String::new(),
        }
    );
}

#[test_log::test]
fn custom_delimiters_apply_to_text_and_attributes() {
    let options = ParserOptions::default().with_delimiters(Delimiters::new("[[", "]]").unwrap());
    let out = parse(r#"<div title="[[ t ]]">[[ a ]] {{ b }}</div>"#, &options).unwrap();
    let root = out.template.root().unwrap();
    let expression = root.children[0].expression().unwrap();
    assert_eq!(expression.bindings().count(), 1);
    assert_eq!(expression.bindings().next().unwrap().expression, "a");
    assert_eq!(out.warnings.len(), 1);
}

#[test_log::test]
fn concurrent_parses_share_options() {
    let options = Arc::new(ParserOptions::default().with_preserve_whitespace(false));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let options = Arc::clone(&options);
            thread::spawn(move || {
                let tpl = format!("<ul>{}</ul>", "<li>{{ x }}</li>\n".repeat(i + 1));
                let out = parse(&tpl, &options).unwrap();
                out.template.root().unwrap().children.len()
            })
        })
        .collect();
    let counts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![1, 2, 3, 4]);
}

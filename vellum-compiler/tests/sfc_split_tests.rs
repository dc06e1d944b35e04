use pretty_assertions::assert_eq;
use vellum_compiler::{ParserOptions, parse, parse_component};

#[test_log::test]
fn splits_basic_component() {
    let src = r#"
<!-- counter component -->
<template id="root">
  <div class="app">{{ count }}</div>
</template>
<script lang="ts">
  export default { data: () => ({ count: 0 }) }
</script>
<style scoped>
  .app { color: red; }
</style>
<style>
  body { margin: 0; }
</style>
"#;

    let component = parse_component(src).expect("parse ok");
    let tpl = component.template.expect("template");
    assert!(tpl.content.contains("{{ count }}"));
    assert_eq!(tpl.attr("id"), Some("root"));

    let script = component.script.expect("script");
    assert_eq!(script.lang(), Some("ts"));
    assert!(script.content.contains("export default"));

    assert_eq!(component.styles.len(), 2);
    assert!(component.styles[0].scoped);
    assert!(component.styles[0].block.content.contains(".app"));
    assert!(!component.styles[1].scoped);
}

#[test_log::test]
fn nested_templates_stay_in_the_body() {
    let src = r#"<template><div><template v-if="ok"><p>a</p></template><template v-else>b</template></div></template>"#;
    let component = parse_component(src).unwrap();
    let content = component.template.unwrap().content;
    assert_eq!(
        content,
        r#"<div><template v-if="ok"><p>a</p></template><template v-else>b</template></div>"#
    );

    let out = parse(content.trim(), &ParserOptions::default()).unwrap();
    let t = &out.template;
    let root = t.root_id().unwrap();
    let first = t[root].children[0].element().unwrap();
    assert_eq!(t[first].tag, "template");
    assert!(t[first].else_block.is_some());
}

#[test_log::test]
fn template_only_component() {
    let component = parse_component("<template><p>x</p></template>\n").unwrap();
    assert!(component.script.is_none());
    assert!(component.styles.is_empty());
    assert_eq!(component.template.unwrap().content, "<p>x</p>");
}

#[test_log::test]
fn garbage_is_an_error() {
    let err = parse_component("<template><p>unterminated").unwrap_err();
    assert!(err.to_string().starts_with("invalid component file"));
}

#[test_log::test]
fn blank_file_has_no_blocks() {
    for src in ["", "  \n", "<!-- nothing here -->\n"] {
        assert_eq!(parse_component(src).unwrap(), Default::default());
    }
}

use pretty_assertions::assert_eq;
use vellum_compiler::{
    Binding, Modifiers, ParserOptions, RenderCall, TransitionValue, Warning, parse,
};

fn root_of(tpl: &str) -> (vellum_compiler::Element, Vec<Warning>) {
    let out = parse(tpl, &ParserOptions::default()).unwrap();
    (out.template.root().unwrap().clone(), out.warnings)
}

#[test_log::test]
fn parse_attrs_static_bind_event() {
    let (el, warnings) = root_of(r#"<input class="x" :title="label" @input="onInput"/>"#);
    assert!(warnings.is_empty());
    assert_eq!(el.static_class.as_deref(), Some("\"x\""));
    assert_eq!(el.attr("title"), Some("label"));
    let handler = el.handler("input").expect("input handler");
    assert_eq!(handler.value, "onInput");
    assert!(handler.modifiers.is_empty());
    assert!(!el.plain);
}

#[test_log::test]
fn static_and_dynamic_class() {
    let (el, _) = root_of(r#"<div class="foo" :class="bar"></div>"#);
    assert_eq!(el.static_class.as_deref(), Some("\"foo\""));
    assert_eq!(el.class_binding.as_deref(), Some("bar"));
    assert!(el.attrs.is_empty());
}

#[test_log::test]
fn style_binding_long_form() {
    let (el, _) = root_of(r#"<div v-bind:style="{ color: c }" style="x"></div>"#);
    assert_eq!(el.style_binding.as_deref(), Some("{ color: c }"));
    // a static style is just another literal attribute
    assert_eq!(el.static_attr("style"), Some("\"x\""));
}

#[test_log::test]
fn interpolation_in_class_is_deprecated() {
    let (el, warnings) = root_of(r#"<div class="a {{ b }}"></div>"#);
    assert_eq!(
        warnings,
        vec![Warning::InterpolationInAttribute {
            name: "class".into(),
            value: "a {{ b }}".into(),
        }]
    );
    assert_eq!(el.static_class.as_deref(), Some("\"a {{ b }}\""));
}

#[test_log::test]
fn interpolation_in_literal_attribute_is_deprecated() {
    let (el, warnings) = root_of(r#"<a href="/u/{{ id }}"></a>"#);
    assert_eq!(warnings.len(), 1);
    assert_eq!(el.static_attr("href"), Some("\"/u/{{ id }}\""));
}

#[test_log::test]
fn event_modifiers() {
    let (el, _) = root_of(r#"<button @click.stop.prevent="handler" v-on:keyup.enter="go"></button>"#);
    let click = el.handler("click").unwrap();
    assert_eq!(click.value, "handler");
    assert_eq!(click.modifiers, ["stop", "prevent"].into_iter().collect::<Modifiers>());
    assert!(click.modifiers.contains("stop"));
    assert!(click.modifiers.contains("prevent"));
    assert!(el.handler("keyup").unwrap().modifiers.contains("enter"));
}

#[test_log::test]
fn dom_props_versus_attrs() {
    let (el, _) = root_of(r#"<input :value="v" :placeholder="p">"#);
    assert_eq!(el.prop("value"), Some("v"));
    assert_eq!(el.attr("placeholder"), Some("p"));
    assert_eq!(el.prop("placeholder"), None);
}

#[test_log::test]
fn custom_directives() {
    let (el, _) = root_of(r#"<div v-model.lazy="msg" v-tooltip:top="tip" v-show="ok"></div>"#);
    let model = el.directive("model").unwrap();
    assert_eq!(model.value, "msg");
    assert!(model.modifiers.contains("lazy"));
    assert_eq!(model.arg, None);
    let tooltip = el.directive("tooltip").unwrap();
    assert_eq!(tooltip.arg.as_deref(), Some("top"));
    assert_eq!(el.directive("show").unwrap().value, "ok");
}

#[test_log::test]
fn literal_attributes_are_quoted() {
    let (el, _) = root_of(r#"<div id="app" data-x='say "hi"' hidden></div>"#);
    assert_eq!(
        el.static_attrs,
        vec![
            Binding {
                name: "id".into(),
                value: "\"app\"".into()
            },
            Binding {
                name: "data-x".into(),
                value: r#""say \"hi\"""#.into()
            },
            Binding {
                name: "hidden".into(),
                value: "\"\"".into()
            },
        ]
    );
}

#[test_log::test]
fn duplicate_attributes_last_write_wins() {
    let (el, warnings) = root_of(r#"<div id="a" id="b"></div>"#);
    assert_eq!(warnings, vec![Warning::DuplicateAttribute { name: "id".into() }]);
    assert_eq!(el.attrs_map.get("id").map(String::as_str), Some("b"));
    assert_eq!(el.attrs_raw.len(), 2);
}

#[test_log::test]
fn render_marker() {
    let (el, warnings) = root_of(r#"<render :method="draw" :args="[a, b]"></render>"#);
    assert!(warnings.is_empty());
    assert_eq!(
        el.render,
        Some(RenderCall {
            method: Some("draw".into()),
            args: Some("[a, b]".into()),
        })
    );
}

#[test_log::test]
fn render_marker_diagnostics() {
    let (_, warnings) = root_of(r#"<render method="draw" args="x"></render>"#);
    assert_eq!(
        warnings,
        vec![Warning::RenderMethodStatic, Warning::RenderArgsStatic]
    );
    let (el, warnings) = root_of(r#"<render></render>"#);
    assert_eq!(warnings, vec![Warning::RenderMethodMissing]);
    assert_eq!(el.render, Some(RenderCall::default()));
}

#[test_log::test]
fn render_marker_and_slot_target_coexist() {
    let (el, _) = root_of(r#"<render :method="m" slot="header"></render>"#);
    assert!(el.render.is_some());
    assert_eq!(el.slot_target.as_deref(), Some("\"header\""));
}

#[test_log::test]
fn slots() {
    let (el, _) = root_of(r#"<slot name="footer"></slot>"#);
    assert_eq!(el.slot_name.as_deref(), Some("\"footer\""));
    let (el, _) = root_of(r#"<slot :name="dyn"></slot>"#);
    assert_eq!(el.slot_name.as_deref(), Some("dyn"));
    let (el, _) = root_of(r#"<p :slot="which"></p>"#);
    assert_eq!(el.slot_target.as_deref(), Some("which"));
}

#[test_log::test]
fn dynamic_component_and_inline_template() {
    let (el, _) = root_of(r#"<component :is="view" inline-template></component>"#);
    assert_eq!(el.component.as_deref(), Some("view"));
    assert!(el.inline_template);
    let (el, _) = root_of(r#"<component is="fixed"></component>"#);
    assert_eq!(el.component.as_deref(), Some("\"fixed\""));
}

#[test_log::test]
fn transitions() {
    let (el, _) = root_of(r#"<div transition></div>"#);
    let transition = el.transition.unwrap();
    assert_eq!(transition.value, TransitionValue::Default);
    assert!(!transition.on_appear);

    let (el, _) = root_of(r#"<div :transition="name" transition-on-appear></div>"#);
    let transition = el.transition.unwrap();
    assert_eq!(transition.value, TransitionValue::Binding("name".into()));
    assert!(transition.on_appear);
    assert!(el.static_attrs.is_empty());
}

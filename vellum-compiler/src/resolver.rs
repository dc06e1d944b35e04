use crate::diagnostics::{Diagnostics, Warning};
use crate::directive::{self, AttrName};
use crate::options::Delimiters;
use crate::platform::Platform;
use crate::template_ast::{
    Attr, Binding, Directive, Element, ForLoop, Handler, RenderCall, Transition, TransitionValue,
};
use crate::text::{parse_text, quote};

/// Attributes of one element that have not been claimed yet.
#[derive(Debug, Clone, Default)]
pub(crate) struct AttrList(Vec<Attr>);

impl AttrList {
    pub fn new(attrs: Vec<Attr>) -> Self {
        Self(attrs)
    }

    /// Removes every attribute called `name` and returns the last value.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let mut found = None;
        self.0.retain(|a| {
            if a.name == name {
                found = Some(a.value.clone());
                false
            } else {
                true
            }
        });
        found
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Attr> {
        self.0
    }

    /// `:name`, then `v-bind:name`; with `get_static`, falls back to the
    /// plain attribute as a quoted literal.
    pub fn take_binding(&mut self, name: &str, get_static: bool) -> Option<String> {
        let dynamic = match self.take(&format!(":{name}")) {
            Some(value) if !value.is_empty() => Some(value),
            _ => self.take(&format!("v-bind:{name}")),
        };
        if dynamic.is_some() {
            return dynamic;
        }
        if get_static {
            self.take(name).map(|value| quote(&value))
        } else {
            None
        }
    }
}

/// Turns the raw attributes of a freshly opened element into annotations.
pub(crate) struct Resolver<'p, 'd, 'w> {
    pub platform: &'p dyn Platform,
    pub delimiters: &'p Delimiters,
    pub diagnostics: &'d mut Diagnostics<'w>,
}

impl Resolver<'_, '_, '_> {
    /// Inside a raw-passthrough region, or on a `v-pre` element, attribute
    /// values are only quoted. Everything else runs the claims in a fixed
    /// order; later steps only see what earlier ones left behind.
    pub fn resolve(&mut self, el: &mut Element, in_raw_region: bool) {
        let mut attrs = AttrList::new(el.attrs_raw.clone());

        if !in_raw_region && attrs.take("v-pre").is_some() {
            el.pre = true;
        }
        if in_raw_region || el.pre {
            el.raw_passthrough = true;
            process_raw_attrs(el, attrs);
            return;
        }

        self.process_for(el, &mut attrs);
        process_if(el, &mut attrs);
        process_once(el, &mut attrs);
        el.plain = el.for_loop.as_ref().is_none_or(|f| f.key.is_none()) && attrs.is_empty();
        self.process_render(el);
        process_slot(el, &mut attrs);
        process_component(el, &mut attrs);
        self.process_class_binding(el, &mut attrs);
        el.style_binding = attrs.take_binding("style", false).filter(|v| !v.is_empty());
        process_transition(el, &mut attrs);
        self.process_attrs(el, attrs);
    }

    fn process_for(&mut self, el: &mut Element, attrs: &mut AttrList) {
        let Some(exp) = attrs.take("v-for").filter(|v| !v.is_empty()) else {
            return;
        };
        let Some(parsed) = directive::parse_for(&exp) else {
            self.diagnostics.warn(Warning::InvalidFor { expression: exp });
            return;
        };
        el.for_loop = Some(ForLoop {
            expression: parsed.expression,
            alias: parsed.alias,
            iterator: parsed.iterator,
            key: attrs.take("track-by").filter(|v| !v.is_empty()),
        });
    }

    fn process_render(&mut self, el: &mut Element) {
        if el.tag != "render" {
            return;
        }
        let binding = |name: &str| {
            el.attrs_map
                .get(&format!(":{name}"))
                .filter(|v| !v.is_empty())
                .or_else(|| el.attrs_map.get(&format!("v-bind:{name}")))
                .cloned()
        };
        let render = RenderCall {
            method: binding("method"),
            args: binding("args"),
        };
        if el.attrs_map.contains_key("method") {
            self.diagnostics.warn(Warning::RenderMethodStatic);
        } else if render.method.is_none() {
            self.diagnostics.warn(Warning::RenderMethodMissing);
        }
        if el.attrs_map.contains_key("args") {
            self.diagnostics.warn(Warning::RenderArgsStatic);
        }
        el.render = Some(render);
    }

    fn process_class_binding(&mut self, el: &mut Element, attrs: &mut AttrList) {
        if let Some(class) = attrs.take("class") {
            self.check_interpolation("class", &class);
            el.static_class = Some(quote(&class));
        }
        el.class_binding = attrs.take_binding("class", false).filter(|v| !v.is_empty());
    }

    fn process_attrs(&mut self, el: &mut Element, attrs: AttrList) {
        for Attr { name, value } in attrs.into_inner() {
            match directive::classify(&name) {
                AttrName::Bind { name } => {
                    let binding = Binding { name, value };
                    if self.platform.must_use_prop(&el.tag, &binding.name) {
                        el.props.push(binding);
                    } else {
                        el.attrs.push(binding);
                    }
                }
                AttrName::On { event, modifiers } => el.handlers.push(Handler {
                    event,
                    value,
                    modifiers,
                }),
                AttrName::Directive {
                    name,
                    arg,
                    modifiers,
                } => el.directives.push(Directive {
                    name,
                    value,
                    arg,
                    modifiers,
                }),
                AttrName::Literal => {
                    self.check_interpolation(&name, &value);
                    el.static_attrs.push(Binding {
                        value: quote(&value),
                        name,
                    });
                }
            }
        }
    }

    fn check_interpolation(&mut self, name: &str, value: &str) {
        if parse_text(value, self.delimiters).is_some() {
            self.diagnostics.warn(Warning::InterpolationInAttribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }
}

fn process_raw_attrs(el: &mut Element, attrs: AttrList) {
    el.attrs = attrs
        .into_inner()
        .into_iter()
        .map(|a| Binding {
            value: quote(&a.value),
            name: a.name,
        })
        .collect();
}

fn process_if(el: &mut Element, attrs: &mut AttrList) {
    el.if_expr = attrs.take("v-if").filter(|v| !v.is_empty());
    if attrs.take("v-else").is_some() {
        el.is_else = true;
    }
}

fn process_once(el: &mut Element, attrs: &mut AttrList) {
    if attrs.take("v-once").is_some() {
        el.once = true;
    }
}

fn process_slot(el: &mut Element, attrs: &mut AttrList) {
    if el.tag == "slot" {
        el.slot_name = attrs.take_binding("name", true);
    } else if let Some(target) = attrs.take_binding("slot", true).filter(|v| !v.is_empty()) {
        el.slot_target = Some(target);
    }
}

fn process_component(el: &mut Element, attrs: &mut AttrList) {
    el.component = attrs.take_binding("is", true).filter(|v| !v.is_empty());
    if attrs.take("inline-template").is_some() {
        el.inline_template = true;
    }
}

fn process_transition(el: &mut Element, attrs: &mut AttrList) {
    let value = match attrs.take_binding("transition", true) {
        Some(v) if v == "\"\"" => TransitionValue::Default,
        Some(v) if !v.is_empty() => TransitionValue::Binding(v),
        _ => return,
    };
    el.transition = Some(Transition {
        value,
        on_appear: attrs.take_binding("transition-on-appear", true).is_some(),
    });
}

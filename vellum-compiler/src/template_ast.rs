use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Index, IndexMut};

use serde::Serialize;

use crate::text::TextExpression;

/// Index of an element inside a [`Template`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A raw `name="value"` pair as written in the source. Valueless attributes
/// carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Child {
    Element { id: ElementId },
    Text { text: String },
    Expression { expression: TextExpression },
}

impl Child {
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Child::Element { id } => Some(*id),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Child::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn expression(&self) -> Option<&TextExpression> {
        match self {
            Child::Expression { expression } => Some(expression),
            _ => None,
        }
    }
}

/// `v-for="alias in expression"`, `v-for="(alias, iterator) of expression"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForLoop {
    pub expression: String,
    pub alias: String,
    pub iterator: Option<String>,
    /// `track-by` key used for stable identity across iterations.
    pub key: Option<String>,
}

/// Boolean flags chained onto a directive name, e.g. `.stop.prevent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers(BTreeSet<String>);

impl Modifiers {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Modifiers {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A resolved `name → value` pair. Depending on the list it lives in, the
/// value is either an expression or a quoted literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handler {
    pub event: String,
    pub value: String,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub name: String,
    pub value: String,
    pub arg: Option<String>,
    pub modifiers: Modifiers,
}

/// The `<render :method="..." :args="...">` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderCall {
    pub method: Option<String>,
    pub args: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TransitionValue {
    /// `transition` given without a value.
    Default,
    Binding(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub value: TransitionValue,
    pub on_appear: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    pub attrs_raw: Vec<Attr>,
    pub attrs_map: BTreeMap<String, String>,
    pub parent: Option<ElementId>,
    pub children: Vec<Child>,
    pub namespace: Option<String>,

    pub for_loop: Option<ForLoop>,
    pub if_expr: Option<String>,
    pub is_else: bool,
    pub else_block: Option<ElementId>,
    pub once: bool,
    /// No key and no attributes left after the control-flow directives.
    pub plain: bool,
    pub render: Option<RenderCall>,
    pub slot_name: Option<String>,
    pub slot_target: Option<String>,
    pub component: Option<String>,
    pub inline_template: bool,
    pub static_class: Option<String>,
    pub class_binding: Option<String>,
    pub style_binding: Option<String>,
    pub transition: Option<Transition>,
    pub props: Vec<Binding>,
    pub attrs: Vec<Binding>,
    pub static_attrs: Vec<Binding>,
    pub handlers: Vec<Handler>,
    pub directives: Vec<Directive>,

    pub forbidden: bool,
    pub pre: bool,
    pub raw_passthrough: bool,

    // Filled in by an optimizer, never by the parser.
    pub is_static: bool,
    pub static_root: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>, attrs_raw: Vec<Attr>, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.into(),
            attrs_raw,
            parent,
            ..Default::default()
        }
    }

    pub fn handler(&self, event: &str) -> Option<&Handler> {
        self.handlers.iter().find(|h| h.event == event)
    }

    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn static_attr(&self, name: &str) -> Option<&str> {
        self.static_attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn prop(&self, name: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// Arena holding every element created during a parse.
///
/// Elements that never got linked (forbidden tags, extra roots) stay in the
/// arena but are unreachable from [`Template::root`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Template {
    pub(crate) elements: Vec<Element>,
    pub(crate) root: Option<ElementId>,
}

impl Template {
    pub fn root_id(&self) -> Option<ElementId> {
        self.root
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.map(|id| &self.elements[id.0])
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, el)| (ElementId(i), el))
    }

    pub fn parent(&self, id: ElementId) -> Option<&Element> {
        self.elements[id.0].parent.map(|p| &self.elements[p.0])
    }

    pub fn child_elements(&self, id: ElementId) -> impl Iterator<Item = &Element> {
        self.elements[id.0]
            .children
            .iter()
            .filter_map(Child::element)
            .map(|c| &self.elements[c.0])
    }

    /// Every element reachable below `id`, through children and `v-else`
    /// branches, in document order.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.branches(id).collect();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let start = stack.len();
            stack.extend(self.branches(next));
            stack[start..].reverse();
        }
        out
    }

    /// Child elements of `id`, each followed by its `v-else` chain.
    fn branches(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.elements[id.0]
            .children
            .iter()
            .filter_map(Child::element)
            .flat_map(move |child| {
                std::iter::successors(Some(child), move |prev| self.elements[prev.0].else_block)
            })
    }

    pub(crate) fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }
}

impl Index<ElementId> for Template {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }
}

impl IndexMut<ElementId> for Template {
    fn index_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }
}

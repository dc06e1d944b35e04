use serde::Serialize;

use crate::diagnostics::{Diagnostics, Warning};
use crate::directive::{hyphenate, is_camel_case};
use crate::error::ParseError;
use crate::html::{self, TokenSink};
use crate::options::{Delimiters, ParserOptions};
use crate::resolver::Resolver;
use crate::template_ast::{Attr, Child, Element, ElementId, Template};
use crate::text::parse_text;

/// The annotated tree plus every warning raised while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    pub template: Template,
    pub warnings: Vec<Warning>,
}

/// Parses a template (already trimmed by the caller) into an annotated
/// element tree.
///
/// Malformed markup never fails the parse; it is reported through the
/// returned warnings and the configured warn handler. The only error is an
/// unusable configuration.
pub fn parse(template: &str, options: &ParserOptions) -> Result<ParseOutput, ParseError> {
    let delimiters = options.resolved_delimiters()?;
    let mut builder = TreeBuilder {
        options,
        delimiters: &delimiters,
        template: Template::default(),
        stack: Vec::new(),
        in_pre: false,
        warned_roots: false,
        warned_outside: false,
        diagnostics: Diagnostics::new(options.warn.as_ref()),
    };
    html::tokenize(
        template,
        options.platform.as_ref(),
        options.expect_html,
        &mut builder,
    );
    Ok(builder.finish())
}

struct TreeBuilder<'a> {
    options: &'a ParserOptions,
    delimiters: &'a Delimiters,
    template: Template,
    stack: Vec<ElementId>,
    in_pre: bool,
    warned_roots: bool,
    warned_outside: bool,
    diagnostics: Diagnostics<'a>,
}

impl TreeBuilder<'_> {
    fn finish(mut self) -> ParseOutput {
        while !self.stack.is_empty() {
            self.end("");
        }
        ParseOutput {
            template: self.template,
            warnings: self.diagnostics.into_warnings(),
        }
    }

    fn current_parent(&self) -> Option<ElementId> {
        self.stack.last().copied()
    }

    fn make_element(&mut self, tag: &str, attrs: Vec<Attr>) -> Element {
        let mut tag = tag.to_string();
        if is_camel_case(&tag) {
            let hyphenated = hyphenate(&tag);
            self.diagnostics.warn(Warning::CamelCaseTag {
                tag,
                hyphenated: hyphenated.clone(),
            });
            tag = hyphenated;
        }
        let tag = tag.to_lowercase();

        let parent = self.current_parent();
        let mut element = Element::new(tag, attrs, parent);
        for attr in &element.attrs_raw {
            if element.attrs_map.contains_key(&attr.name) {
                self.diagnostics.warn(Warning::DuplicateAttribute {
                    name: attr.name.clone(),
                });
            }
            element
                .attrs_map
                .insert(attr.name.clone(), attr.value.clone());
        }

        if is_forbidden_tag(&element) {
            element.forbidden = true;
            self.diagnostics.warn(Warning::ForbiddenTag {
                tag: element.tag.clone(),
            });
        }

        element.namespace = parent
            .and_then(|p| self.template[p].namespace.clone())
            .or_else(|| self.options.platform.get_tag_namespace(&element.tag));

        element
    }

    /// Links a `v-else` element to the closest preceding sibling element.
    fn attach_else(&mut self, id: ElementId, parent: ElementId) {
        let prev = self.template[parent]
            .children
            .iter()
            .rev()
            .find_map(Child::element);
        match prev {
            Some(prev) if self.template[prev].if_expr.is_some() => {
                self.template[prev].else_block = Some(id);
            }
            _ => {
                let tag = self.template[id].tag.clone();
                self.diagnostics.warn(Warning::ElseWithoutIf { tag });
            }
        }
    }

    fn keep_text(&self, parent: ElementId, text: &str) -> Option<String> {
        let el = &self.template[parent];
        if el.tag == "pre"
            || self.options.platform.is_raw_text_tag(&el.tag)
            || !text.trim().is_empty()
        {
            Some(html_escape::decode_html_entities(text).into_owned())
        } else if self.options.preserve_whitespace && !el.children.is_empty() {
            // only preserve whitespace if it's not right after a start tag
            Some(" ".to_string())
        } else {
            None
        }
    }
}

impl TokenSink for TreeBuilder<'_> {
    fn start(&mut self, tag: &str, attrs: Vec<Attr>, unary: bool) {
        let mut element = self.make_element(tag, attrs);

        Resolver {
            platform: self.options.platform.as_ref(),
            delimiters: self.delimiters,
            diagnostics: &mut self.diagnostics,
        }
        .resolve(&mut element, self.in_pre);
        let opens_pre = element.pre && !unary;
        if opens_pre {
            self.in_pre = true;
        }

        let parent = element.parent;
        let forbidden = element.forbidden;
        let is_else = element.is_else;
        let id = self.template.push(element);

        if self.template.root.is_none() {
            self.template.root = Some(id);
        } else if self.stack.is_empty() && !self.warned_roots {
            self.warned_roots = true;
            self.diagnostics.warn(Warning::MultipleRoots);
        }

        if let Some(parent) = parent {
            if !forbidden {
                if is_else {
                    self.attach_else(id, parent);
                } else {
                    self.template[parent].children.push(Child::Element { id });
                }
            }
        }

        if !unary {
            self.stack.push(id);
        }
    }

    fn end(&mut self, _tag: &str) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        let element = &mut self.template[id];
        // remove trailing whitespace
        if element.children.last().and_then(Child::text) == Some(" ") {
            element.children.pop();
        }
        if element.pre {
            self.in_pre = false;
        }
    }

    fn chars(&mut self, text: &str) {
        let Some(parent) = self.current_parent() else {
            let trimmed = text.trim();
            if !trimmed.is_empty() && !self.warned_outside {
                self.warned_outside = true;
                self.diagnostics.warn(Warning::ContentOutsideElement {
                    text: trimmed.to_string(),
                });
            }
            return;
        };

        let Some(text) = self.keep_text(parent, text) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let child = if !self.in_pre && text != " " {
            match parse_text(&text, self.delimiters) {
                Some(expression) => Child::Expression { expression },
                None => Child::Text { text },
            }
        } else {
            Child::Text { text }
        };
        self.template[parent].children.push(child);
    }

    fn unmatched_end(&mut self, tag: &str) {
        self.diagnostics.warn(Warning::UnmatchedEndTag {
            tag: tag.to_string(),
        });
    }
}

fn is_forbidden_tag(el: &Element) -> bool {
    el.tag == "style"
        || (el.tag == "script"
            && el
                .attrs_map
                .get("type")
                .is_none_or(|t| t.is_empty() || t == "text/javascript"))
}

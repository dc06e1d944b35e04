use serde::Serialize;
use thiserror::Error;

use crate::options::WarnHandler;

/// A recoverable problem found while parsing. Parsing always continues after
/// a warning with a best-effort fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("Found camelCase tag in template: <{tag}>. It has been converted to <{hyphenated}>.")]
    CamelCaseTag { tag: String, hyphenated: String },

    #[error("duplicate attribute: {name}")]
    DuplicateAttribute { name: String },

    #[error(
        "Templates should only be responsible for mapping the state to the UI. \
         Avoid placing tags with side-effects in your templates, such as <{tag}>."
    )]
    ForbiddenTag { tag: String },

    #[error("Component template should contain exactly one root element.")]
    MultipleRoots,

    #[error("text \"{text}\" outside the root element will be ignored.")]
    ContentOutsideElement { text: String },

    #[error("Invalid v-for expression: {expression}")]
    InvalidFor { expression: String },

    #[error("v-else used on element <{tag}> without corresponding v-if.")]
    ElseWithoutIf { tag: String },

    #[error("<render> method should use a dynamic binding, e.g. `:method=\"...\"`.")]
    RenderMethodStatic,

    #[error("method attribute is required on <render>.")]
    RenderMethodMissing,

    #[error("<render> args should use a dynamic binding, e.g. `:args=\"...\"`.")]
    RenderArgsStatic,

    #[error(
        "{name}=\"{value}\": Interpolation inside attributes has been deprecated. \
         Use v-bind or the colon shorthand instead."
    )]
    InterpolationInAttribute { name: String, value: String },

    #[error("end tag </{tag}> has no matching start tag and was ignored.")]
    UnmatchedEndTag { tag: String },
}

/// Collects warnings for one parse and forwards each to the configured
/// handler.
pub(crate) struct Diagnostics<'a> {
    warnings: Vec<Warning>,
    handler: Option<&'a WarnHandler>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(handler: Option<&'a WarnHandler>) -> Self {
        Self {
            warnings: Vec::new(),
            handler,
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
        if let Some(handler) = self.handler {
            handler(&warning);
        }
        self.warnings.push(warning);
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

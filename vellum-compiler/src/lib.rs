pub mod compile;
pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod html;
pub mod options;
pub mod platform;
mod resolver;
pub mod sfc;
pub mod template_ast;
pub mod template_parse;
pub mod text;

pub use compile::{CodeGenerator, Compiled, Optimizer, compile};
pub use diagnostics::Warning;
pub use error::{ParseError, SfcError};
pub use options::{Delimiters, ParserOptions, WarnHandler};
pub use platform::{BasePlatform, Platform, WebPlatform};
pub use sfc::{Block, ComponentDescriptor, StyleBlock, parse_component};
pub use template_ast::{
    Attr, Binding, Child, Directive, Element, ElementId, ForLoop, Handler, Modifiers, RenderCall,
    Template, Transition, TransitionValue,
};
pub use template_parse::{ParseOutput, parse};
pub use text::{Filter, FilterExpression, TextExpression, TextToken, parse_text};

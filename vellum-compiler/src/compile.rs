//! The seam between the parser and the downstream stages. Neither stage ships
//! with this crate; callers plug in their own.

use crate::diagnostics::Warning;
use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::template_ast::Template;
use crate::template_parse::parse;

/// Marks static subtrees. May set `is_static` / `static_root` but must not
/// add or remove nodes.
pub trait Optimizer {
    fn optimize(&self, template: &mut Template, options: &ParserOptions);
}

/// Turns an annotated tree into render instructions.
pub trait CodeGenerator {
    type Output;

    fn generate(&self, template: &Template, options: &ParserOptions) -> Self::Output;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compiled<T> {
    pub output: T,
    pub warnings: Vec<Warning>,
}

/// Trims `source`, parses it, then runs `optimizer` and `generator` over the
/// result.
pub fn compile<O, G>(
    source: &str,
    options: &ParserOptions,
    optimizer: &O,
    generator: &G,
) -> Result<Compiled<G::Output>, ParseError>
where
    O: Optimizer + ?Sized,
    G: CodeGenerator + ?Sized,
{
    let parsed = parse(source.trim(), options)?;
    let mut template = parsed.template;
    optimizer.optimize(&mut template, options);
    Ok(Compiled {
        output: generator.generate(&template, options),
        warnings: parsed.warnings,
    })
}

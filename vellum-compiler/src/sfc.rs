use pest::Parser;
use pest::iterators::Pair;
use serde::Serialize;

use crate::error::SfcError;
use crate::template_ast::Attr;

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct ComponentParser;

/// One top-level block of a component file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Block {
    pub attrs: Vec<Attr>, // boolean attrs allowed, e.g. `scoped` or `setup`
    pub content: String,
}

impl Block {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn lang(&self) -> Option<&str> {
        self.attr("lang")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StyleBlock {
    #[serde(flatten)]
    pub block: Block,
    pub scoped: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ComponentDescriptor {
    pub template: Option<Block>,
    pub script: Option<Block>,
    pub styles: Vec<StyleBlock>,
}

/// Splits a single-file component into its blocks.
pub fn parse_component(source: &str) -> Result<ComponentDescriptor, SfcError> {
    let mut component = ComponentDescriptor::default();

    // A successful parse yields exactly one `file` pair.
    let files = ComponentParser::parse(Rule::file, source)
        .map_err(|e| SfcError::Syntax(Box::new(e)))?;

    // Children of `file` are `block` nodes followed by EOI; whitespace and
    // comments are silent.
    for node in files.flat_map(|file| file.into_inner()) {
        if node.as_rule() == Rule::block {
            for inner in node.into_inner() {
                consume_block(inner, &mut component);
            }
        }
    }

    Ok(component)
}

fn consume_block(node: Pair<Rule>, component: &mut ComponentDescriptor) {
    match node.as_rule() {
        Rule::template => {
            if component.template.is_some() {
                log::warn!("component has more than one <template> block; using the last one");
            }
            component.template = Some(read_block(node));
        }
        Rule::script => {
            if component.script.is_some() {
                log::warn!("component has more than one <script> block; using the last one");
            }
            component.script = Some(read_block(node));
        }
        Rule::style => {
            let block = read_block(node);
            let scoped = block.attr("scoped").is_some();
            component.styles.push(StyleBlock { block, scoped });
        }
        _ => {}
    }
}

fn read_block(node: Pair<Rule>) -> Block {
    let mut block = Block::default();
    for p in node.into_inner() {
        match p.as_rule() {
            // attributes are direct children of *_open
            Rule::template_open | Rule::script_open | Rule::style_open => {
                block.attrs = p
                    .into_inner()
                    .filter(|a| a.as_rule() == Rule::attribute)
                    .map(read_attr)
                    .collect();
            }
            Rule::template_body | Rule::script_body | Rule::style_body => {
                block.content = p.as_str().to_string();
            }
            _ => {}
        }
    }
    block
}

fn read_attr(attr: Pair<Rule>) -> Attr {
    // attribute = ident ( "=" quoted )?
    let mut name = String::new();
    let mut value = String::new();

    for part in attr.into_inner() {
        match part.as_rule() {
            Rule::ident => name = part.as_str().to_string(),
            Rule::quoted => value = strip_quotes(part.as_str()).to_string(),
            _ => {}
        }
    }
    Attr { name, value }
}

fn strip_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2
        && ((b[0] == b'"' && b[b.len() - 1] == b'"') || (b[0] == b'\'' && b[b.len() - 1] == b'\''))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use vellum_compiler::{
    Child, Delimiters, Element, ElementId, ParseOutput, ParserOptions, Template, Warning,
};

/// Logger filter used when `RUST_LOG` is unset. The compiler logs every
/// warning itself and `vellum parse` prints the returned ones, so the
/// compiler's target stays at `error` to avoid reporting them twice.
pub const DEFAULT_LOG_FILTER: &str = "warn,vellum_compiler=error";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Tree,
}

/// Flags shared by `vellum parse` and library callers.
#[derive(Clone, Debug, Default, Args)]
pub struct ParseArgs {
    /// Treat the input as a component file and parse its <template> block
    #[arg(long)]
    pub sfc: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Interpolation delimiters, e.g. `--delimiters '[[' ']]'`
    #[arg(long, num_args = 2, value_names = ["OPEN", "CLOSE"])]
    pub delimiters: Option<Vec<String>>,
    /// Drop whitespace-only text between elements
    #[arg(long)]
    pub no_preserve_whitespace: bool,
    /// Disable HTML implicit-close rules for <p> and optional end tags
    #[arg(long)]
    pub no_expect_html: bool,
    /// Exit with an error if any warning was raised
    #[arg(long)]
    pub deny_warnings: bool,
}

impl ParseArgs {
    pub fn options(&self) -> Result<ParserOptions> {
        let mut options = ParserOptions::default()
            .with_preserve_whitespace(!self.no_preserve_whitespace)
            .with_expect_html(!self.no_expect_html);
        if let Some(pair) = &self.delimiters {
            let [open, close] = pair.as_slice() else {
                bail!("--delimiters takes exactly two values");
            };
            options = options.with_delimiters(Delimiters::new(open.as_str(), close.as_str())?);
        }
        Ok(options)
    }
}

/// Component files are recognised by extension unless `force` is set.
pub fn is_component_file(input: &Path, force: bool) -> bool {
    force
        || input
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("vue") || e.eq_ignore_ascii_case("vx"))
}

/// Reads `input` and returns the template source, pulling the `<template>`
/// block out of component files.
pub fn read_template(input: &Path, force_sfc: bool) -> Result<String> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    if !is_component_file(input, force_sfc) {
        return Ok(src);
    }
    let component = vellum_compiler::parse_component(&src)
        .with_context(|| format!("failed to split {}", input.display()))?;
    let template = component
        .template
        .with_context(|| format!("{} has no <template> block", input.display()))?;
    Ok(template.content)
}

/// Parses `input` and renders the result in the requested format.
///
/// Warnings are returned alongside the rendering so the caller decides where
/// they go; with `deny_warnings` set any warning turns into an error.
pub fn parse_cmd(input: &Path, args: &ParseArgs) -> Result<(String, Vec<Warning>)> {
    let src = read_template(input, args.sfc)?;
    let options = args.options()?;
    let ParseOutput { template, warnings } = vellum_compiler::parse(src.trim(), &options)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    if args.deny_warnings && !warnings.is_empty() {
        let listed = warnings
            .iter()
            .map(|w| format!("  - {w}"))
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "{} raised {} warning(s):\n{listed}",
            input.display(),
            warnings.len()
        );
    }

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&template)?,
        OutputFormat::Tree => render_tree(&template),
    };
    Ok((rendered, warnings))
}

/// Splits a component file and renders its descriptor as JSON.
pub fn split_cmd(input: &Path) -> Result<String> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let component = vellum_compiler::parse_component(&src)
        .with_context(|| format!("failed to split {}", input.display()))?;
    Ok(serde_json::to_string_pretty(&component)?)
}

/// Indented outline of the reachable tree, one node per line.
pub fn render_tree(template: &Template) -> String {
    enum Line<'t> {
        Element(ElementId),
        Leaf(&'t Child),
    }

    let mut out = String::new();
    let mut stack: Vec<(Line<'_>, usize)> = template
        .root_id()
        .map(|root| (Line::Element(root), 0))
        .into_iter()
        .collect();

    while let Some((line, depth)) = stack.pop() {
        let pad = "  ".repeat(depth);
        let id = match line {
            Line::Leaf(Child::Text { text }) => {
                let _ = writeln!(out, "{pad}{text:?}");
                continue;
            }
            Line::Leaf(Child::Expression { expression }) => {
                let _ = writeln!(out, "{pad}{expression}");
                continue;
            }
            Line::Leaf(Child::Element { id }) => *id,
            Line::Element(id) => id,
        };
        write_element(&template[id], &pad, &mut out);

        // pushed in reverse: children first, then the v-else branch
        if let Some(next) = template[id].else_block {
            stack.push((Line::Element(next), depth));
        }
        for child in template[id].children.iter().rev() {
            stack.push((Line::Leaf(child), depth + 1));
        }
    }
    out
}

fn write_element(el: &Element, pad: &str, out: &mut String) {
    let _ = write!(out, "{pad}<{}>", el.tag);
    if let Some(f) = &el.for_loop {
        match &f.iterator {
            Some(it) => {
                let _ = write!(out, " for=({}, {it}) in {}", f.alias, f.expression);
            }
            None => {
                let _ = write!(out, " for={} in {}", f.alias, f.expression);
            }
        }
    }
    if let Some(cond) = &el.if_expr {
        let _ = write!(out, " if={cond}");
    }
    if el.is_else {
        out.push_str(" else");
    }
    if el.once {
        out.push_str(" once");
    }
    if el.pre {
        out.push_str(" pre");
    }
    if let Some(class) = &el.static_class {
        let _ = write!(out, " class={class}");
    }
    if let Some(class) = &el.class_binding {
        let _ = write!(out, " :class={class}");
    }
    for attr in el.static_attrs.iter().chain(&el.attrs).chain(&el.props) {
        let _ = write!(out, " {}={}", attr.name, attr.value);
    }
    for handler in &el.handlers {
        let _ = write!(out, " @{}={}", handler.event, handler.value);
    }
    out.push('\n');
}

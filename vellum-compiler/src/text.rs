use std::fmt;

use serde::Serialize;

use crate::options::Delimiters;

/// Text that contains at least one interpolation: literal fragments
/// interleaved with bound expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextExpression {
    pub tokens: Vec<TextToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TextToken {
    Literal(String),
    Binding(FilterExpression),
}

/// `expr | filterA | filterB(arg)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterExpression {
    pub expression: String,
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub name: String,
    /// Argument list without the surrounding parentheses.
    pub args: Option<String>,
}

impl TextExpression {
    pub fn bindings(&self) -> impl Iterator<Item = &FilterExpression> {
        self.tokens.iter().filter_map(|t| match t {
            TextToken::Binding(b) => Some(b),
            TextToken::Literal(_) => None,
        })
    }
}

impl fmt::Display for TextExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            match token {
                TextToken::Literal(text) => f.write_str(&quote(text))?,
                TextToken::Binding(binding) => write!(f, "_s({binding})")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = self.expression.clone();
        for filter in &self.filters {
            out = match &filter.args {
                Some(args) => format!("_f(\"{}\")({out},{args})", filter.name),
                None => format!("_f(\"{}\")({out})", filter.name),
            };
        }
        f.write_str(&out)
    }
}

/// Splits `text` on interpolation delimiters. Returns `None` when the text
/// holds no complete `open ... close` span.
pub fn parse_text(text: &str, delimiters: &Delimiters) -> Option<TextExpression> {
    let (open, close) = (delimiters.open.as_str(), delimiters.close.as_str());
    let mut tokens = Vec::new();
    let mut last = 0usize;
    let mut cursor = 0usize;

    while let Some(start) = text[cursor..].find(open).map(|i| i + cursor) {
        let inner_start = start + open.len();
        // The expression needs at least one character.
        let Some(first) = text[inner_start..].chars().next() else {
            break;
        };
        let search_from = inner_start + first.len_utf8();
        let Some(end) = text[search_from..].find(close).map(|i| i + search_from) else {
            // Unterminated: everything from here on is literal.
            break;
        };

        if start > last {
            tokens.push(TextToken::Literal(text[last..start].to_string()));
        }
        tokens.push(TextToken::Binding(parse_filters(text[inner_start..end].trim())));
        last = end + close.len();
        cursor = last;
    }

    if tokens.is_empty() {
        return None;
    }
    if last < text.len() {
        tokens.push(TextToken::Literal(text[last..].to_string()));
    }
    Some(TextExpression { tokens })
}

/// Splits an expression on filter pipes. A `|` only separates filters when it
/// is not part of `||` and sits outside quotes and brackets.
pub fn parse_filters(exp: &str) -> FilterExpression {
    let bytes = exp.as_bytes();
    let mut quote_char: Option<u8> = None;
    let (mut curly, mut square, mut paren) = (0i32, 0i32, 0i32);
    let mut expression: Option<String> = None;
    let mut raw_filters: Vec<&str> = Vec::new();
    let mut last_filter = 0usize;

    for (i, &c) in bytes.iter().enumerate() {
        let prev = if i > 0 { bytes[i - 1] } else { 0 };
        if let Some(q) = quote_char {
            if c == q && prev != b'\\' {
                quote_char = None;
            }
            continue;
        }
        let next = bytes.get(i + 1).copied().unwrap_or(0);
        if c == b'|' && next != b'|' && prev != b'|' && curly == 0 && square == 0 && paren == 0 {
            match expression {
                None => expression = Some(exp[..i].trim().to_string()),
                Some(_) => raw_filters.push(exp[last_filter..i].trim()),
            }
            last_filter = i + 1;
            continue;
        }
        match c {
            b'"' | b'\'' | b'`' => quote_char = Some(c),
            b'(' => paren += 1,
            b')' => paren -= 1,
            b'[' => square += 1,
            b']' => square -= 1,
            b'{' => curly += 1,
            b'}' => curly -= 1,
            _ => {}
        }
    }

    let expression = match expression {
        None => exp.trim().to_string(),
        Some(expression) => {
            raw_filters.push(exp[last_filter..].trim());
            expression
        }
    };

    FilterExpression {
        expression,
        filters: raw_filters.into_iter().map(parse_filter).collect(),
    }
}

fn parse_filter(raw: &str) -> Filter {
    match raw.find('(') {
        Some(i) => {
            let args = raw[i + 1..].trim_end();
            let args = args.strip_suffix(')').unwrap_or(args);
            Filter {
                name: raw[..i].trim().to_string(),
                args: Some(args.to_string()),
            }
        }
        None => Filter {
            name: raw.to_string(),
            args: None,
        },
    }
}

/// Renders `s` as a JSON string literal, escaping exactly what
/// `serde_json::to_string` escapes. Raw-passthrough attribute values rely on
/// this to read back as the original text.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

//! Streaming tokenizer for the HTML-ish template dialect.
//!
//! Hand-rolled byte scanner with support for:
//! - nested elements, void elements and self-closing tags (`<input/>`)
//! - attributes without a value, quoted or unquoted
//! - implicitly closed elements (`<li>`, `<p>`) when `expect_html` is set
//! - raw-text elements whose body is never scanned for tags
//! - comments, conditional comments and doctypes, which emit nothing

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::platform::Platform;
use crate::template_ast::Attr;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("Invalid Regex"));
static CDATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("Invalid Regex"));

/// Receives tokenizer events in document order.
pub trait TokenSink {
    fn start(&mut self, tag: &str, attrs: Vec<Attr>, unary: bool);
    fn end(&mut self, tag: &str);
    fn chars(&mut self, text: &str);
    /// An end tag without a matching open tag. It produces no other event.
    fn unmatched_end(&mut self, _tag: &str) {}
}

/// A recorded event, mostly useful for inspecting the tokenizer in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start {
        tag: String,
        attrs: Vec<Attr>,
        unary: bool,
    },
    End(String),
    Chars(String),
    UnmatchedEnd(String),
}

impl TokenSink for Vec<Token> {
    fn start(&mut self, tag: &str, attrs: Vec<Attr>, unary: bool) {
        self.push(Token::Start {
            tag: tag.to_string(),
            attrs,
            unary,
        });
    }

    fn end(&mut self, tag: &str) {
        self.push(Token::End(tag.to_string()));
    }

    fn chars(&mut self, text: &str) {
        self.push(Token::Chars(text.to_string()));
    }

    fn unmatched_end(&mut self, tag: &str) {
        self.push(Token::UnmatchedEnd(tag.to_string()));
    }
}

/// Tokenizes `html`, feeding every event to `sink`. Every tag left open at
/// the end of input receives an `end` event.
pub fn tokenize(html: &str, platform: &dyn Platform, expect_html: bool, sink: &mut dyn TokenSink) {
    Tokenizer {
        src: html,
        pos: 0,
        stack: Vec::new(),
        platform,
        expect_html,
        sink,
        terminators: Terminators::default(),
    }
    .run();
}

struct OpenTag {
    name: String,
    lower: String,
}

struct StartTag {
    name: String,
    attrs: Vec<Attr>,
    self_closing: bool,
    len: usize,
}

struct Tokenizer<'a, 's> {
    src: &'a str,
    pos: usize,
    stack: Vec<OpenTag>,
    platform: &'a dyn Platform,
    expect_html: bool,
    sink: &'s mut dyn TokenSink,
    terminators: Terminators,
}

const COMMENT_END: usize = 0;
const CONDITIONAL_END: usize = 1;
const TAG_END: usize = 2;
const TERMINATORS: [&str; 3] = ["-->", "]>", ">"];

/// Last search result for each markup terminator. Lookups only move forward,
/// so an unterminated `<!--` or `</a` never rescans the rest of the input.
#[derive(Default)]
struct Terminators {
    found: [Option<(usize, Option<usize>)>; 3],
}

impl Terminators {
    /// Offset of the first `TERMINATORS[which]` at or after `from`.
    fn find(&mut self, src: &str, from: usize, which: usize) -> Option<usize> {
        if let Some((_, found)) = self.found[which].filter(|(start, _)| *start <= from) {
            match found {
                Some(at) if at >= from => return Some(at),
                None => return None,
                Some(_) => {}
            }
        }
        let found = src[from..].find(TERMINATORS[which]).map(|i| i + from);
        self.found[which] = Some((from, found));
        found
    }
}

impl Tokenizer<'_, '_> {
    fn run(mut self) {
        while self.pos < self.src.len() {
            if self
                .stack
                .last()
                .is_some_and(|t| self.platform.is_raw_text_tag(&t.lower))
            {
                self.raw_text();
                continue;
            }

            let src = self.src;
            let rest = &src[self.pos..];
            if let Some(len) = self.markup_len(self.pos) {
                self.markup(len);
                continue;
            }

            // Text runs until the next '<' that opens real markup.
            let mut end = rest.chars().next().map_or(rest.len(), char::len_utf8);
            loop {
                match rest[end..].find('<') {
                    Some(i) if self.markup_len(self.pos + end + i).is_some() => {
                        end += i;
                        break;
                    }
                    Some(i) => end += i + 1,
                    None => {
                        end = rest.len();
                        break;
                    }
                }
            }
            log::trace!("chars {:?}", &rest[..end]);
            self.sink.chars(&rest[..end]);
            self.pos += end;
        }
        self.close(None);
    }

    /// Length of the comment, doctype, end tag or start tag at `at`, if it is
    /// one.
    fn markup_len(&mut self, at: usize) -> Option<usize> {
        let src = self.src;
        let s = &src[at..];
        if !s.starts_with('<') {
            return None;
        }
        if s.starts_with("<!--") {
            return self
                .terminators
                .find(src, at, COMMENT_END)
                .map(|i| i - at + 3);
        }
        if s.starts_with("<![") {
            return self
                .terminators
                .find(src, at, CONDITIONAL_END)
                .map(|i| i - at + 2);
        }
        // Everything else needs a `>` somewhere ahead.
        let gt = self.terminators.find(src, at, TAG_END)?;
        if s.len() >= 9 && s.as_bytes()[..9].eq_ignore_ascii_case(b"<!doctype") {
            return Some(gt - at + 1);
        }
        if let Some(after) = s.strip_prefix("</") {
            let name = read_name(after);
            if name.is_empty() {
                return None;
            }
            return self
                .terminators
                .find(src, at + 2 + name.len(), TAG_END)
                .map(|i| i - at + 1);
        }
        scan_start_tag(s).map(|t| t.len)
    }

    fn markup(&mut self, len: usize) {
        let src = self.src;
        let rest = &src[self.pos..];
        if rest.starts_with("</") {
            let name = read_name(&rest[2..]).to_string();
            self.pos += len;
            self.close(Some(&name));
        } else if rest.starts_with("<!") {
            // comment, conditional comment or doctype
            self.pos += len;
        } else if let Some(tag) = scan_start_tag(rest) {
            self.pos += tag.len;
            self.open(tag);
        }
    }

    fn open(&mut self, tag: StartTag) {
        let lower = tag.name.to_lowercase();
        if self.expect_html {
            let last = self.stack.last().map(|t| t.lower.clone());
            if last.as_deref() == Some("p") && self.platform.is_non_phrasing_tag(&lower) {
                log::debug!("<{lower}> implicitly closes <p>");
                self.close(Some("p"));
            }
            let last = self.stack.last().map(|t| t.lower.as_str());
            if self.platform.can_be_left_open_tag(&lower) && last == Some(lower.as_str()) {
                log::debug!("<{lower}> implicitly closes the previous <{lower}>");
                self.close(Some(&lower));
            }
        }

        let unary = self.platform.is_unary_tag(&lower) || tag.self_closing;
        log::trace!("start <{}> unary={unary}", tag.name);
        if !unary {
            self.stack.push(OpenTag {
                name: tag.name.clone(),
                lower,
            });
        }
        self.sink.start(&tag.name, tag.attrs, unary);
    }

    /// Closes the innermost open tag called `name` and everything opened
    /// after it. `None` closes every open tag.
    fn close(&mut self, name: Option<&str>) {
        let lower = name.map(str::to_lowercase);
        let pos = match &lower {
            Some(lower) => self.stack.iter().rposition(|t| &t.lower == lower),
            None => Some(0),
        };

        match (pos, lower.as_deref()) {
            (Some(pos), _) => {
                while self.stack.len() > pos {
                    let Some(open) = self.stack.pop() else { break };
                    log::trace!("end </{}>", open.name);
                    self.sink.end(&open.name);
                }
            }
            (None, Some("br")) => self.sink.start("br", Vec::new(), true),
            (None, Some("p")) => {
                self.sink.start("p", Vec::new(), false);
                self.sink.end("p");
            }
            (None, _) => {
                let tag = name.unwrap_or_default();
                log::debug!("dropping unmatched </{tag}>");
                self.sink.unmatched_end(tag);
            }
        }
    }

    fn raw_text(&mut self) {
        let Some(tag) = self.stack.last().map(|t| t.lower.clone()) else {
            return;
        };
        let src = self.src;
        let rest = &src[self.pos..];
        // ASCII lowercasing keeps byte offsets intact.
        let haystack = rest.to_ascii_lowercase();
        let needle = format!("</{tag}");

        let close = haystack.find(&needle).and_then(|start| {
            haystack[start..]
                .find('>')
                .map(|gt| (start, start + gt + 1))
        });
        let (body, consumed) = match close {
            Some((start, end)) => (&rest[..start], end),
            None => (rest, rest.len()),
        };

        let body = unwrap_raw(body);
        if !body.is_empty() {
            self.sink.chars(&body);
        }
        self.pos += consumed;
        if close.is_some() {
            self.close(Some(&tag));
        }
    }
}

fn unwrap_raw(body: &str) -> Cow<'_, str> {
    match COMMENT_RE.replace_all(body, "$1") {
        Cow::Borrowed(b) => CDATA_RE.replace_all(b, "$1"),
        Cow::Owned(o) => Cow::Owned(CDATA_RE.replace_all(&o, "$1").into_owned()),
    }
}

/// Reads a tag name: an ASCII letter followed by letters, digits, `_`, `-`,
/// `:` or `.`.
fn read_name(s: &str) -> &str {
    let bytes = s.as_bytes();
    if !bytes.first().is_some_and(u8::is_ascii_alphabetic) {
        return "";
    }
    let end = bytes
        .iter()
        .position(|&c| !(c.is_ascii_alphanumeric() || matches!(c, b'_' | b'-' | b':' | b'.')))
        .unwrap_or(bytes.len());
    &s[..end]
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn scan_start_tag(s: &str) -> Option<StartTag> {
    let name = read_name(s.strip_prefix('<')?);
    if name.is_empty() {
        return None;
    }
    let bytes = s.as_bytes();
    let mut i = 1 + name.len();
    let mut attrs = Vec::new();

    loop {
        skip_ws(bytes, &mut i);
        match bytes.get(i) {
            None => return None,
            Some(b'>') => {
                return Some(StartTag {
                    name: name.to_string(),
                    attrs,
                    self_closing: false,
                    len: i + 1,
                });
            }
            Some(b'/') => {
                let mut j = i + 1;
                skip_ws(bytes, &mut j);
                if bytes.get(j) == Some(&b'>') {
                    return Some(StartTag {
                        name: name.to_string(),
                        attrs,
                        self_closing: true,
                        len: j + 1,
                    });
                }
                return None;
            }
            Some(_) => attrs.push(read_attribute(s, &mut i)?),
        }
    }
}

fn is_name_byte(c: u8) -> bool {
    !c.is_ascii_whitespace() && !matches!(c, b'"' | b'\'' | b'<' | b'>' | b'/' | b'=')
}

fn read_attribute(s: &str, i: &mut usize) -> Option<Attr> {
    let bytes = s.as_bytes();
    let start = *i;
    while *i < bytes.len() && is_name_byte(bytes[*i]) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    let name = &s[start..*i];

    let mut j = *i;
    skip_ws(bytes, &mut j);
    if bytes.get(j) != Some(&b'=') {
        return Some(Attr::new(name, ""));
    }
    j += 1;
    skip_ws(bytes, &mut j);

    let raw = match bytes.get(j)? {
        &q @ (b'"' | b'\'') => {
            let len = s[j + 1..].find(q as char)?;
            let value = &s[j + 1..j + 1 + len];
            j += len + 2;
            value
        }
        _ => {
            let vstart = j;
            while j < bytes.len()
                && !bytes[j].is_ascii_whitespace()
                && !matches!(bytes[j], b'"' | b'\'' | b'=' | b'<' | b'>' | b'`')
            {
                j += 1;
            }
            if j == vstart {
                return None;
            }
            &s[vstart..j]
        }
    };
    *i = j;
    Some(Attr::new(name, html_escape::decode_html_entities(raw)))
}

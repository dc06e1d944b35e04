/// Tag and attribute classification supplied by the target platform.
///
/// Every hook has a conservative default so a platform only overrides what it
/// knows about. Implementations must be shareable across threads: one
/// platform instance is typically reused by many concurrent parses.
pub trait Platform: Send + Sync {
    /// Void elements that never get a matching end tag (`<br>`, `<input>`).
    fn is_unary_tag(&self, _tag: &str) -> bool {
        false
    }

    /// Elements whose body is delivered as a single text run, never scanned
    /// for nested tags.
    fn is_raw_text_tag(&self, tag: &str) -> bool {
        matches!(tag, "script" | "style")
    }

    /// Elements whose end tag may be omitted when a sibling of the same kind
    /// opens (`<li>`, `<p>`, `<td>`).
    fn can_be_left_open_tag(&self, _tag: &str) -> bool {
        false
    }

    /// Block-level elements that implicitly close an open `<p>`.
    fn is_non_phrasing_tag(&self, _tag: &str) -> bool {
        false
    }

    fn get_tag_namespace(&self, _tag: &str) -> Option<String> {
        None
    }

    /// Whether a bound attribute must be set as a DOM property instead of
    /// an attribute.
    fn must_use_prop(&self, _tag: &str, _attr: &str) -> bool {
        false
    }
}

/// A platform that knows nothing beyond the raw-text tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePlatform;

impl Platform for BasePlatform {}

const UNARY_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "frame", "hr", "img", "input", "isindex", "keygen",
    "link", "meta", "param", "source", "track", "wbr",
];

const LEFT_OPEN_TAGS: &[&str] = &[
    "colgroup", "dd", "dt", "li", "options", "p", "td", "tfoot", "th", "thead", "tr", "source",
];

const NON_PHRASING_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "blockquote", "body", "caption", "col", "colgroup",
    "dd", "details", "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html",
    "legend", "li", "menuitem", "meta", "optgroup", "option", "param", "rp", "rt", "source",
    "style", "summary", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track",
];

const SVG_TAGS: &[&str] = &[
    "svg", "animate", "circle", "clippath", "cursor", "defs", "desc", "ellipse", "filter",
    "font", "font-face", "g", "glyph", "image", "line", "marker", "mask", "missing-glyph",
    "path", "pattern", "polygon", "polyline", "rect", "switch", "symbol", "text", "textpath",
    "tspan", "use", "view",
];

/// HTML in a browser: void tags, optional end tags, SVG/MathML namespaces and
/// the form-control DOM properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPlatform;

impl Platform for WebPlatform {
    fn is_unary_tag(&self, tag: &str) -> bool {
        UNARY_TAGS.contains(&tag.to_ascii_lowercase().as_str())
    }

    fn can_be_left_open_tag(&self, tag: &str) -> bool {
        LEFT_OPEN_TAGS.contains(&tag)
    }

    fn is_non_phrasing_tag(&self, tag: &str) -> bool {
        NON_PHRASING_TAGS.contains(&tag)
    }

    fn get_tag_namespace(&self, tag: &str) -> Option<String> {
        if SVG_TAGS.contains(&tag) {
            Some("svg".to_string())
        } else if tag == "math" {
            Some("math".to_string())
        } else {
            None
        }
    }

    fn must_use_prop(&self, tag: &str, attr: &str) -> bool {
        match attr {
            "value" => matches!(tag, "input" | "textarea" | "option" | "select"),
            "selected" => tag == "option",
            "checked" => tag == "input",
            "muted" => tag == "video",
            _ => false,
        }
    }
}

use std::fmt;
use std::sync::Arc;

use crate::diagnostics::Warning;
use crate::error::ParseError;
use crate::platform::{Platform, WebPlatform};

pub type WarnHandler = Arc<dyn Fn(&Warning) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, ParseError> {
        let (open, close) = (open.into(), close.into());
        if open.is_empty() || close.is_empty() {
            return Err(ParseError::InvalidDelimiters { open, close });
        }
        Ok(Self { open, close })
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: "{{".to_string(),
            close: "}}".to_string(),
        }
    }
}

/// Configuration captured for the duration of a single parse.
///
/// Nothing here is mutated while parsing, so one instance can be shared by
/// concurrent parses.
#[derive(Clone)]
pub struct ParserOptions {
    pub platform: Arc<dyn Platform>,
    pub expect_html: bool,
    pub preserve_whitespace: bool,
    pub delimiters: Option<Delimiters>,
    pub warn: Option<WarnHandler>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            platform: Arc::new(WebPlatform),
            expect_html: true,
            preserve_whitespace: true,
            delimiters: None,
            warn: None,
        }
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("expect_html", &self.expect_html)
            .field("preserve_whitespace", &self.preserve_whitespace)
            .field("delimiters", &self.delimiters)
            .field("warn", &self.warn.is_some())
            .finish_non_exhaustive()
    }
}

impl ParserOptions {
    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    pub fn with_expect_html(mut self, expect_html: bool) -> Self {
        self.expect_html = expect_html;
        self
    }

    pub fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = Some(delimiters);
        self
    }

    pub fn with_warn(mut self, handler: impl Fn(&Warning) + Send + Sync + 'static) -> Self {
        self.warn = Some(Arc::new(handler));
        self
    }

    /// The delimiters in effect, rejecting empty ones assigned directly to
    /// the public field.
    pub(crate) fn resolved_delimiters(&self) -> Result<Delimiters, ParseError> {
        match &self.delimiters {
            Some(d) => Delimiters::new(d.open.clone(), d.close.clone()),
            None => Ok(Delimiters::default()),
        }
    }
}

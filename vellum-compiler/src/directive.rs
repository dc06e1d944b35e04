//! The attribute-name micro-grammar: directive prefixes, `.modifier` chains,
//! `:argument` suffixes, and the `v-for` expression grammar.

use std::sync::LazyLock;

use regex::Regex;

use crate::template_ast::Modifiers;

static DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v-|^@|^:").expect("Invalid Regex"));
static BIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:|^v-bind:").expect("Invalid Regex"));
static ON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@|^v-on:").expect("Invalid Regex"));
static ARG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":(.*)$").expect("Invalid Regex"));
static MODIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[^.]+").expect("Invalid Regex"));
static FOR_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*)\s+(?:in|of)\s+(.*)").expect("Invalid Regex"));
static FOR_ITERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*),(.*)\)").expect("Invalid Regex"));
static CAMEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z\d][A-Z]").expect("Invalid Regex"));
static HYPHENATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("Invalid Regex"));

/// How a directive-prefixed attribute name is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrName {
    /// `:name` / `v-bind:name`.
    Bind { name: String },
    /// `@event` / `v-on:event`.
    On { event: String, modifiers: Modifiers },
    /// Any other `v-` name, e.g. `v-model.trim` or `v-custom:arg`.
    Directive {
        name: String,
        arg: Option<String>,
        modifiers: Modifiers,
    },
    /// Not a directive at all.
    Literal,
}

pub fn is_directive(name: &str) -> bool {
    DIR_RE.is_match(name)
}

/// Collects every `.flag` suffix. `None` when the name carries none.
pub fn parse_modifiers(name: &str) -> Option<Modifiers> {
    let mut found = MODIFIER_RE.find_iter(name).peekable();
    found.peek()?;
    Some(found.map(|m| &m.as_str()[1..]).collect())
}

pub fn classify(raw: &str) -> AttrName {
    if !is_directive(raw) {
        return AttrName::Literal;
    }
    let modifiers = parse_modifiers(raw);
    let name = if modifiers.is_some() {
        MODIFIER_RE.replace_all(raw, "").into_owned()
    } else {
        raw.to_string()
    };
    let modifiers = modifiers.unwrap_or_default();

    if BIND_RE.is_match(&name) {
        AttrName::Bind {
            name: BIND_RE.replace(&name, "").into_owned(),
        }
    } else if ON_RE.is_match(&name) {
        AttrName::On {
            event: ON_RE.replace(&name, "").into_owned(),
            modifiers,
        }
    } else {
        let mut name = DIR_RE.replace(&name, "").into_owned();
        let arg = ARG_RE
            .captures(&name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|a| !a.is_empty());
        if let Some(arg) = &arg {
            name.truncate(name.len() - arg.len() - 1);
        }
        AttrName::Directive {
            name,
            arg,
            modifiers,
        }
    }
}

/// The pieces of a `v-for` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForExpression {
    pub alias: String,
    pub iterator: Option<String>,
    pub expression: String,
}

pub fn parse_for(exp: &str) -> Option<ForExpression> {
    let caps = FOR_ALIAS_RE.captures(exp)?;
    let alias = caps[1].trim();
    let expression = caps[2].trim().to_string();
    Some(match FOR_ITERATOR_RE.captures(alias) {
        Some(pair) => ForExpression {
            alias: pair[1].trim().to_string(),
            iterator: Some(pair[2].trim().to_string()),
            expression,
        },
        None => ForExpression {
            alias: alias.to_string(),
            iterator: None,
            expression,
        },
    })
}

pub fn is_camel_case(tag: &str) -> bool {
    CAMEL_RE.is_match(tag)
}

/// `myComponent` → `my-component`.
pub fn hyphenate(s: &str) -> String {
    HYPHENATE_RE
        .replace_all(s, "$1-$2")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mods(names: &[&str]) -> Modifiers {
        names.iter().copied().collect()
    }

    #[test_log::test]
    fn event_with_modifier_chain() {
        assert_eq!(
            classify("@click.stop.prevent"),
            AttrName::On {
                event: "click".into(),
                modifiers: mods(&["stop", "prevent"]),
            }
        );
        assert_eq!(
            classify("v-on:keyup.enter"),
            AttrName::On {
                event: "keyup".into(),
                modifiers: mods(&["enter"]),
            }
        );
    }

    #[test_log::test]
    fn bind_prefixes() {
        assert_eq!(classify(":value"), AttrName::Bind { name: "value".into() });
        assert_eq!(classify("v-bind:title"), AttrName::Bind { name: "title".into() });
    }

    #[test_log::test]
    fn custom_directive_with_argument() {
        assert_eq!(
            classify("v-tooltip:top.delay"),
            AttrName::Directive {
                name: "tooltip".into(),
                arg: Some("top".into()),
                modifiers: mods(&["delay"]),
            }
        );
        assert_eq!(
            classify("v-model"),
            AttrName::Directive {
                name: "model".into(),
                arg: None,
                modifiers: Modifiers::default(),
            }
        );
        assert_eq!(classify("id"), AttrName::Literal);
        assert_eq!(classify("data-v"), AttrName::Literal);
    }

    #[test_log::test]
    fn no_modifiers_is_none() {
        assert_eq!(parse_modifiers("@click"), None);
        assert_eq!(parse_modifiers("@click.once"), Some(mods(&["once"])));
    }

    #[test_log::test]
    fn for_grammar() {
        assert_eq!(
            parse_for("item in list"),
            Some(ForExpression {
                alias: "item".into(),
                iterator: None,
                expression: "list".into(),
            })
        );
        assert_eq!(
            parse_for("(val, key) of obj.entries"),
            Some(ForExpression {
                alias: "val".into(),
                iterator: Some("key".into()),
                expression: "obj.entries".into(),
            })
        );
        assert_eq!(parse_for("items"), None);
    }

    #[test]
    fn camel_case_tags() {
        assert!(is_camel_case("myComponent"));
        assert!(!is_camel_case("my-component"));
        assert_eq!(hyphenate("myComponentX"), "my-component-x");
    }
}

// src/html.rs
//! Typed element lookups over a parsed page.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::fmt;
use tracing::error;
use url::Url;

use crate::error::{Error, Result};

/// How an attribute value must look for an element to match.
#[derive(Debug, Clone)]
pub enum AttrMatcher {
    /// Whole value equals the string. For `class`, any single class name may match too.
    Exact(String),
    Pattern(Regex),
}

impl AttrMatcher {
    fn matches(&self, attr: &str, value: &str) -> bool {
        match self {
            AttrMatcher::Exact(want) => {
                value == want
                    || (attr == "class" && value.split_ascii_whitespace().any(|c| c == want))
            }
            AttrMatcher::Pattern(re) => re.is_match(value),
        }
    }
}

/// Tag name plus an ordered list of attribute filters, all of which must hold.
#[derive(Debug, Clone)]
pub struct TagQuery {
    tag: String,
    attrs: Vec<(String, AttrMatcher)>,
}

impl TagQuery {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .push((name.into(), AttrMatcher::Exact(value.into())));
        self
    }

    pub fn attr_pattern(mut self, name: impl Into<String>, pattern: Regex) -> Self {
        self.attrs.push((name.into(), AttrMatcher::Pattern(pattern)));
        self
    }

    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        let value = el.value();
        value.name().eq_ignore_ascii_case(&self.tag)
            && self.attrs.iter().all(|(name, matcher)| {
                value
                    .attr(name)
                    .map_or(false, |v| matcher.matches(name, v))
            })
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        for (name, matcher) in &self.attrs {
            match matcher {
                AttrMatcher::Exact(v) => write!(f, "[{}={:?}]", name, v)?,
                AttrMatcher::Pattern(re) => write!(f, "[{}~/{}/]", name, re.as_str())?,
            }
        }
        Ok(())
    }
}

/// Descendant elements of `root` in document order, `root` itself excluded.
fn descendants<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First descendant matching `query`; logs and fails with `TagNotFound` otherwise.
///
/// The returned element can be passed straight back in as the next search root.
pub fn find<'a>(root: ElementRef<'a>, query: &TagQuery) -> Result<ElementRef<'a>> {
    match descendants(root).find(|el| query.matches(*el)) {
        Some(el) => Ok(el),
        None => {
            error!(query = %query, "tag not found");
            Err(Error::TagNotFound {
                query: query.to_string(),
            })
        }
    }
}

/// Document-level [`find`].
pub fn find_in<'a>(doc: &'a Html, query: &TagQuery) -> Result<ElementRef<'a>> {
    find(doc.root_element(), query)
}

/// Every descendant matching `query`, in document order. Empty is not an error.
pub fn find_all<'a>(root: ElementRef<'a>, query: &TagQuery) -> Vec<ElementRef<'a>> {
    descendants(root).filter(|el| query.matches(*el)).collect()
}

/// Attribute value, or `AttributeMissing`.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Result<&'a str> {
    el.value().attr(name).ok_or_else(|| Error::AttributeMissing {
        tag: el.value().name().to_string(),
        attr: name.to_string(),
    })
}

/// Absolute URL for `href` found on the page at `base`.
pub fn resolve(base: &Url, href: &str) -> Result<Url> {
    base.join(href).map_err(|source| Error::BadLink {
        href: href.to_string(),
        source,
    })
}

/// Concatenated text of every text node under `el`.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// For `<dt>Label</dt><dd>value</dd>` style markup: the element right after the one
/// whose own text node reads `label`.
pub fn labelled_value<'a>(root: ElementRef<'a>, label: &str) -> Result<ElementRef<'a>> {
    let value = root
        .descendants()
        .find(|node| node.value().as_text().map_or(false, |t| t.trim() == label))
        .and_then(|node| node.parent())
        .and_then(|parent| parent.next_siblings().find_map(ElementRef::wrap));

    value.ok_or_else(|| {
        error!(label, "labelled value not found");
        Error::LabelNotFound {
            label: label.to_string(),
        }
    })
}

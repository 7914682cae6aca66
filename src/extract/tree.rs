//! Label-driven lookup over a generic markup tree
//!
//! Profile pages present their facts as key/value pairs:
//!
//! ```html
//! <dl>
//!   <dt><span>所在地</span></dt>
//!   <dd><p>千葉県千葉市…</p></dd>
//! </dl>
//! ```
//!
//! The walk is label → enclosing key element → following value element. It is
//! written against [`MarkupNode`] so it does not depend on a parse-tree crate,
//! and the label predicate is supplied by the caller.

use scraper::ElementRef;

/// The minimal tree capability the label walk needs
pub trait MarkupNode: Sized {
    /// Lowercase element name
    fn tag_name(&self) -> &str;

    /// Nearest element ancestor
    fn parent_element(&self) -> Option<Self>;

    /// Next sibling that is an element (text between is skipped)
    fn next_sibling_element(&self) -> Option<Self>;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Element descendants in document order, excluding `self`
    fn descendant_elements(&self) -> Vec<Self>;

    /// Text nodes under this element in document order
    fn text_fragments(&self) -> Vec<String>;
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn descendant_elements(&self) -> Vec<Self> {
        self.descendants().skip(1).filter_map(ElementRef::wrap).collect()
    }

    fn text_fragments(&self) -> Vec<String> {
        self.text().map(str::to_string).collect()
    }
}

/// Element names that make up one key/value layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLayout {
    /// Element whose text is the label
    pub label_tag: String,
    /// Ancestor of the label that holds the key
    pub key_tag: String,
    /// Sibling of the key element that holds the value
    pub value_tag: String,
    /// Element whose `href` is preferred when a link is requested
    pub link_tag: String,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            label_tag: "span".to_string(),
            key_tag: "dt".to_string(),
            value_tag: "dd".to_string(),
            link_tag: "a".to_string(),
        }
    }
}

/// Looks up the value paired with the first label satisfying `is_label`
///
/// Only the first matching label is walked. Returns `None` when any step of
/// the walk fails or the value is blank. With `prefer_link`, a non-empty
/// `href` of the first link inside the value wins over its text.
pub fn find_labeled_value<N, I, F>(
    candidates: I,
    is_label: F,
    layout: &LabelLayout,
    prefer_link: bool,
) -> Option<String>
where
    N: MarkupNode,
    I: IntoIterator<Item = N>,
    F: Fn(&str) -> bool,
{
    let label = candidates
        .into_iter()
        .find(|node| node.tag_name() == layout.label_tag && is_label(&node.text_fragments().concat()))?;

    let key = ancestor_with_tag(&label, &layout.key_tag)?;
    let value = sibling_with_tag(&key, &layout.value_tag)?;

    if prefer_link {
        let href = value
            .descendant_elements()
            .into_iter()
            .find(|n| n.tag_name() == layout.link_tag && n.attribute("href").is_some())
            .and_then(|link| link.attribute("href").map(|h| h.trim().to_string()))
            .filter(|h| !h.is_empty());
        if href.is_some() {
            return href;
        }
    }

    joined_text(&value, " ")
}

/// Trimmed, non-empty text nodes joined with `separator`
pub fn joined_text<N: MarkupNode>(node: &N, separator: &str) -> Option<String> {
    let text = node
        .text_fragments()
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator);

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn ancestor_with_tag<N: MarkupNode>(node: &N, tag: &str) -> Option<N> {
    let mut current = node.parent_element();
    while let Some(candidate) = current {
        if candidate.tag_name() == tag {
            return Some(candidate);
        }
        current = candidate.parent_element();
    }
    None
}

fn sibling_with_tag<N: MarkupNode>(node: &N, tag: &str) -> Option<N> {
    let mut current = node.next_sibling_element();
    while let Some(candidate) = current {
        if candidate.tag_name() == tag {
            return Some(candidate);
        }
        current = candidate.next_sibling_element();
    }
    None
}

//! # Markup
//!
//! A small HTML tree produced by renderers and serialized with escaping.
//! Component libraries build [`Element`]s; views return [`Markup`].

use std::fmt::Write;

/// Elements that never carry children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Rendered output of a view, a layout node or a component slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Markup {
    #[default]
    Empty,
    Text(String),
    Element(Element),
    Fragment(Vec<Markup>),
}

/// A single HTML element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Markup>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier value with the same name.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Set a boolean attribute (`disabled`, `selected`, ...) when `on` is true.
    pub fn flag(self, name: impl Into<String>, on: bool) -> Self {
        if on {
            self.attr(name, "")
        } else {
            self
        }
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        let child = child.into();
        if child != Markup::Empty {
            self.children.push(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Markup>) -> Self {
        for child in children {
            self = self.child(child);
        }
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Markup::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}

impl From<Vec<Markup>> for Markup {
    fn from(children: Vec<Markup>) -> Self {
        Markup::fragment(children)
    }
}

impl Markup {
    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    /// Build a fragment, dropping empty children.
    pub fn fragment(children: impl IntoIterator<Item = Markup>) -> Self {
        let children: Vec<Markup> = children
            .into_iter()
            .filter(|c| *c != Markup::Empty)
            .collect();
        if children.is_empty() {
            Markup::Empty
        } else {
            Markup::Fragment(children)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Markup::Empty)
    }

    /// Serialize to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Markup::Empty => {}
            Markup::Text(text) => out.push_str(&escape_html(text)),
            Markup::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Markup::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                for (name, value) in &element.attrs {
                    if value.is_empty() {
                        let _ = write!(out, " {}", name);
                    } else {
                        let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }

    /// Concatenated text content of the tree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Markup::Empty => {}
            Markup::Text(text) => out.push_str(text),
            Markup::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
            Markup::Element(element) => element.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// All elements in document order matching `predicate`.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(predicate, &mut found);
        found
    }

    /// All elements with the given tag name.
    pub fn find_by_tag<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        self.find_all(&|e| e.tag == tag)
    }

    fn walk<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        match self {
            Markup::Empty | Markup::Text(_) => {}
            Markup::Fragment(children) => children.iter().for_each(|c| c.walk(predicate, found)),
            Markup::Element(element) => {
                if predicate(element) {
                    found.push(element);
                }
                element
                    .children
                    .iter()
                    .for_each(|c| c.walk(predicate, found));
            }
        }
    }
}

impl Element {
    /// Text content of this element's subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_escapes_text_and_attributes() {
        let markup: Markup = Element::new("a")
            .attr("href", "/x?a=1&b=\"2\"")
            .text("<Widget>")
            .into();
        assert_eq!(
            markup.to_html(),
            "<a href=\"/x?a=1&amp;b=&quot;2&quot;\">&lt;Widget&gt;</a>"
        );
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let markup: Markup = Element::new("input")
            .attr("type", "checkbox")
            .flag("disabled", true)
            .flag("checked", false)
            .into();
        assert_eq!(markup.to_html(), "<input type=\"checkbox\" disabled>");
    }

    #[test]
    fn test_fragment_drops_empty_children() {
        assert_eq!(Markup::fragment(vec![Markup::Empty]), Markup::Empty);
        let frag = Markup::fragment(vec![Markup::text("a"), Markup::Empty, Markup::text("b")]);
        assert_eq!(frag.to_html(), "ab");
    }

    #[test]
    fn test_find_by_tag_and_text_content() {
        let markup: Markup = Element::new("tr")
            .child(Element::new("th").text("Name"))
            .child(Element::new("th").text("Price"))
            .into();
        let headers = markup.find_by_tag("th");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1].text_content(), "Price");
        assert_eq!(markup.text_content(), "NamePrice");
    }

    #[test]
    fn test_attr_replaces_existing_value() {
        let el = Element::new("div").class("a").class("b");
        assert_eq!(el.get_attr("class"), Some("b"));
        assert!(el.has_class("b"));
    }
}

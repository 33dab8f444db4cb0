//! The parsed GSML tree.
//!
//! Tags, keys and values are kept as opaque strings; interpreting them is
//! the job of whatever consumes the tree.

use std::fmt;

/// Operator binding a key to its value or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GsmlOperator {
    /// `=`
    #[default]
    Assignment,
    /// `==`
    Equality,
    /// `!=`
    Inequality,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `+=`
    Addition,
    /// `-=`
    Subtraction,
}

impl GsmlOperator {
    /// Parse an operator token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Self::Assignment),
            "==" => Some(Self::Equality),
            "!=" => Some(Self::Inequality),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEqual),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEqual),
            "+=" => Some(Self::Addition),
            "-=" => Some(Self::Subtraction),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assignment => "=",
            Self::Equality => "==",
            Self::Inequality => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Addition => "+=",
            Self::Subtraction => "-=",
        }
    }
}

impl fmt::Display for GsmlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `key <op> value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsmlProperty {
    pub key: String,
    pub operator: GsmlOperator,
    pub value: String,
}

impl GsmlProperty {
    pub fn new(key: impl Into<String>, operator: GsmlOperator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }
}

/// One element of a block, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum GsmlElement {
    /// A bare value, e.g. the entries of `names = { a b c }`.
    Value(String),
    Property(GsmlProperty),
    Child(GsmlData),
}

/// A keyed entry of a block, as yielded by [`GsmlData::entries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Property(&'a GsmlProperty),
    Child(&'a GsmlData),
}

/// A block: an optional tag, the operator that bound it, and its elements.
///
/// The file root is a block with no tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GsmlData {
    tag: Option<String>,
    operator: GsmlOperator,
    elements: Vec<GsmlElement>,
}

impl GsmlData {
    /// Creates an empty block with the given tag bound by `=`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_operator(tag, GsmlOperator::Assignment)
    }

    pub fn with_operator(tag: impl Into<String>, operator: GsmlOperator) -> Self {
        Self {
            tag: Some(tag.into()),
            operator,
            elements: Vec::new(),
        }
    }

    /// Creates an anonymous block (file root, or `{ ... }` inside a list).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Tag of the block, or an empty string for anonymous blocks.
    pub fn tag_or_empty(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }

    pub fn operator(&self) -> GsmlOperator {
        self.operator
    }

    pub fn elements(&self) -> &[GsmlElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_elements(self) -> Vec<GsmlElement> {
        self.elements
    }

    pub fn push_value(&mut self, value: impl Into<String>) {
        self.elements.push(GsmlElement::Value(value.into()));
    }

    pub fn push_property(&mut self, property: GsmlProperty) {
        self.elements.push(GsmlElement::Property(property));
    }

    pub fn push_child(&mut self, child: GsmlData) {
        self.elements.push(GsmlElement::Child(child));
    }

    /// Builder form of [`push_value`](Self::push_value).
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.push_value(value);
        self
    }

    /// Builder form of [`push_property`](Self::push_property).
    pub fn property(
        mut self,
        key: impl Into<String>,
        operator: GsmlOperator,
        value: impl Into<String>,
    ) -> Self {
        self.push_property(GsmlProperty::new(key, operator, value));
        self
    }

    /// Builder shorthand for a `key = value` property.
    pub fn assign(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.property(key, GsmlOperator::Assignment, value)
    }

    /// Builder form of [`push_child`](Self::push_child).
    pub fn child(mut self, child: GsmlData) -> Self {
        self.push_child(child);
        self
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            GsmlElement::Value(v) => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &GsmlProperty> {
        self.elements.iter().filter_map(|e| match e {
            GsmlElement::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = &GsmlData> {
        self.elements.iter().filter_map(|e| match e {
            GsmlElement::Child(c) => Some(c),
            _ => None,
        })
    }

    pub fn for_each_property<E>(
        &self,
        mut f: impl FnMut(&GsmlProperty) -> Result<(), E>,
    ) -> Result<(), E> {
        self.properties().try_for_each(|p| f(p))
    }

    pub fn for_each_child<E>(&self, mut f: impl FnMut(&GsmlData) -> Result<(), E>) -> Result<(), E> {
        self.children().try_for_each(|c| f(c))
    }

    /// Properties and child blocks interleaved, in declaration order.
    /// Bare values are skipped.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.elements.iter().filter_map(|e| match e {
            GsmlElement::Property(p) => Some(Entry::Property(p)),
            GsmlElement::Child(c) => Some(Entry::Child(c)),
            GsmlElement::Value(_) => None,
        })
    }

    /// Value of the first property with this key.
    pub fn get_property_value(&self, key: &str) -> Option<&str> {
        self.properties()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// First child block with this tag.
    pub fn get_child(&self, tag: &str) -> Option<&GsmlData> {
        self.children().find(|c| c.tag() == Some(tag))
    }

    /// Total number of elements in this subtree (inclusive of nested blocks).
    pub fn element_count(&self) -> usize {
        self.elements
            .iter()
            .map(|e| match e {
                GsmlElement::Child(c) => 1 + c.element_count(),
                _ => 1,
            })
            .sum()
    }

    /// Renders the tree back to GSML text.
    pub fn to_gsml_string(&self) -> String {
        let mut out = String::new();
        self.write_elements(&mut out, 0);
        out
    }

    fn write_elements(&self, out: &mut String, depth: usize) {
        for element in &self.elements {
            out.push_str(&"\t".repeat(depth));
            match element {
                GsmlElement::Value(v) => {
                    out.push_str(&quote_if_needed(v));
                }
                GsmlElement::Property(p) => {
                    out.push_str(&format!(
                        "{} {} {}",
                        quote_if_needed(&p.key),
                        p.operator,
                        quote_if_needed(&p.value)
                    ));
                }
                GsmlElement::Child(c) => {
                    match c.tag() {
                        Some(tag) => out.push_str(&format!("{} {} {{\n", tag, c.operator)),
                        None => out.push_str("{\n"),
                    }
                    c.write_elements(out, depth + 1);
                    out.push_str(&"\t".repeat(depth));
                    out.push('}');
                }
            }
            out.push('\n');
        }
    }
}

fn quote_if_needed(s: &str) -> String {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || "{}=<>!#\"".contains(c)) {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip() {
        for op in ["=", "==", "!=", "<", "<=", ">", ">=", "+=", "-="] {
            assert_eq!(GsmlOperator::parse(op).unwrap().as_str(), op);
        }
        assert!(GsmlOperator::parse("=>").is_none());
    }

    #[test]
    fn test_element_order_is_preserved() {
        let data = GsmlData::anonymous()
            .assign("a", "1")
            .child(GsmlData::new("b"))
            .assign("c", "2");

        let order: Vec<_> = data
            .entries()
            .map(|e| match e {
                Entry::Property(p) => p.key.as_str(),
                Entry::Child(c) => c.tag_or_empty(),
            })
            .collect();

        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lookups() {
        let data = GsmlData::anonymous()
            .assign("name", "x")
            .child(GsmlData::new("inner").value("v1").value("v2"));

        assert_eq!(data.get_property_value("name"), Some("x"));
        assert_eq!(data.get_property_value("missing"), None);
        let inner = data.get_child("inner").unwrap();
        assert_eq!(inner.values().collect::<Vec<_>>(), vec!["v1", "v2"]);
        assert_eq!(data.element_count(), 4);
    }

    #[test]
    fn test_to_gsml_string_quotes_spaces() {
        let data = GsmlData::anonymous().assign("name", "two words");
        assert_eq!(data.to_gsml_string(), "name = \"two words\"\n");
    }
}

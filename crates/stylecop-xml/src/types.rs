//! Core types for editable XML trees.

/// Attribute name that declares the default namespace.
const XMLNS: &str = "xmlns";

/// A parsed XML document.
///
/// The root is optional: input consisting only of a declaration, comments or
/// nothing at all parses to a document without a root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDocument {
    /// The `<?xml ...?>` declaration, if the source had one.
    pub declaration: Option<XmlDeclaration>,

    /// Comments, processing instructions and the DOCTYPE before the root element.
    pub prolog: Vec<XmlMisc>,

    /// The root element of the document.
    pub root: Option<XmlElement>,

    /// Comments and processing instructions after the root element.
    pub epilog: Vec<XmlMisc>,
}

/// Document-level markup outside the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlMisc {
    /// A comment, stored verbatim.
    Comment(String),

    /// A processing instruction: target and data, without `<?` and `?>`.
    ProcessingInstruction(String),

    /// The DOCTYPE declaration body, without `<!DOCTYPE` and `>`.
    DocType(String),
}

/// The XML declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A namespace URI together with the prefix used to write it.
///
/// An empty `uri` with no prefix is the "no namespace" value, which is also
/// the [`Default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    /// The namespace URI (empty when the element is in no namespace).
    pub uri: String,

    /// The prefix bound to `uri`, or `None` for the default namespace.
    pub prefix: Option<String>,
}

/// An XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "msb" in `<msb:Project>`).
    pub prefix: Option<String>,

    /// Attributes of this element, in source order.
    pub attributes: Vec<XmlAttribute>,

    /// Child content of this element.
    pub children: XmlChildren,
}

/// An XML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// The local name of the attribute (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any.
    pub prefix: Option<String>,

    /// The attribute value (after unescaping XML entities).
    pub value: String,
}

/// Children of an XML element.
///
/// XML elements can contain:
/// - Only child elements (typical in project files)
/// - Only text content (e.g. `<OutputType>Library</OutputType>`)
/// - Mixed content (text, comments and elements interleaved)
/// - Nothing (empty element)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum XmlChildren {
    /// Element contains only child elements.
    Elements(Vec<XmlElement>),

    /// Element contains only text content (after unescaping XML entities).
    Text(String),

    /// Element contains mixed content.
    Mixed(Vec<XmlChild>),

    /// Element is empty (no content).
    #[default]
    Empty,
}

/// A single child in mixed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlChild {
    /// A child element.
    Element(XmlElement),

    /// Text content.
    Text(String),

    /// A comment, stored verbatim.
    Comment(String),

    /// A processing instruction: target and data, without `<?` and `?>`.
    ProcessingInstruction(String),
}

impl XmlDocument {
    /// The namespace of the root element, or the empty namespace when the
    /// document has no root.
    pub fn root_namespace(&self) -> Namespace {
        self.root
            .as_ref()
            .map(XmlElement::namespace)
            .unwrap_or_default()
    }
}

impl Namespace {
    /// Create a namespace from a URI and optional prefix.
    pub fn new(uri: impl Into<String>, prefix: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            prefix,
        }
    }

    /// Check if this is the empty (no) namespace.
    pub fn is_empty(&self) -> bool {
        self.uri.is_empty() && self.prefix.is_none()
    }
}

impl XmlElement {
    /// Create a new empty element with no prefix.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            attributes: Vec::new(),
            children: XmlChildren::Empty,
        }
    }

    /// Create a new empty element in the given namespace.
    ///
    /// The element takes the namespace's prefix so that, once attached below an
    /// element that declares the namespace, it serializes as a member of it.
    pub fn in_namespace(name: impl Into<String>, namespace: &Namespace) -> Self {
        Self {
            prefix: namespace.prefix.clone(),
            ..Self::new(name)
        }
    }

    /// Builder-style: add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style: replace the content with text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = XmlChildren::Text(text.into());
        self
    }

    /// Builder-style: append a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.append_child(child);
        self
    }

    /// The name as written in the source (`prefix:name` or `name`).
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name)
    }

    /// Resolve this element's namespace from the declarations on the element
    /// itself.
    ///
    /// Only the element's own `xmlns`/`xmlns:*` attributes are consulted, which
    /// is complete for a root element. A prefix with no declaration resolves to
    /// an empty URI but keeps the prefix.
    pub fn namespace(&self) -> Namespace {
        let declaration = match &self.prefix {
            Some(prefix) => self
                .attributes
                .iter()
                .find(|a| a.prefix.as_deref() == Some(XMLNS) && a.name == *prefix),
            None => self
                .attributes
                .iter()
                .find(|a| a.prefix.is_none() && a.name == XMLNS),
        };

        Namespace {
            uri: declaration.map(|a| a.value.clone()).unwrap_or_default(),
            prefix: self.prefix.clone(),
        }
    }

    /// Get an attribute value by name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an unprefixed attribute, replacing an existing one with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.prefix.is_none() && a.name == name)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(XmlAttribute::new(name, None, value)),
        }
    }

    /// Append a child element after all existing content.
    pub fn append_child(&mut self, child: XmlElement) {
        self.children = match std::mem::take(&mut self.children) {
            XmlChildren::Empty => XmlChildren::Elements(vec![child]),
            XmlChildren::Elements(mut elements) => {
                elements.push(child);
                XmlChildren::Elements(elements)
            }
            XmlChildren::Text(text) => {
                XmlChildren::Mixed(vec![XmlChild::Text(text), XmlChild::Element(child)])
            }
            XmlChildren::Mixed(mut children) => {
                children.push(XmlChild::Element(child));
                XmlChildren::Mixed(children)
            }
        };
    }

    /// Check if this element has child elements.
    pub fn has_elements(&self) -> bool {
        !self.all_children().is_empty()
    }

    /// Check if this element has text content.
    pub fn has_text(&self) -> bool {
        matches!(&self.children, XmlChildren::Text(_))
    }

    /// Check if this element is empty.
    pub fn is_empty(&self) -> bool {
        matches!(&self.children, XmlChildren::Empty)
    }

    /// Get text content, if this element contains only text.
    pub fn text(&self) -> Option<&str> {
        match &self.children {
            XmlChildren::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Get child elements by local name.
    pub fn get_children(&self, name: &str) -> Vec<&XmlElement> {
        self.all_children()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    /// Get all child elements (ignoring text and comments in mixed content).
    pub fn all_children(&self) -> Vec<&XmlElement> {
        match &self.children {
            XmlChildren::Elements(elements) => elements.iter().collect(),
            XmlChildren::Mixed(children) => children
                .iter()
                .filter_map(|c| match c {
                    XmlChild::Element(e) => Some(e),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    /// Get the last child element, if any.
    pub fn last_child(&self) -> Option<&XmlElement> {
        self.all_children().pop()
    }
}

impl XmlAttribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, prefix: Option<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix,
            value: value.into(),
        }
    }

    /// The name as written in the source (`prefix:name` or `name`).
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name)
    }
}

fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}

//! XML parser that builds editable XmlDocument trees.

use crate::{
    Error, Result, XmlAttribute, XmlChild, XmlChildren, XmlDeclaration, XmlDocument, XmlElement,
    XmlMisc,
};
use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

/// Prefixes bound by the XML specification itself.
const RESERVED_PREFIXES: [&str; 2] = ["xml", "xmlns"];

/// Parse XML from a string, producing an XmlDocument tree.
///
/// Whitespace-only text between elements is dropped; the writer re-creates
/// indentation. Comments, processing instructions and the DOCTYPE are kept.
///
/// # Example
///
/// ```rust
/// use stylecop_xml::parse;
///
/// let doc = parse("<Project><ItemGroup/></Project>").unwrap();
/// let root = doc.root.unwrap();
/// assert_eq!(root.name, "Project");
/// assert_eq!(root.get_children("ItemGroup").len(), 1);
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed, has more than one root element,
/// uses a namespace prefix that no enclosing element declares, or ends before
/// every element is closed. Input without any element is not
/// an error; it yields a document whose `root` is `None`.
pub fn parse(content: &str) -> Result<XmlDocument> {
    // Generated project files are often written with a byte order mark
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of elements being built.
    stack: Vec<BuildNode>,

    /// The document being assembled.
    document: XmlDocument,
}

/// A node being constructed during parsing.
struct BuildNode {
    /// Element name.
    name: String,

    /// Namespace prefix, if any.
    prefix: Option<String>,

    /// Attributes of this element.
    attributes: Vec<XmlAttribute>,

    /// Prefixes bound by `xmlns:*` attributes on this element.
    declared: Vec<String>,

    /// Child elements, text and comments accumulated so far.
    children: Vec<XmlChild>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            stack: Vec::new(),
            document: XmlDocument::default(),
        }
    }

    fn parse(&mut self) -> Result<XmlDocument> {
        loop {
            let event_start = self.reader.buffer_position();

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.handle_start(&e)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(&e)?;
                    self.attach(element)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(&e)?;
                    self.attach(element)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(&e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    self.push_text(text, event_start)?;
                }
                Ok(Event::Comment(e)) => {
                    self.handle_comment(&e);
                }
                Ok(Event::Decl(e)) => {
                    self.handle_decl(&e)?;
                }
                Ok(Event::PI(e)) => {
                    self.handle_pi(&e);
                }
                Ok(Event::DocType(e)) => {
                    self.handle_doctype(&e)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        // Check for unclosed elements
        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", qualified(&node.prefix, &node.name)),
            });
        }

        Ok(std::mem::take(&mut self.document))
    }

    /// Attach a completed element to its parent, or make it the root.
    fn attach(&mut self, element: XmlElement) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(XmlChild::Element(element)),
            None => {
                if self.document.root.is_some() {
                    return Err(Error::MultipleRoots);
                }
                self.document.root = Some(element);
            }
        }
        Ok(())
    }

    fn handle_start(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let (name, prefix) = split_name(e.name().as_ref());
        let attributes = parse_attributes(e)?;
        let declared = declared_prefixes(&attributes);
        self.check_prefixes(prefix.as_deref(), &attributes, &declared)?;

        self.stack.push(BuildNode {
            name,
            prefix,
            attributes,
            declared,
            children: Vec::new(),
        });

        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) -> Result<XmlElement> {
        let (end_name, end_prefix) = split_name(e.name().as_ref());

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("Unexpected closing tag </{}>", qualified(&end_prefix, &end_name)),
        })?;

        // Verify tag names match
        if node.name != end_name || node.prefix != end_prefix {
            return Err(Error::MismatchedEndTag {
                expected: qualified(&node.prefix, &node.name),
                found: qualified(&end_prefix, &end_name),
            });
        }

        Ok(XmlElement {
            name: node.name,
            prefix: node.prefix,
            attributes: node.attributes,
            children: finalize_children(node.children),
        })
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>) -> Result<XmlElement> {
        let (name, prefix) = split_name(e.name().as_ref());
        let attributes = parse_attributes(e)?;
        let declared = declared_prefixes(&attributes);
        self.check_prefixes(prefix.as_deref(), &attributes, &declared)?;

        Ok(XmlElement {
            name,
            prefix,
            attributes,
            children: XmlChildren::Empty,
        })
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: u64) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start),
        })?;

        // Indentation between elements carries no meaning
        if text.trim().is_empty() {
            return Ok(());
        }

        self.push_text(text.into_owned(), event_start)
    }

    fn push_text(&mut self, text: String, event_start: u64) -> Result<()> {
        match self.stack.last_mut() {
            Some(node) => {
                node.children.push(XmlChild::Text(text));
                Ok(())
            }
            None => Err(Error::XmlSyntax {
                message: "Text outside of the root element".to_string(),
                position: Some(event_start),
            }),
        }
    }

    /// Every prefix on an element or its attributes must be bound on the
    /// element itself or on an open ancestor.
    fn check_prefixes(
        &self,
        prefix: Option<&str>,
        attributes: &[XmlAttribute],
        declared: &[String],
    ) -> Result<()> {
        let is_bound = |p: &str| {
            RESERVED_PREFIXES.contains(&p)
                || declared.iter().any(|d| d == p)
                || self
                    .stack
                    .iter()
                    .any(|node| node.declared.iter().any(|d| d == p))
        };

        let mut used = prefix
            .into_iter()
            .chain(attributes.iter().filter_map(|a| a.prefix.as_deref()));
        match used.find(|&p| !is_bound(p)) {
            Some(unbound) => Err(Error::InvalidStructure {
                message: format!("Undeclared namespace prefix '{}'", unbound),
            }),
            None => Ok(()),
        }
    }

    fn handle_comment(&mut self, e: &BytesText<'_>) {
        let comment = String::from_utf8_lossy(e).into_owned();

        match self.stack.last_mut() {
            Some(node) => node.children.push(XmlChild::Comment(comment)),
            None => self.push_misc(XmlMisc::Comment(comment)),
        }
    }

    fn handle_pi(&mut self, e: &BytesPI<'_>) {
        let instruction = String::from_utf8_lossy(e).into_owned();

        match self.stack.last_mut() {
            Some(node) => node
                .children
                .push(XmlChild::ProcessingInstruction(instruction)),
            None => self.push_misc(XmlMisc::ProcessingInstruction(instruction)),
        }
    }

    fn handle_doctype(&mut self, e: &BytesText<'_>) -> Result<()> {
        if !self.stack.is_empty() || self.document.root.is_some() {
            return Err(Error::InvalidStructure {
                message: "DOCTYPE must appear before the root element".to_string(),
            });
        }

        let doctype = String::from_utf8_lossy(e).trim().to_string();
        self.document.prolog.push(XmlMisc::DocType(doctype));
        Ok(())
    }

    /// Markup outside the root goes before or after it depending on whether
    /// the root has been seen yet.
    fn push_misc(&mut self, misc: XmlMisc) {
        if self.document.root.is_some() {
            self.document.epilog.push(misc);
        } else {
            self.document.prolog.push(misc);
        }
    }

    fn handle_decl(&mut self, e: &BytesDecl<'_>) -> Result<()> {
        let version = String::from_utf8_lossy(&e.version()?).into_owned();
        let encoding = e
            .encoding()
            .transpose()?
            .map(|v| String::from_utf8_lossy(&v).into_owned());
        let standalone = e
            .standalone()
            .transpose()?
            .map(|v| String::from_utf8_lossy(&v).into_owned());

        self.document.declaration = Some(XmlDeclaration {
            version,
            encoding,
            standalone,
        });
        Ok(())
    }
}

fn parse_attributes(e: &BytesStart<'_>) -> Result<Vec<XmlAttribute>> {
    let mut attributes = Vec::new();

    for attr_result in e.attributes() {
        let attr = attr_result?;
        let (name, prefix) = split_name(attr.key.as_ref());

        let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid attribute value: {}", err),
            position: None,
        })?;

        attributes.push(XmlAttribute {
            name,
            prefix,
            value: value.into_owned(),
        });
    }

    Ok(attributes)
}

/// Prefixes declared by `xmlns:p="..."` attributes.
fn declared_prefixes(attributes: &[XmlAttribute]) -> Vec<String> {
    attributes
        .iter()
        .filter(|a| a.prefix.as_deref() == Some("xmlns"))
        .map(|a| a.name.clone())
        .collect()
}

/// Split a raw `prefix:local` name into its local part and optional prefix.
fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full_name = String::from_utf8_lossy(raw);

    match full_name.split_once(':') {
        Some((prefix, local_name)) => (local_name.to_string(), Some(prefix.to_string())),
        None => (full_name.into_owned(), None),
    }
}

fn qualified(prefix: &Option<String>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}

fn finalize_children(children: Vec<XmlChild>) -> XmlChildren {
    if children.is_empty() {
        return XmlChildren::Empty;
    }

    let all_elements = children.iter().all(|c| matches!(c, XmlChild::Element(_)));
    let single_text = children.len() == 1 && matches!(&children[0], XmlChild::Text(_));

    if all_elements {
        let elements = children
            .into_iter()
            .filter_map(|c| match c {
                XmlChild::Element(e) => Some(e),
                _ => None,
            })
            .collect();
        XmlChildren::Elements(elements)
    } else if single_text {
        match children.into_iter().next() {
            Some(XmlChild::Text(content)) => XmlChildren::Text(content),
            _ => unreachable!(),
        }
    } else {
        XmlChildren::Mixed(children)
    }
}

//! Serialization of XmlDocument trees back to text.

use crate::{Error, Result, XmlChild, XmlChildren, XmlDocument, XmlElement, XmlMisc};
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::fmt;
use std::io;

/// Options controlling how a document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Emit the `<?xml ...?>` declaration when the document has one.
    pub declaration: bool,

    /// Number of spaces per nesting level.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            declaration: false,
            indent: 2,
        }
    }
}

impl WriteOptions {
    /// Options for persisting a document to disk: declaration included.
    pub fn for_file() -> Self {
        Self {
            declaration: true,
            ..Self::default()
        }
    }
}

/// Write `doc` to `out` as indented XML.
///
/// Text and attribute values are escaped. Line breaks and tabs in attribute
/// values become character references so readers do not normalize them to
/// spaces. Comments, processing instructions and the DOCTYPE are written
/// verbatim.
pub fn write_document<W: io::Write>(
    doc: &XmlDocument,
    out: W,
    options: &WriteOptions,
) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', options.indent);

    if let Some(decl) = doc.declaration.as_ref().filter(|_| options.declaration) {
        writer.write_event(Event::Decl(BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        )))?;
    }

    for misc in &doc.prolog {
        write_misc(&mut writer, misc)?;
    }
    if let Some(root) = &doc.root {
        write_element(&mut writer, root)?;
    }
    for misc in &doc.epilog {
        write_misc(&mut writer, misc)?;
    }

    Ok(())
}

/// Serialize `doc` into a string.
pub fn document_to_string(doc: &XmlDocument, options: &WriteOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(doc, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|err| Error::InvalidStructure {
        message: format!("Serialized XML is not UTF-8: {}", err),
    })
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let name = element.qualified_name();
    let mut start = BytesStart::new(name.as_str());
    for attr in &element.attributes {
        let value = escape_attribute_value(&attr.value);
        start.push_attribute((attr.qualified_name().as_bytes(), value.as_bytes()));
    }

    match &element.children {
        XmlChildren::Empty => {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        XmlChildren::Elements(elements) => {
            writer.write_event(Event::Start(start))?;
            for child in elements {
                write_element(writer, child)?;
            }
        }
        XmlChildren::Text(text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        XmlChildren::Mixed(children) => {
            writer.write_event(Event::Start(start))?;
            for child in children {
                match child {
                    XmlChild::Element(e) => write_element(writer, e)?,
                    XmlChild::Text(text) => {
                        writer.write_event(Event::Text(BytesText::new(text)))?;
                    }
                    XmlChild::Comment(comment) => write_comment(writer, comment)?,
                    XmlChild::ProcessingInstruction(instruction) => {
                        writer.write_event(Event::PI(BytesPI::new(instruction.as_str())))?;
                    }
                }
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

fn write_comment<W: io::Write>(writer: &mut Writer<W>, comment: &str) -> Result<()> {
    writer.write_event(Event::Comment(BytesText::from_escaped(comment)))?;
    Ok(())
}

fn write_misc<W: io::Write>(writer: &mut Writer<W>, misc: &XmlMisc) -> Result<()> {
    match misc {
        XmlMisc::Comment(comment) => write_comment(writer, comment)?,
        XmlMisc::ProcessingInstruction(instruction) => {
            writer.write_event(Event::PI(BytesPI::new(instruction.as_str())))?;
        }
        XmlMisc::DocType(doctype) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        }
    }
    Ok(())
}

/// Escape markup characters plus `\n`, `\r` and `\t`.
///
/// The byte-tuple form of `push_attribute` writes the value as given, so all
/// escaping happens here.
fn escape_attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in escape(value).chars() {
        match c {
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Indented XML without the declaration.
impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = document_to_string(self, &WriteOptions::default()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

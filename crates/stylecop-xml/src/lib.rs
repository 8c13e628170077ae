//! Editable XML trees for project descriptor files.
//!
//! This crate wraps [`quick-xml`] to provide an owned tree of [`XmlElement`]s
//! that can be mutated in place and written back out. It is the document model
//! behind `stylecop-project`, which appends analyzer references to MSBuild
//! project files.
//!
//! # Overview
//!
//! The main types are:
//! - [`XmlDocument`]: The parsed document (declaration, prolog and epilog markup, optional root)
//! - [`XmlMisc`]: A comment, processing instruction or DOCTYPE outside the root
//! - [`XmlElement`]: An element with name, prefix, attributes and children
//! - [`XmlAttribute`]: An attribute with name, prefix and unescaped value
//! - [`XmlChildren`]: Element content (elements, text, mixed, or empty)
//! - [`Namespace`]: The namespace URI and prefix an element lives in
//!
//! # Example
//!
//! ```rust
//! use stylecop_xml::{parse, XmlElement};
//!
//! let mut doc = parse(r#"<Project xmlns="urn:build">
//!   <PropertyGroup/>
//! </Project>"#).unwrap();
//!
//! let ns = doc.root_namespace();
//! assert_eq!(ns.uri, "urn:build");
//!
//! let group = XmlElement::in_namespace("ItemGroup", &ns);
//! doc.root.as_mut().unwrap().append_child(group);
//!
//! assert_eq!(doc.root.as_ref().unwrap().get_children("ItemGroup").len(), 1);
//! ```
//!
//! # Documents without a root
//!
//! Unlike a strict XML parser, [`parse`] accepts input that contains no
//! element at all (an empty string, or only a declaration and comments). The
//! resulting [`XmlDocument::root`] is `None` and it is up to the caller to
//! decide whether that is an error.

pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export main types
pub use error::{Error, Result};
pub use parser::parse;
pub use types::{
    Namespace, XmlAttribute, XmlChild, XmlChildren, XmlDeclaration, XmlDocument, XmlElement,
    XmlMisc,
};
pub use writer::{WriteOptions, document_to_string, write_document};

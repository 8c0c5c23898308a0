//! Source citations attached to assistant answers.
//!
//! Each citation references a document, a statute, or an entry in the
//! internal knowledge base, serialized with the wire tags the answering
//! backend emits (`DOCUMENTO`, `LEI`, `BASE INTERNA`).

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// The kind of source backing a citation.
///
/// This enum is closed: every answer source falls into exactly one of these
/// three categories, and each maps to exactly one display icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SourceKind {
    /// A document submitted or held by the office.
    #[serde(rename = "DOCUMENTO")]
    #[strum(serialize = "DOCUMENTO")]
    Document,
    /// A statute or normative act.
    #[serde(rename = "LEI")]
    #[strum(serialize = "LEI")]
    Statute,
    /// An entry in the internal knowledge base.
    #[serde(rename = "BASE INTERNA")]
    #[strum(serialize = "BASE INTERNA")]
    InternalBase,
}

impl SourceKind {
    /// Returns the display icon identifier for this kind.
    ///
    /// Total over all variants; given the same kind twice, returns the same
    /// identifier.
    pub fn icon(&self) -> &'static str {
        match self {
            SourceKind::Document => "file-text",
            SourceKind::Statute => "scale",
            SourceKind::InternalBase => "book-open",
        }
    }
}

/// A structured reference supporting an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// The category of the source.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Human-readable title of the source.
    pub title: String,
    /// Optional article/section reference within the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Citation {
    pub fn new(kind: SourceKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

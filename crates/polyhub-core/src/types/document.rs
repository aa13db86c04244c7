//! Structured references to externally stored documents.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to an uploaded document. The marketplace never stores file
/// content itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Identifier assigned by the storage provider.
    pub id: String,
    /// Original file name.
    pub name: String,
    /// MIME type or extension reported by the uploader.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Download location.
    pub file_url: String,
    /// Inline preview location.
    #[serde(default)]
    pub view_url: Option<String>,
    /// Upload time reported by the storage provider.
    #[serde(default)]
    pub uploaded_at: Option<Timestamp>,
}

impl DocumentRef {
    /// Parses a document reference serialized as a JSON string.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Quotation document as submitted by a seller: either already structured
/// or serialized into a string by a form upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum QuotationDocument {
    Structured(DocumentRef),
    Serialized(String),
}

impl QuotationDocument {
    /// Resolves the submitted value into a structured reference.
    pub fn resolve(self) -> serde_json::Result<DocumentRef> {
        match self {
            Self::Structured(document) => Ok(document),
            Self::Serialized(raw) => DocumentRef::parse(&raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serialized_reference() -> anyhow::Result<()> {
        let raw = r#"{"id":"f-1","name":"quote.pdf","type":"application/pdf","fileUrl":"https://files/f-1","viewUrl":"https://view/f-1","uploadedAt":"2026-03-01T10:00:00Z"}"#;
        let document = QuotationDocument::Serialized(raw.to_owned()).resolve()?;

        assert_eq!(document.name, "quote.pdf");
        assert_eq!(document.kind.as_deref(), Some("application/pdf"));
        assert!(document.uploaded_at.is_some());
        Ok(())
    }

    #[test]
    fn rejects_malformed_reference() {
        let document = QuotationDocument::Serialized("{not json".to_owned());
        assert!(document.resolve().is_err());
    }
}

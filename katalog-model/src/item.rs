#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single catalog entry as persisted inside a partition.
///
/// Items are immutable once stored; the only lifecycle transitions are
/// creation and deletion. Field names follow the stored JSON layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Opaque identifier, unique across every partition.
    pub id: String,
    /// Display name, stored trimmed.
    pub nama: String,
    /// Unit price, finite and strictly positive.
    pub harga: f64,
    /// Unit of sale ("pcs", "kg", ...), stored trimmed.
    pub satuan: String,
    /// Image as a `data:image/<fmt>;base64,<payload>` URI.
    pub base64: String,
    /// Creation time in Unix milliseconds. Legacy rows without it sort first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: i64,
}

impl Item {
    pub fn has_id(&self, id: &str) -> bool {
        self.id == id
    }

    /// Declared mime type of the embedded data URI, if any.
    pub fn declared_mime(&self) -> Option<&str> {
        let rest = self.base64.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        let mime = &rest[..end];
        (!mime.is_empty()).then_some(mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_uri(uri: &str) -> Item {
        Item {
            id: "a".into(),
            nama: "Beras".into(),
            harga: 12_000.0,
            satuan: "kg".into(),
            base64: uri.into(),
            timestamp: 1,
        }
    }

    #[test]
    fn declared_mime_reads_data_uri_header() {
        let item = item_with_uri("data:image/png;base64,SGVsbG8=");
        assert_eq!(item.declared_mime(), Some("image/png"));
    }

    #[test]
    fn declared_mime_is_none_for_raw_payload() {
        let item = item_with_uri("SGVsbG8=");
        assert_eq!(item.declared_mime(), None);

        let empty = item_with_uri("data:;base64,SGVsbG8=");
        assert_eq!(empty.declared_mime(), None);
    }
}

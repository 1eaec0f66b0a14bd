use serde::{Deserialize, Serialize};

/// Body of `POST /api/tambah`.
///
/// Every field is optional at the type level so that validation can report
/// all missing fields at once instead of stopping at the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewItemRequest {
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub harga: Option<PriceInput>,
    #[serde(default)]
    pub satuan: Option<String>,
    #[serde(default)]
    pub base64: Option<String>,
}

/// Price as submitted by a form: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Numeric value, if the input is a number or parses as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PriceInput::Number(value) => Some(*value),
            PriceInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<f64> for PriceInput {
    fn from(value: f64) -> Self {
        PriceInput::Number(value)
    }
}

/// Query of `GET /api/list`. Values are kept as text and parsed leniently:
/// anything that is not an integer falls back to the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> Option<i64> {
        parse_lenient(self.page.as_deref())
    }

    pub fn limit(&self) -> Option<i64> {
        parse_lenient(self.limit.as_deref())
    }
}

fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemResponse {
    pub success: bool,
    pub id: String,
    /// Partition that absorbed the write.
    pub stored_in: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteItemRequest {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
    pub const FAILED: Self = Self { success: false };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsClearResponse {
    pub success: bool,
    pub deleted: usize,
}

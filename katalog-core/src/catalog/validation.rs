use crate::api::NewItemRequest;
use crate::error::{CatalogError, Result, ValidationErrors};

pub const NAMA_REQUIRED: &str = "Nama barang harus diisi";
pub const HARGA_INVALID: &str = "Harga harus angka positif";
pub const SATUAN_REQUIRED: &str = "Satuan harus diisi";
pub const GAMBAR_INVALID: &str = "Gambar tidak valid";

const DATA_URI_PREFIX: &str = "data:image/";

/// Input that passed validation, already trimmed and normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidItem {
    pub nama: String,
    pub harga: f64,
    pub satuan: String,
    pub base64: String,
}

/// Checks every field of `input` and reports all violations together.
pub fn validate_new_item(input: &NewItemRequest) -> Result<ValidItem> {
    let mut errors = ValidationErrors::default();

    let nama = non_blank(input.nama.as_deref());
    if nama.is_none() {
        errors.push("nama", NAMA_REQUIRED);
    }

    let harga = input
        .harga
        .as_ref()
        .and_then(|price| price.as_number())
        .filter(|value| value.is_finite() && *value > 0.0);
    if harga.is_none() {
        errors.push("harga", HARGA_INVALID);
    }

    let satuan = non_blank(input.satuan.as_deref());
    if satuan.is_none() {
        errors.push("satuan", SATUAN_REQUIRED);
    }

    let base64 = input
        .base64
        .as_deref()
        .filter(|uri| uri.starts_with(DATA_URI_PREFIX));
    if base64.is_none() {
        errors.push("base64", GAMBAR_INVALID);
    }

    let (Some(nama), Some(harga), Some(satuan), Some(base64)) =
        (nama, harga, satuan, base64)
    else {
        return Err(CatalogError::Validation(errors));
    };

    Ok(ValidItem {
        nama: nama.to_string(),
        harga,
        satuan: satuan.to_string(),
        base64: base64.to_string(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

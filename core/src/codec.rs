//! String-safe encoding of a product record for navigation arguments.
//!
//! # Design
//! A route argument is a single string that the router percent-escapes once
//! on the way out and unescapes once on the way in. The token built here
//! must survive that round trip unchanged, and must decode back to exactly
//! the record that went in.
//!
//! Free-text fields are base64-encoded (standard alphabet, padded) and every
//! `/` of the base64 output is replaced by `_`. The locator field is
//! percent-escaped instead, so its URL survives verbatim. The transformed
//! record is serialized as JSON. `decode` undoes each step in reverse order.
//!
//! `_` never appears in standard base64 output and raw text is encoded before
//! the substitution, so an underscore in the original text cannot be
//! confused with a placeholder. The constants below enforce that at compile
//! time.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::DecodeError;
use crate::types::Product;

const BASE64_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// RFC 3986 reserved characters plus the escape character itself.
const URL_RESERVED: &[u8] = b":/?#[]@!$&'()*+,;=%";

/// Symbol of the base64 alphabet that collides with the router's escaping.
const RESERVED_SYMBOL: char = '/';
const PLACEHOLDER: char = '_';

const fn contains(set: &[u8], c: u8) -> bool {
    let mut i = 0;
    while i < set.len() {
        if set[i] == c {
            return true;
        }
        i += 1;
    }
    false
}

const _: () = assert!(
    !contains(BASE64_ALPHABET, PLACEHOLDER as u8),
    "placeholder overlaps the base64 alphabet; decoding would be ambiguous"
);
const _: () = assert!(
    !contains(URL_RESERVED, PLACEHOLDER as u8),
    "placeholder is reserved by URL escaping; decoding would be ambiguous"
);
const _: () = assert!(contains(BASE64_ALPHABET, RESERVED_SYMBOL as u8));

/// The product record carried by the product-details route.
///
/// `price` must be finite; JSON has no representation for NaN or infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRoute {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub category_id: u32,
    pub description: String,
    pub image: String,
}

impl From<&Product> for ProductRoute {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            category_id: product.category_id,
            description: product.description.clone(),
            image: product.image.clone(),
        }
    }
}

/// Opaque token produced by `encode`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedToken(String);

impl EncodedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn encode(record: &ProductRoute) -> EncodedToken {
    let wire = json!({
        "id": record.id,
        "title": encode_text(&record.title),
        "price": record.price,
        "categoryId": record.category_id,
        "description": encode_text(&record.description),
        "image": urlencoding::encode(&record.image),
    });
    EncodedToken(wire.to_string())
}

pub fn decode(token: &str) -> Result<ProductRoute, DecodeError> {
    let wire: ProductRoute = serde_json::from_str(token)?;
    let image = urlencoding::decode(&wire.image)
        .map_err(|source| DecodeError::Locator { source })?
        .into_owned();
    let description = decode_text("description", &wire.description)?;
    let title = decode_text("title", &wire.title)?;
    Ok(ProductRoute {
        title,
        description,
        image,
        ..wire
    })
}

fn encode_text(text: &str) -> String {
    STANDARD
        .encode(text.as_bytes())
        .replace(RESERVED_SYMBOL, &PLACEHOLDER.to_string())
}

fn decode_text(field: &'static str, encoded: &str) -> Result<String, DecodeError> {
    // A bare `/` means the value skipped the substitution; reject rather than guess.
    if encoded.contains(RESERVED_SYMBOL) {
        return Err(DecodeError::UnescapedSymbol { field });
    }
    let restored = encoded.replace(PLACEHOLDER, &RESERVED_SYMBOL.to_string());
    let bytes = STANDARD
        .decode(restored.as_bytes())
        .map_err(|source| DecodeError::Base64 { field, source })?;
    String::from_utf8(bytes).map_err(|_| DecodeError::Utf8 { field })
}

//! Extension identity derivation.
//!
//! # Responsibility
//! - Derive the 32-character extension id from a public key or a path seed.
//! - Decode and format PEM-wrapped keys.
//!
//! # Invariants
//! - Ids are exactly 32 characters from `a..=p`, so they never look like a
//!   numeric host.
//! - The same seed always yields the same id.

use std::error::Error;
use std::fmt::{Display, Formatter};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Stable extension identifier (`[a-p]{32}`).
pub type ExtensionId = String;

/// Number of SHA-256 bytes kept for an id.
pub const ID_SIZE: usize = 16;

const PEM_OUTPUT_COLUMNS: usize = 65;
const KEY_BEGIN_HEADER_MARKER: &str = "-----BEGIN";
const KEY_BEGIN_FOOTER_MARKER: &str = "-----END";
const KEY_INFO_END_MARKER: &str = "KEY-----";
const PUBLIC: &str = "PUBLIC";
const PRIVATE: &str = "PRIVATE";

/// Computes the extension id for `seed`.
pub fn generate_id(seed: &[u8]) -> ExtensionId {
    let digest = Sha256::digest(seed);
    let hex = hex::encode(&digest[..ID_SIZE]);
    hex.chars().map(hex_digit_to_id_char).collect()
}

fn hex_digit_to_id_char(digit: char) -> char {
    match digit.to_digit(16) {
        Some(value) => (b'a' + value as u8) as char,
        None => 'a',
    }
}

/// Returns true when `id` is 32 characters, all in `a..=p` once lowercased.
pub fn id_is_valid(id: &str) -> bool {
    id.len() == ID_SIZE * 2
        && id
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .all(|c| ('a'..='p').contains(&c))
}

/// Key decoding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    Empty,
    MissingHeader,
    MissingFooter,
    EmptyBody,
    InvalidBase64,
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "key must not be empty"),
            Self::MissingHeader => write!(f, "PEM header is incomplete"),
            Self::MissingFooter => write!(f, "PEM footer is missing"),
            Self::EmptyBody => write!(f, "PEM body is empty"),
            Self::InvalidBase64 => write!(f, "key is not valid base64"),
        }
    }
}

impl Error for KeyError {}

/// Decodes a base64 key, optionally wrapped in PEM markers.
pub fn parse_pem_key_bytes(input: &str) -> Result<Vec<u8>, KeyError> {
    if input.is_empty() {
        return Err(KeyError::Empty);
    }

    let body: String = if input.starts_with(KEY_BEGIN_HEADER_MARKER) {
        let header_end = input[KEY_BEGIN_HEADER_MARKER.len()..]
            .find(KEY_INFO_END_MARKER)
            .map(|offset| KEY_BEGIN_HEADER_MARKER.len() + offset + KEY_INFO_END_MARKER.len())
            .ok_or(KeyError::MissingHeader)?;
        let footer_start = input
            .rfind(KEY_BEGIN_FOOTER_MARKER)
            .ok_or(KeyError::MissingFooter)?;
        if header_end >= footer_start {
            return Err(KeyError::EmptyBody);
        }
        input[header_end..footer_start]
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect()
    } else {
        input.to_string()
    };

    if body.is_empty() {
        return Err(KeyError::EmptyBody);
    }
    STANDARD
        .decode(body.as_bytes())
        .map_err(|_| KeyError::InvalidBase64)
}

/// Base64-encodes raw key bytes. Returns `None` for empty input.
pub fn produce_pem(key_bytes: &[u8]) -> Option<String> {
    if key_bytes.is_empty() {
        return None;
    }
    Some(STANDARD.encode(key_bytes))
}

/// Wraps base64 text in PEM markers at 65 columns.
pub fn format_pem_for_output(base64_key: &str, is_public: bool) -> Option<String> {
    if base64_key.is_empty() {
        return None;
    }
    let kind = if is_public { PUBLIC } else { PRIVATE };
    let mut output = format!("{KEY_BEGIN_HEADER_MARKER} {kind} {KEY_INFO_END_MARKER}\n");
    let bytes = base64_key.as_bytes();
    for chunk in bytes.chunks(PEM_OUTPUT_COLUMNS) {
        output.push_str(&String::from_utf8_lossy(chunk));
        output.push('\n');
    }
    output.push_str(&format!(
        "{KEY_BEGIN_FOOTER_MARKER} {kind} {KEY_INFO_END_MARKER}\n"
    ));
    Some(output)
}

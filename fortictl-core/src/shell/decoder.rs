//! Byte-to-text decoding for scraped shell output
//!
//! The appliance does not announce its output encoding. Each encoding of the
//! chain is tried in order and the first clean decode wins; Latin-1 maps every
//! byte to a code point and closes the chain, so decoding never fails.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Encodings known to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "cp1252")]
    Cp1252,
    #[serde(rename = "ascii")]
    Ascii,
}

/// Windows-1252 code points for bytes 0x80..=0x9F; `None` marks undefined bytes
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl TextEncoding {
    /// Default priority order
    pub const DEFAULT_CHAIN: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
        TextEncoding::Ascii,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Strict decode; `None` if any byte is invalid in this encoding
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Latin1 => Some(decode_latin1(bytes)),
            TextEncoding::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
            TextEncoding::Ascii => {
                if bytes.is_ascii() {
                    Some(bytes.iter().map(|&b| char::from(b)).collect())
                } else {
                    None
                }
            }
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decoder over an ordered encoding chain
#[derive(Debug, Clone)]
pub struct Decoder {
    chain: Vec<TextEncoding>,
}

impl Decoder {
    pub fn new(chain: Vec<TextEncoding>) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &[TextEncoding] {
        &self.chain
    }

    /// Decode bytes with the first encoding that accepts them
    pub fn decode(&self, bytes: &[u8]) -> String {
        for encoding in &self.chain {
            if let Some(text) = encoding.decode(bytes) {
                debug!("Decoded {} bytes as {}", bytes.len(), encoding.label());
                return text;
            }
        }

        debug!(
            "No encoding in chain accepted {} bytes, falling back to latin-1",
            bytes.len()
        );
        decode_latin1(bytes)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(TextEncoding::DEFAULT_CHAIN.to_vec())
    }
}

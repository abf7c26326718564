//! Abstraction over the PDF library.
//!
//! The [`PdfBackend`] trait is the only seam through which the rest of the
//! crate touches a PDF document, so the content-stream interpreter can be
//! tested against mock implementations without real PDF bytes. The concrete
//! implementation wraps [`lopdf::Document`].

use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::LayoutError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation).
pub type PageId = (u32, u16);

/// Font information pulled from a page's resource dictionary.
#[derive(Debug, Clone)]
pub struct FontResource {
    /// The resource key as it appears in the content stream (e.g. `b"F1"`).
    pub key: Vec<u8>,
    /// Base font name from the font dictionary, if present.
    pub base_font: Option<String>,
    /// Encoding entry, if declared (e.g. `WinAnsiEncoding`, `Identity-H`).
    pub encoding: Option<String>,
}

/// A simplified, library-independent PDF value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Value>),
    Dict(Vec<(Vec<u8>, Value)>),
    Reference(PageId),
}

impl Value {
    /// Numeric coercion accepting both `Integer` and `Real`.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Integer(i) => Some(*i as f32),
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }
}

/// One content-stream operation: operator plus operands.
#[derive(Debug, Clone)]
pub struct Op {
    pub operator: String,
    pub operands: Vec<Value>,
}

impl Op {
    #[cfg(test)]
    pub fn new(operator: &str, operands: Vec<Value>) -> Self {
        Op {
            operator: operator.to_string(),
            operands,
        }
    }
}

/// Convert a `lopdf::Object` into a [`Value`].
///
/// Stream objects contribute only their dictionaries; raw stream bytes are
/// obtained through [`PdfBackend::page_content`].
fn convert_object(obj: &lopdf::Object) -> Value {
    match obj {
        lopdf::Object::Null => Value::Null,
        lopdf::Object::Boolean(b) => Value::Bool(*b),
        lopdf::Object::Integer(i) => Value::Integer(*i),
        lopdf::Object::Real(f) => Value::Real(*f),
        lopdf::Object::Name(n) => Value::Name(n.clone()),
        lopdf::Object::String(s, _) => Value::Str(s.clone()),
        lopdf::Object::Array(arr) => Value::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => Value::Dict(
            dict.iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect(),
        ),
        lopdf::Object::Stream(stream) => Value::Dict(
            stream
                .dict
                .iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect(),
        ),
        lopdf::Object::Reference(id) => Value::Reference(*id),
    }
}

/// Best-effort decoding of raw PDF string bytes.
///
/// Tries, in order: UTF-16BE with BOM (`FE FF` prefix), valid UTF-8, and a
/// Latin-1 fallback mapping each byte to its code point.
pub fn decode_string_bytes(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// The PDF parsing seam.
pub trait PdfBackend {
    /// Mapping from 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Font resources referenced by the given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>, LayoutError>;

    /// Raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, LayoutError>;

    /// Decode content-stream bytes into operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<Op>, LayoutError>;

    /// Decode string bytes from a text-showing operator, using any encoding
    /// information available for the given page and font.
    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String;
}

/// [`PdfBackend`] backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Parse a PDF from an in-memory byte slice.
    ///
    /// Encrypted documents are rejected at load time.
    pub fn load_bytes(data: &[u8]) -> Result<Self, LayoutError> {
        let doc =
            lopdf::Document::load_mem(data).map_err(|e| LayoutError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(LayoutError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Total number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Look up a font's declared encoding name, if any.
    fn font_encoding_name(&self, page: PageId, font_key: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font_dict = fonts.get(font_key)?;
        match font_dict.get(b"Encoding").ok()? {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>, LayoutError> {
        let fonts_map = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| LayoutError::Parse(format!("cannot get page fonts: {}", e)))?;

        let mut result = Vec::with_capacity(fonts_map.len());
        for (key, dict) in &fonts_map {
            let base_font = dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned());

            let encoding = dict.get(b"Encoding").ok().and_then(|o| match o {
                lopdf::Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
                _ => None,
            });

            result.push(FontResource {
                key: key.clone(),
                base_font,
                encoding,
            });
        }

        Ok(result)
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, LayoutError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| LayoutError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<Op>, LayoutError> {
        let content = Content::decode(data)
            .map_err(|e| LayoutError::Parse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| Op {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String {
        // Identity-encoded fonts typically use 2-byte codes that map to
        // Unicode; try UTF-16BE first for those.
        if let Some(enc) = self.font_encoding_name(page, font_key) {
            if enc.contains("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
                let units: Vec<u16> = bytes
                    .chunks(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                let decoded = String::from_utf16_lossy(&units);
                if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                    return decoded;
                }
            }
        }

        decode_string_bytes(bytes)
    }
}

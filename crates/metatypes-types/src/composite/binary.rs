//! Binary payloads stored as base64, hex or bit-string text
//!
//! Every pair of encodings converts exactly through the raw bytes. Data URIs
//! (`data:image/png;base64,...`) and the URL-safe base64 alphabet are
//! supported on the base64 side.

use crate::contract::{DataType, TypeMeta};
use crate::enums::fixed_enum;
use crate::value::Value;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use metatypes_diagnostics::{
    describe_value, DataTypeError, ErrorCode, Result, DT0008, DT0009, DT0010, DT0024, DT0025,
    DT0106,
};
use serde::Deserialize;

pub const HEX_PREFIX: &str = "0x";
const DATA_URI_PREFIX: &str = "data:";

fixed_enum! {
    /// Text encoding of a binary value
    pub enum BinaryEncoding ("BinaryEncoding") {
        Base64 = "base64" => "Base64",
        Hex = "hex" => "Hexadecimal",
        Binary = "binary" => "Binary",
    }
}

impl Default for BinaryEncoding {
    fn default() -> Self {
        Self::Base64
    }
}

fn conversion_error(
    code: ErrorCode,
    conversion: &str,
    raw: &str,
    reason: impl std::fmt::Display,
) -> DataTypeError {
    DataTypeError::casting(
        code,
        format!(
            "Cannot convert {} {}: {}",
            describe_value(raw, false),
            conversion,
            reason
        ),
    )
}

fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn decode_base64(raw: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(strip_whitespace(raw))
        .map_err(|e| conversion_error(DT0008, "from base64", raw, e))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_hex(raw: &str) -> Result<Vec<u8>> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(HEX_PREFIX)
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| conversion_error(DT0009, "from hex", raw, e))
}

/// Upper-case hex digits with the `0x` prefix
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode_upper(bytes))
}

/// Bit-string to bytes; left-padded with zeros to whole bytes
pub fn decode_binary(raw: &str) -> Result<Vec<u8>> {
    let bits = raw.trim();
    if bits.is_empty() || !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(conversion_error(DT0010, "from binary", raw, "only 0 and 1 are allowed"));
    }
    let padded = format!("{}{}", "0".repeat((8 - bits.len() % 8) % 8), bits);
    Ok(padded
        .as_bytes()
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, bit| (byte << 1) | (bit - b'0')))
        .collect())
}

pub fn encode_binary(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:08b}", b)).collect()
}

pub fn decode(raw: &str, encoding: BinaryEncoding) -> Result<Vec<u8>> {
    match encoding {
        BinaryEncoding::Base64 => match parse_data_uri(raw) {
            Some(Ok((_, payload))) => decode_base64(payload),
            Some(Err(err)) => Err(err),
            None => decode_base64(raw),
        },
        BinaryEncoding::Hex => decode_hex(raw),
        BinaryEncoding::Binary => decode_binary(raw),
    }
}

pub fn encode(bytes: &[u8], encoding: BinaryEncoding) -> String {
    match encoding {
        BinaryEncoding::Base64 => encode_base64(bytes),
        BinaryEncoding::Hex => encode_hex(bytes),
        BinaryEncoding::Binary => encode_binary(bytes),
    }
}

pub fn convert_base64_to_hex(raw: &str) -> Result<String> {
    decode_base64(raw).map(|b| encode_hex(&b))
}

pub fn convert_hex_to_base64(raw: &str) -> Result<String> {
    decode_hex(raw).map(|b| encode_base64(&b))
}

pub fn convert_base64_to_binary(raw: &str) -> Result<String> {
    decode_base64(raw).map(|b| encode_binary(&b))
}

pub fn convert_binary_to_base64(raw: &str) -> Result<String> {
    decode_binary(raw).map(|b| encode_base64(&b))
}

pub fn convert_binary_to_hex(raw: &str) -> Result<String> {
    decode_binary(raw).map(|b| encode_hex(&b))
}

pub fn convert_hex_to_binary(raw: &str) -> Result<String> {
    decode_hex(raw).map(|b| encode_binary(&b))
}

/// `data:<mime>;base64,<payload>`; `None` when `raw` is not a data URI at all
fn parse_data_uri(raw: &str) -> Option<Result<(&str, &str)>> {
    let rest = raw.trim().strip_prefix(DATA_URI_PREFIX)?;
    let Some((header, payload)) = rest.split_once(',') else {
        return Some(Err(conversion_error(DT0025, "from data URI", raw, "missing payload")));
    };
    let Some(mime) = header.strip_suffix(";base64") else {
        return Some(Err(conversion_error(DT0025, "from data URI", raw, "payload is not base64")));
    };
    Some(Ok((mime, payload)))
}

pub fn convert_base64_to_data_uri(raw: &str, mime_type: &str) -> Result<String> {
    decode_base64(raw)?;
    Ok(format!("{}{};base64,{}", DATA_URI_PREFIX, mime_type, strip_whitespace(raw)))
}

/// MIME type and base64 payload of a data URI
pub fn convert_data_uri_to_base64(raw: &str) -> Result<(String, String)> {
    let (mime, payload) = parse_data_uri(raw)
        .unwrap_or_else(|| Err(conversion_error(DT0025, "from data URI", raw, "missing data: prefix")))?;
    decode_base64(payload)?;
    Ok((mime.to_string(), strip_whitespace(payload)))
}

/// URL-safe alphabet without padding
pub fn convert_base64_to_base64url(raw: &str) -> Result<String> {
    decode_base64(raw).map(|b| URL_SAFE_NO_PAD.encode(b))
}

pub fn convert_base64url_to_base64(raw: &str) -> Result<String> {
    let unpadded = strip_whitespace(raw);
    let unpadded = unpadded.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .map(|b| encode_base64(&b))
        .map_err(|e| conversion_error(DT0008, "from base64url", raw, e))
}

/// Canonical text of `value` in `encoding`; the bytes must decode
pub fn cast_encoded(value: &Value, encoding: BinaryEncoding) -> Result<Value> {
    let raw = match value {
        Value::Null => return Ok(Value::Null),
        Value::List(_) => {
            return Err(DataTypeError::casting(DT0024, "Cannot convert a list to binary data"));
        }
        other => other.to_plain_string(),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::string(""));
    }
    let bytes = decode(trimmed, encoding)?;
    Ok(Value::String(match encoding {
        // Data URIs keep their MIME type
        BinaryEncoding::Base64 => strip_whitespace(trimmed),
        BinaryEncoding::Hex => encode_hex(&bytes),
        BinaryEncoding::Binary => trimmed.to_string(),
    }))
}

/// Base64 text
pub fn cast(value: &Value) -> Result<Value> {
    cast_encoded(value, BinaryEncoding::Base64)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BinaryDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    pub encoding: BinaryEncoding,
    /// Maximum decoded size in bytes
    pub max_size: Option<usize>,
}

impl BinaryDataType {
    pub fn new(encoding: BinaryEncoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }

    pub fn with_max_size(mut self, bytes: usize) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Decoded bytes of a value in this type's encoding
    pub fn to_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        match self.parse(value)? {
            Value::String(s) if !s.is_empty() => decode(&s, self.encoding),
            _ => Ok(Vec::new()),
        }
    }

    /// Re-encode a value of this type into `target`
    pub fn convert_to(&self, value: &Value, target: BinaryEncoding) -> Result<Value> {
        match self.parse(value)? {
            Value::String(s) if !s.is_empty() => {
                Ok(Value::String(encode(&decode(&s, self.encoding)?, target)))
            }
            other => Ok(other),
        }
    }
}

impl DataType for BinaryDataType {
    crate::data_type_basics!("Binary");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast_encoded(value, self.encoding).map_err(|e| {
            if !self.is_sensitive() {
                return e;
            }
            DataTypeError::casting(
                e.code(),
                format!("{} ({})", e.code().info().description, describe_value("", true)),
            )
            .with_type(self.name())
        })
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        let cast = self.cast(value).map_err(|e| self.to_validation_error(e))?;
        if let (Some(max), Value::String(s)) = (self.max_size, &cast) {
            if !s.is_empty() {
                let size = decode(s, self.encoding)
                    .map_err(|e| self.to_validation_error(e))?
                    .len();
                if size > max {
                    let err = DataTypeError::validation(
                        DT0106,
                        format!(
                            "{} is {} bytes long, at most {} allowed",
                            describe_value(s, self.is_sensitive()),
                            size,
                            max
                        ),
                    );
                    return Err(self.to_validation_error(err));
                }
            }
        }
        Ok(cast)
    }

    fn is_value_empty(&self, value: &Value) -> bool {
        value.is_blank() || value.as_str().is_some_and(|s| s.trim() == HEX_PREFIX)
    }

    fn validation_description(&self) -> String {
        match self.max_size {
            Some(max) => format!("{} data of at most {} bytes", self.encoding, max),
            None => format!("{} data", self.encoding),
        }
    }
}

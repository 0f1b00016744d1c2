// crates/geostream-core/src/numbers.rs

//! # Number array parser
//!
//! Iterative, allocation-light parser for a byte span known to contain one
//! JSON array of numbers, nested to any depth. Coordinate arrays of large
//! geometries can run to gigabytes; running serde_json over them would first
//! materialize the whole span as text. This parser walks the bytes once,
//! keeping only a stack of partially built arrays and slicing out one numeric
//! token at a time.

use serde_json::{Number, Value};

use crate::buffer::ChunkedByteBuffer;
use crate::error::{GeoStreamError, Result};

/// Bytes that may start a numeric token. GeoJSON longitudes are routinely
/// negative, so `-` is accepted here even though serde_json would also reject
/// a bare `.`-led token; the token itself is validated when parsed.
fn is_number_start(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b'.' || byte == b'-'
}

/// Bytes that may continue a numeric token (`1e-5`, `-12.25`, ...).
fn is_number_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b'.' | b'-' | b'+' | b'e' | b'E')
}

/// Parses `[start, end]` (end inclusive) of `buffer` as one possibly-nested
/// array of numbers.
///
/// The outermost `]` must land exactly on `end`; anything else in the span
/// besides digits, brackets, commas and whitespace is a structural error
/// naming the offending byte and offset.
pub fn parse(buffer: &ChunkedByteBuffer, start: usize, end: usize) -> Result<Value> {
    let mut stack: Vec<Vec<Value>> = Vec::new();
    let mut result = None;

    let mut i = start;
    while i <= end {
        let byte = buffer.byte_at(i);

        if matches!(byte, b' ' | b'\n' | b'\r' | b'\t' | b',') {
            i += 1;
        } else if byte == b'[' {
            stack.push(Vec::new());
            i += 1;
        } else if byte == b']' {
            let closed = match stack.pop() {
                Some(values) => Value::Array(values),
                None => return Err(GeoStreamError::UnexpectedArrayClose(i)),
            };
            if let Some(top) = stack.last_mut() {
                top.push(closed);
            } else if i == end {
                // outermost close coinciding with the span end
                result = Some(closed);
            } else {
                return Err(GeoStreamError::UnexpectedArrayClose(i));
            }
            i += 1;
        } else if is_number_start(byte) {
            let mut token_end = i;
            while token_end + 1 <= end && is_number_byte(buffer.byte_at(token_end + 1)) {
                token_end += 1;
            }
            let text = buffer.slice_to_text(i, token_end);
            let number = parse_number(&text, i)?;
            match stack.last_mut() {
                Some(top) => top.push(number),
                None => return Err(GeoStreamError::NumberOutsideArray(i)),
            }
            i = token_end + 1;
        } else {
            return Err(GeoStreamError::UnexpectedByte { byte, offset: i });
        }
    }

    result.ok_or(GeoStreamError::UnterminatedNumberArray(end))
}

/// Integral tokens become i64-backed numbers so values compare equal to a
/// reference serde_json parse; everything else goes through f64.
fn parse_number(text: &str, offset: usize) -> Result<Value> {
    if let Ok(integer) = text.parse::<i64>() {
        return Ok(Value::Number(Number::from(integer)));
    }

    let float: f64 = text.parse().map_err(|_| GeoStreamError::InvalidNumber {
        text: text.to_string(),
        offset,
    })?;
    Number::from_f64(float)
        .map(Value::Number)
        .ok_or_else(|| GeoStreamError::InvalidNumber {
            text: text.to_string(),
            offset,
        })
}

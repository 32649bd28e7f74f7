//! Decoder for the Google encoded polyline format (precision 1e5).

use anyhow::{Result, bail};

/// A geographic point in degrees, in GeoJSON (lng, lat) order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lng: f64,
    pub lat: f64,
}

/// Reads one zig-zag varint starting at `*index`, advancing past it.
///
/// Each byte is offset by 63; the low 5 bits carry data and 0x20 marks a
/// continuation. The sign lives in the least significant bit of the
/// assembled value.
fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut shift = 0u32;
    let mut result = 0u64;
    loop {
        if *index >= bytes.len() {
            bail!("unterminated value at byte {}", index);
        }
        let byte = bytes[*index];
        if !(63..=126).contains(&byte) {
            bail!("character 0x{byte:02x} at byte {index} is outside the polyline alphabet");
        }
        *index += 1;
        let chunk = u64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            bail!("value starting near byte {index} is too long");
        }
    }
    if result & 1 != 0 {
        Ok(!((result >> 1) as i64))
    } else {
        Ok((result >> 1) as i64)
    }
}

/// Decodes an encoded polyline into an ordered point sequence.
///
/// Coordinates are delta-encoded against running latitude/longitude
/// accumulators, latitude first. The whole string must consume as complete
/// point pairs; anything else is a hard error so a malformed shape can be
/// dropped without touching its neighbors.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Point>> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += decode_value(bytes, &mut index)?;
        if index >= bytes.len() {
            bail!("input ends after a latitude with no matching longitude");
        }
        lng += decode_value(bytes, &mut index)?;
        points.push(Point {
            lng: lng as f64 / 1e5,
            lat: lat as f64 / 1e5,
        });
    }

    Ok(points)
}

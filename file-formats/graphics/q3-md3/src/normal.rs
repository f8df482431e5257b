//! Decompression of the 16-bit latitude/longitude normals used by MD3 vertices.

use glam::Vec3;
use std::f32::consts::TAU;

/// Angle covered by one step of a quantized latitude or longitude byte
const ANGLE_STEP: f32 = TAU / 255.0;

/// Decode a packed normal into a unit vector.
///
/// The high byte is the latitude index and the low byte the longitude index.
pub fn decode_normal(encoded: u16) -> Vec3 {
    let lat = f32::from((encoded >> 8) as u8) * ANGLE_STEP;
    let lng = f32::from((encoded & 0xFF) as u8) * ANGLE_STEP;
    Vec3::new(lat.cos() * lng.sin(), lat.sin() * lng.sin(), lng.cos())
}

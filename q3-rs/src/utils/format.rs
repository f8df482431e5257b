//! Formatting utilities

use glam::Vec3;
use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a vector with two decimals per component
pub fn format_vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

/// Milliseconds per frame as frames per second
pub fn format_fps(frame_lerp: i32) -> String {
    if frame_lerp <= 0 {
        "-".to_string()
    } else {
        format!("{:.1}", 1000.0 / f64::from(frame_lerp))
    }
}

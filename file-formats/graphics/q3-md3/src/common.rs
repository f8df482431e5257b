//! Shared helpers for reading fixed-layout MD3 records from a byte slice.

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;
use std::io::{Cursor, Read};

use crate::error::{Md3Error, Result};

/// Length of the fixed-width path fields ("MAX_QPATH")
pub const MAX_QPATH: usize = 64;

/// Decode a NUL-terminated string stored in a fixed-width field.
///
/// The string ends at the first zero byte or at the end of the field,
/// whichever comes first.
pub fn fixed_str(raw: &[u8]) -> String {
    let end = memchr::memchr(0, raw).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Read a fixed-width string field of `width` bytes.
pub fn read_fixed_str<R: Read>(reader: &mut R, width: usize) -> Result<String> {
    let mut buf = vec![0u8; width];
    reader.read_exact(&mut buf)?;
    Ok(fixed_str(&buf))
}

/// Read three little-endian floats as a vector.
pub fn read_vec3<R: Read>(reader: &mut R) -> Result<Vec3> {
    let x = reader.read_f32::<LittleEndian>()?;
    let y = reader.read_f32::<LittleEndian>()?;
    let z = reader.read_f32::<LittleEndian>()?;
    Ok(Vec3::new(x, y, z))
}

/// Read a signed count field and reject negative values.
pub fn read_count<R: Read>(reader: &mut R, field: &str) -> Result<usize> {
    let value = reader.read_i32::<LittleEndian>()?;
    usize::try_from(value)
        .map_err(|_| Md3Error::ParseError(format!("negative {field}: {value}")))
}

/// Read a signed offset field and reject negative values.
pub fn read_offset<R: Read>(reader: &mut R, field: &str) -> Result<usize> {
    read_count(reader, field)
}

/// Position a cursor at `offset` after checking that `len` bytes fit there.
pub fn seek_checked(
    cursor: &mut Cursor<&[u8]>,
    offset: usize,
    len: usize,
    section: &'static str,
) -> Result<()> {
    let available = cursor.get_ref().len();
    match offset.checked_add(len) {
        Some(end) if end <= available => {
            cursor.set_position(offset as u64);
            Ok(())
        }
        _ => Err(Md3Error::Truncated { section, offset }),
    }
}

/// Byte size of `count` records of `record_size` bytes, or an error on overflow.
pub fn section_len(count: usize, record_size: usize, section: &'static str) -> Result<usize> {
    count
        .checked_mul(record_size)
        .ok_or(Md3Error::Truncated { section, offset: usize::MAX })
}

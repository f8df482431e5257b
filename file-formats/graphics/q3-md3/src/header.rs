use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

use crate::common::{MAX_QPATH, read_count, read_fixed_str, read_offset};
use crate::error::{Md3Error, Result};

/// Magic signature for MD3 files ("IDP3")
pub const MD3_MAGIC: [u8; 4] = *b"IDP3";

/// The only MD3 version this crate decodes
pub const MD3_VERSION: i32 = 15;

/// Vertex coordinates are stored as integers in 1/64 units
pub const MD3_XYZ_SCALE: f32 = 1.0 / 64.0;

/// Size of the on-disk header in bytes
pub const HEADER_SIZE: usize = 4 + 4 + MAX_QPATH + 5 * 4 + 4 * 4;

/// Size of one frame record
pub const FRAME_SIZE: usize = 6 * 4 + 3 * 4 + 4 + 16;

/// Size of one tag record
pub const TAG_SIZE: usize = MAX_QPATH + 3 * 4 + 9 * 4;

/// Size of a surface record header
pub const SURFACE_HEADER_SIZE: usize = 4 + MAX_QPATH + 10 * 4;

/// Size of one shader record
pub const SHADER_SIZE: usize = MAX_QPATH + 4;

/// Size of one triangle record
pub const TRIANGLE_SIZE: usize = 3 * 4;

/// Size of one texture coordinate record
pub const TEXCOORD_SIZE: usize = 2 * 4;

/// Size of one compressed vertex record
pub const VERTEX_SIZE: usize = 3 * 2 + 2;

/// MD3 file header
/// Based on: <https://icculus.org/homepages/phaethon/q3a/formats/md3format.html>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Md3Header {
    /// Magic signature ("IDP3")
    pub magic: [u8; 4],
    /// Format version, always 15
    pub version: i32,
    /// Model name as stored in the file
    pub name: String,
    /// Unused flags
    pub flags: i32,
    /// Number of animation frames
    pub num_frames: usize,
    /// Number of tags per frame
    pub num_tags: usize,
    /// Number of surfaces
    pub num_surfaces: usize,
    /// Number of embedded skins (unused)
    pub num_skins: usize,
    /// Offset of the frame records
    pub ofs_frames: usize,
    /// Offset of the tag records
    pub ofs_tags: usize,
    /// Offset of the first surface record
    pub ofs_surfaces: usize,
    /// Offset of the end of the model
    pub ofs_end: usize,
}

impl Md3Header {
    /// Parse the MD3 header from a reader
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        if magic != MD3_MAGIC {
            return Err(Md3Error::InvalidMagic {
                expected: String::from_utf8_lossy(&MD3_MAGIC).to_string(),
                actual: String::from_utf8_lossy(&magic).to_string(),
            });
        }

        let version = reader.read_i32::<LittleEndian>()?;
        if version != MD3_VERSION {
            return Err(Md3Error::UnsupportedVersion(version));
        }

        let name = read_fixed_str(reader, MAX_QPATH)?;
        let flags = reader.read_i32::<LittleEndian>()?;
        let num_frames = read_count(reader, "numFrames")?;
        let num_tags = read_count(reader, "numTags")?;
        let num_surfaces = read_count(reader, "numSurfaces")?;
        let num_skins = read_count(reader, "numSkins")?;
        let ofs_frames = read_offset(reader, "ofsFrames")?;
        let ofs_tags = read_offset(reader, "ofsTags")?;
        let ofs_surfaces = read_offset(reader, "ofsSurfaces")?;
        let ofs_end = read_offset(reader, "ofsEnd")?;

        Ok(Self {
            magic,
            version,
            name,
            flags,
            num_frames,
            num_tags,
            num_surfaces,
            num_skins,
            ofs_frames,
            ofs_tags,
            ofs_surfaces,
            ofs_end,
        })
    }
}

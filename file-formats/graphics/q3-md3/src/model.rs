//! Decoded MD3 model: frames, tags and surfaces.

use byteorder::{LittleEndian, ReadBytesExt};
use glam::{Vec2, Vec3};
use std::io::Cursor;

use crate::common::{
    MAX_QPATH, fixed_str, read_count, read_fixed_str, read_offset, read_vec3, section_len,
    seek_checked,
};
use crate::error::{Md3Error, Result};
use crate::header::{
    FRAME_SIZE, HEADER_SIZE, MD3_XYZ_SCALE, Md3Header, SHADER_SIZE, SURFACE_HEADER_SIZE,
    TAG_SIZE, TEXCOORD_SIZE, TRIANGLE_SIZE, VERTEX_SIZE,
};
use crate::normal::decode_normal;

/// One stored pose of a model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Bounding box minimum corner
    pub bounds_min: Vec3,
    /// Bounding box maximum corner
    pub bounds_max: Vec3,
    /// Local origin of the frame
    pub local_origin: Vec3,
    /// Bounding sphere radius
    pub radius: f32,
    /// Frame name
    pub name: String,
}

/// A named attachment point: origin plus forward/left/up axis rows
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    /// Tag name, e.g. `tag_torso`
    pub name: String,
    /// Origin in the owning model's space
    pub origin: Vec3,
    /// Orientation rows: forward, left, up
    pub axis: [Vec3; 3],
}

impl Tag {
    /// Tag at the zero origin with identity orientation
    pub fn identity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: Vec3::ZERO,
            axis: [Vec3::X, Vec3::Y, Vec3::Z],
        }
    }
}

/// A decompressed vertex
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// A mesh part of a model
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Surface {
    /// Lower-cased name with any `_1`/`_2` team suffix removed
    pub name: String,
    /// Number of frames stored for this surface
    pub num_frames: usize,
    /// Number of vertices per frame
    pub num_verts: usize,
    /// Triangle vertex indices
    pub triangles: Vec<[u32; 3]>,
    /// Texture coordinates, one per vertex, shared by all frames
    pub tex_coords: Vec<Vec2>,
    /// Vertices for all frames, frame-major
    pub vertices: Vec<Vertex>,
    /// Shader name embedded in the model, used when no skin entry exists
    pub shader_name: Option<String>,
}

impl Surface {
    /// Number of triangles in the surface
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Vertices of one frame, or an empty slice if the frame is not stored
    pub fn frame_vertices(&self, frame: usize) -> &[Vertex] {
        frame
            .checked_mul(self.num_verts)
            .and_then(|start| Some(start..start.checked_add(self.num_verts)?))
            .and_then(|range| self.vertices.get(range))
            .unwrap_or(&[])
    }

    /// Interpolate between two frames the same way the GPU path does:
    /// positions are mixed linearly, normals are mixed and renormalized.
    ///
    /// Frame indices wrap around the number of stored frames.
    pub fn blend_frame(&self, frame_a: usize, frame_b: usize, fraction: f32) -> Vec<Vertex> {
        if self.num_frames == 0 {
            return Vec::new();
        }
        let a = self.frame_vertices(frame_a % self.num_frames);
        let b = self.frame_vertices(frame_b % self.num_frames);

        a.iter()
            .zip(b)
            .map(|(va, vb)| Vertex {
                position: va.position.lerp(vb.position, fraction),
                normal: va.normal.lerp(vb.normal, fraction).normalize_or_zero(),
            })
            .collect()
    }
}

/// Fold a surface name so both team variants address the same surface
pub fn fold_surface_name(raw: &str) -> String {
    let mut name = raw.to_ascii_lowercase();
    let bytes = name.as_bytes();
    if bytes.len() > 2 && bytes[bytes.len() - 2] == b'_' && matches!(bytes[bytes.len() - 1], b'1' | b'2')
    {
        name.truncate(name.len() - 2);
    }
    name
}

/// A decoded MD3 model
#[derive(Debug, Clone, PartialEq)]
pub struct Md3Model {
    /// Display name given by the caller, usually the file name
    pub name: String,
    /// Parsed file header
    pub header: Md3Header,
    /// Frames in file order
    pub frames: Vec<Frame>,
    /// Tags for every frame, `num_tags` consecutive entries per frame
    pub tags: Vec<Tag>,
    /// Decoded surfaces; surfaces that could not be located are skipped
    pub surfaces: Vec<Surface>,
}

impl Md3Model {
    /// Decode a model from its raw bytes
    pub fn parse(data: &[u8], name: &str) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Md3Error::HeaderTooShort {
                name: name.to_string(),
                len: data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let header = Md3Header::parse(&mut cursor)?;
        log::debug!(
            "{}: {} frames, {} tags, {} surfaces",
            name,
            header.num_frames,
            header.num_tags,
            header.num_surfaces
        );

        let frames = parse_frames(&mut cursor, &header)?;
        let tags = parse_tags(&mut cursor, &header)?;
        let surfaces = parse_surfaces(&mut cursor, &header, name);

        Ok(Self {
            name: name.to_string(),
            header,
            frames,
            tags,
            surfaces,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.header.num_frames
    }

    pub fn num_tags(&self) -> usize {
        self.header.num_tags
    }

    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Tags stored for one frame
    pub fn frame_tags(&self, frame: usize) -> &[Tag] {
        let n = self.header.num_tags;
        self.tags.get(frame * n..frame * n + n).unwrap_or(&[])
    }

    /// Find a tag by name at a frame, ignoring case
    pub fn tag_for_name(&self, name: &str, frame: usize) -> Option<&Tag> {
        if frame >= self.header.num_frames {
            return None;
        }
        self.frame_tags(frame)
            .iter()
            .find(|tag| tag.name.eq_ignore_ascii_case(name))
    }

    /// Names of the tag slots, taken from the first frame
    pub fn tag_names(&self) -> Vec<&str> {
        self.frame_tags(0).iter().map(|t| t.name.as_str()).collect()
    }

    /// Find a surface by its folded name
    pub fn surface(&self, name: &str) -> Option<&Surface> {
        let folded = fold_surface_name(name);
        self.surfaces.iter().find(|s| s.name == folded)
    }
}

fn parse_frames(cursor: &mut Cursor<&[u8]>, header: &Md3Header) -> Result<Vec<Frame>> {
    let len = section_len(header.num_frames, FRAME_SIZE, "frames")?;
    seek_checked(cursor, header.ofs_frames, len, "frames")?;

    let mut frames = Vec::with_capacity(header.num_frames);
    for _ in 0..header.num_frames {
        let bounds_min = read_vec3(cursor)?;
        let bounds_max = read_vec3(cursor)?;
        let local_origin = read_vec3(cursor)?;
        let radius = cursor.read_f32::<LittleEndian>()?;
        let name = read_fixed_str(cursor, 16)?;
        frames.push(Frame {
            bounds_min,
            bounds_max,
            local_origin,
            radius,
            name,
        });
    }
    Ok(frames)
}

fn parse_tags(cursor: &mut Cursor<&[u8]>, header: &Md3Header) -> Result<Vec<Tag>> {
    let count = header
        .num_tags
        .checked_mul(header.num_frames)
        .ok_or(Md3Error::ParseError("tag count overflow".to_string()))?;
    let len = section_len(count, TAG_SIZE, "tags")?;
    seek_checked(cursor, header.ofs_tags, len, "tags")?;

    let mut tags = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_fixed_str(cursor, MAX_QPATH)?;
        let origin = read_vec3(cursor)?;
        let axis = [read_vec3(cursor)?, read_vec3(cursor)?, read_vec3(cursor)?];
        tags.push(Tag { name, origin, axis });
    }
    Ok(tags)
}

/// Surface record header with offsets relative to the record start
struct SurfaceHeader {
    name: String,
    num_frames: usize,
    num_shaders: usize,
    num_verts: usize,
    num_triangles: usize,
    ofs_triangles: usize,
    ofs_shaders: usize,
    ofs_st: usize,
    ofs_xyz_normals: usize,
    ofs_end: usize,
}

impl SurfaceHeader {
    fn parse(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let _ident = cursor.read_i32::<LittleEndian>()?;
        let mut raw_name = [0u8; MAX_QPATH];
        std::io::Read::read_exact(cursor, &mut raw_name)?;
        let _flags = cursor.read_i32::<LittleEndian>()?;
        Ok(Self {
            name: fold_surface_name(&fixed_str(&raw_name)),
            num_frames: read_count(cursor, "surface numFrames")?,
            num_shaders: read_count(cursor, "surface numShaders")?,
            num_verts: read_count(cursor, "surface numVerts")?,
            num_triangles: read_count(cursor, "surface numTriangles")?,
            ofs_triangles: read_offset(cursor, "surface ofsTriangles")?,
            ofs_shaders: read_offset(cursor, "surface ofsShaders")?,
            ofs_st: read_offset(cursor, "surface ofsSt")?,
            ofs_xyz_normals: read_offset(cursor, "surface ofsXyzNormals")?,
            ofs_end: read_offset(cursor, "surface ofsEnd")?,
        })
    }
}

fn parse_surfaces(cursor: &mut Cursor<&[u8]>, header: &Md3Header, name: &str) -> Vec<Surface> {
    let data_len = cursor.get_ref().len();
    let mut surfaces = Vec::with_capacity(header.num_surfaces.min(data_len / SURFACE_HEADER_SIZE));
    let mut offset = header.ofs_surfaces;

    for index in 0..header.num_surfaces {
        if offset >= data_len || seek_checked(cursor, offset, SURFACE_HEADER_SIZE, "surface").is_err()
        {
            log::warn!(
                "{}: surface {} at offset {} is out of bounds, stopping",
                name,
                index,
                offset
            );
            break;
        }

        let surface_header = match SurfaceHeader::parse(cursor) {
            Ok(h) => h,
            Err(e) => {
                log::warn!("{}: unreadable surface {} header: {}", name, index, e);
                break;
            }
        };

        match parse_surface_body(cursor, offset, &surface_header) {
            Ok(surface) => {
                log::debug!(
                    "{}: surface '{}' with {} verts, {} triangles",
                    name,
                    surface.name,
                    surface.num_verts,
                    surface.num_triangles()
                );
                surfaces.push(surface);
            }
            Err(e) => log::warn!(
                "{}: skipping surface '{}': {}",
                name,
                surface_header.name,
                e
            ),
        }

        if surface_header.ofs_end == 0 {
            break;
        }
        offset = offset.saturating_add(surface_header.ofs_end);
    }

    surfaces
}

fn parse_surface_body(
    cursor: &mut Cursor<&[u8]>,
    base: usize,
    sh: &SurfaceHeader,
) -> Result<Surface> {
    let shader_name = if sh.num_shaders > 0 {
        seek_checked(cursor, base.saturating_add(sh.ofs_shaders), SHADER_SIZE, "shaders")?;
        Some(read_fixed_str(cursor, MAX_QPATH)?).filter(|s| !s.is_empty())
    } else {
        None
    };

    let len = section_len(sh.num_triangles, TRIANGLE_SIZE, "triangles")?;
    seek_checked(cursor, base.saturating_add(sh.ofs_triangles), len, "triangles")?;
    let mut triangles = Vec::with_capacity(sh.num_triangles);
    for _ in 0..sh.num_triangles {
        let mut tri = [0u32; 3];
        for index in &mut tri {
            let value = cursor.read_i32::<LittleEndian>()?;
            *index = u32::try_from(value)
                .ok()
                .filter(|&v| (v as usize) < sh.num_verts)
                .ok_or_else(|| {
                    Md3Error::ParseError(format!(
                        "triangle index {value} out of range for {} vertices",
                        sh.num_verts
                    ))
                })?;
        }
        triangles.push(tri);
    }

    let len = section_len(sh.num_verts, TEXCOORD_SIZE, "texcoords")?;
    seek_checked(cursor, base.saturating_add(sh.ofs_st), len, "texcoords")?;
    let mut tex_coords = Vec::with_capacity(sh.num_verts);
    for _ in 0..sh.num_verts {
        let s = cursor.read_f32::<LittleEndian>()?;
        let t = cursor.read_f32::<LittleEndian>()?;
        tex_coords.push(Vec2::new(s, t));
    }

    let total = sh
        .num_verts
        .checked_mul(sh.num_frames)
        .ok_or(Md3Error::ParseError("vertex count overflow".to_string()))?;
    let len = section_len(total, VERTEX_SIZE, "vertices")?;
    seek_checked(cursor, base.saturating_add(sh.ofs_xyz_normals), len, "vertices")?;
    let mut vertices = Vec::with_capacity(total);
    for _ in 0..total {
        let x = cursor.read_i16::<LittleEndian>()?;
        let y = cursor.read_i16::<LittleEndian>()?;
        let z = cursor.read_i16::<LittleEndian>()?;
        let normal = cursor.read_u16::<LittleEndian>()?;
        vertices.push(Vertex {
            position: Vec3::new(f32::from(x), f32::from(y), f32::from(z)) * MD3_XYZ_SCALE,
            normal: decode_normal(normal),
        });
    }

    Ok(Surface {
        name: sh.name.clone(),
        num_frames: sh.num_frames,
        num_verts: sh.num_verts,
        triangles,
        tex_coords,
        vertices,
        shader_name,
    })
}

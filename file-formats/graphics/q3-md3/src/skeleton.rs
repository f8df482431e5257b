//! Tag interpolation and parent/child attachment of body parts
//!
//! Orientations use the MD3 row convention: `axis[0]` is forward, `axis[1]`
//! left and `axis[2]` up, each expressed in the parent's space.

use glam::{Mat3, Mat4, Vec3};

use crate::model::{Md3Model, Tag};

/// Rows shorter than this are left as they are when normalizing
const MIN_NORMALIZE_LENGTH: f32 = 0.0001;

/// World placement of a body part: origin plus orientation rows
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidTransform {
    pub origin: Vec3,
    pub axis: [Vec3; 3],
}

impl RigidTransform {
    /// Zero origin, identity orientation
    pub const IDENTITY: Self = Self {
        origin: Vec3::ZERO,
        axis: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Matrix whose columns are the axis rows, mapping local to parent space
    pub fn basis(&self) -> Mat3 {
        Mat3::from_cols(self.axis[0], self.axis[1], self.axis[2])
    }

    /// Transform a point from this part's local space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.origin + self.basis() * point
    }

    /// Column-major model matrix for a renderer
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.axis[0].extend(0.0),
            self.axis[1].extend(0.0),
            self.axis[2].extend(0.0),
            self.origin.extend(1.0),
        )
    }

    /// Upper-left 3x3 of the model matrix, for transforming normals
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model_matrix())
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<&Tag> for RigidTransform {
    fn from(tag: &Tag) -> Self {
        Self {
            origin: tag.origin,
            axis: tag.axis,
        }
    }
}

fn normalize_row(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > MIN_NORMALIZE_LENGTH { v / len } else { v }
}

/// Blend two tags linearly and renormalize each axis row.
///
/// This is exact at the endpoints and an approximation of a rotation blend
/// in between.
pub fn blend_tags(a: &Tag, b: &Tag, fraction: f32) -> Tag {
    let back = 1.0 - fraction;
    let mix = |x: Vec3, y: Vec3| x * back + y * fraction;
    Tag {
        name: a.name.clone(),
        origin: mix(a.origin, b.origin),
        axis: [
            normalize_row(mix(a.axis[0], b.axis[0])),
            normalize_row(mix(a.axis[1], b.axis[1])),
            normalize_row(mix(a.axis[2], b.axis[2])),
        ],
    }
}

/// Interpolate the named tag of a model between two absolute frames.
///
/// Returns an identity tag if either frame is missing or lacks the tag.
pub fn lerp_tag(model: &Md3Model, tag_name: &str, frame_a: i32, frame_b: i32, fraction: f32) -> Tag {
    let lookup = |frame: i32| {
        usize::try_from(frame)
            .ok()
            .and_then(|f| model.tag_for_name(tag_name, f))
    };

    match (lookup(frame_a), lookup(frame_b)) {
        (Some(a), Some(b)) => blend_tags(a, b, fraction),
        _ => {
            log::trace!(
                "{}: no '{}' at frames {}/{}",
                model.name,
                tag_name,
                frame_a,
                frame_b
            );
            Tag::identity(tag_name)
        }
    }
}

/// Place a child part on a parent using the child's attachment tag
pub fn attach(parent: &RigidTransform, tag: &Tag) -> RigidTransform {
    let basis = parent.basis();
    RigidTransform {
        origin: parent.origin + basis * tag.origin,
        axis: [
            basis * tag.axis[0],
            basis * tag.axis[1],
            basis * tag.axis[2],
        ],
    }
}

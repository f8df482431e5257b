//! Hand-off of posed body parts to an external renderer

use crate::animation::FramePair;
use crate::model::{Md3Model, Surface, Vertex};
use crate::player_model::BodyPart;
use crate::resource::TextureResolver;
use crate::skeleton::RigidTransform;
use crate::skin::SkinMapping;

/// Everything a renderer needs to draw one body part for one tick
#[derive(Debug, Clone, Copy)]
pub struct RenderPart<'a> {
    pub part: BodyPart,
    pub model: &'a Md3Model,
    /// Absolute model frames, not yet reduced to the stored frame range
    pub frames: FramePair,
    pub transform: RigidTransform,
    pub skin: &'a SkinMapping,
}

impl<'a> RenderPart<'a> {
    /// Frame pair reduced modulo the model's frame count
    pub fn model_frames(&self) -> (usize, usize) {
        let count = i32::try_from(self.model.num_frames()).unwrap_or(i32::MAX).max(1);
        let wrap = |frame: i32| frame.rem_euclid(count) as usize;
        (wrap(self.frames.frame_a), wrap(self.frames.frame_b))
    }

    /// Interpolated vertices of a surface, in the part's local space
    pub fn blended_vertices(&self, surface: &Surface) -> Vec<Vertex> {
        let (a, b) = self.model_frames();
        surface.blend_frame(a, b, self.frames.fraction)
    }

    /// Texture handle for every surface, falling back to the resolver's white
    /// texture when neither the skin nor the model names a material
    pub fn surface_textures<R: TextureResolver>(&self, resolver: &mut R) -> Vec<(&'a str, R::Handle)> {
        let skin = self.skin;
        self.model
            .surfaces
            .iter()
            .map(|surface| {
                let handle = resolver.resolve(skin.resolve_material(surface));
                (surface.name.as_str(), handle)
            })
            .collect()
    }
}

/// Receives posed parts, once per part per tick: legs, torso, then head
pub trait RenderSink {
    fn render_part(&mut self, part: &RenderPart<'_>);
}

/// Collects the frame pairs and transforms it is handed
impl RenderSink for Vec<(BodyPart, FramePair, RigidTransform)> {
    fn render_part(&mut self, part: &RenderPart<'_>) {
        self.push((part.part, part.frames, part.transform));
    }
}

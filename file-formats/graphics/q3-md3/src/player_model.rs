//! Articulated three-part player model
//!
//! A player is split into legs (`lower.md3`), torso (`upper.md3`) and head
//! (`head.md3`). The legs sit at the origin, the torso hangs off the legs'
//! `tag_torso` and the head off the torso's `tag_head`. Legs and torso play
//! independent animations from the shared `animation.cfg`; the head is drawn
//! at its single stored pose.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::animation::{
    AnimNumber, AnimationConfig, AnimationEntry, FramePair, PlaybackState, advance,
    resolve_frames, scrub, step,
};
use crate::clock::Clock;
use crate::error::{Md3Error, Result};
use crate::model::{Md3Model, Tag};
use crate::render::{RenderPart, RenderSink};
use crate::resource::ResourceProvider;
use crate::skeleton::{RigidTransform, attach, lerp_tag};
use crate::skin::SkinMapping;

/// Tag on the legs model the torso attaches to
pub const TAG_TORSO: &str = "tag_torso";

/// Tag on the torso model the head attaches to
pub const TAG_HEAD: &str = "tag_head";

/// Bounding radius reported when the model has no vertices
pub const DEFAULT_BOUNDING_RADIUS: f32 = 50.0;

/// Name of the skin selected when none is given
pub const DEFAULT_SKIN: &str = "default";

const ANIMATION_FILE: &str = "animation.cfg";

/// One of the three parts of a player model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyPart {
    Legs,
    Torso,
    Head,
}

impl BodyPart {
    /// Parts in attachment and render order
    pub const ALL: [Self; 3] = [Self::Legs, Self::Torso, Self::Head];

    /// File name stem of the part's model and skins
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Legs => "lower",
            Self::Torso => "upper",
            Self::Head => "head",
        }
    }

    pub fn model_file(self) -> String {
        format!("{}.md3", self.file_stem())
    }

    pub fn skin_file(self, skin: &str) -> String {
        format!("{}_{}.skin", self.file_stem(), skin)
    }

    /// Tag on the parent part this part is attached to
    pub fn attachment_tag(self) -> Option<&'static str> {
        match self {
            Self::Legs => None,
            Self::Torso => Some(TAG_TORSO),
            Self::Head => Some(TAG_HEAD),
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Legs => "legs",
            Self::Torso => "torso",
            Self::Head => "head",
        };
        f.write_str(name)
    }
}

/// Construction settings of a [`PlayerModel`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerModelOptions {
    /// Skin to select initially
    pub skin: String,
    /// Initial torso animation
    pub torso_animation: AnimNumber,
    /// Initial legs animation
    pub legs_animation: AnimNumber,
}

impl Default for PlayerModelOptions {
    fn default() -> Self {
        Self {
            skin: DEFAULT_SKIN.to_string(),
            torso_animation: AnimNumber::TorsoStand,
            legs_animation: AnimNumber::LegsIdle,
        }
    }
}

/// Frames and world placement of one part for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct PartPose {
    pub frames: FramePair,
    pub transform: RigidTransform,
}

/// Poses of all three parts for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerPose {
    pub legs: PartPose,
    pub torso: PartPose,
    pub head: PartPose,
}

impl PlayerPose {
    pub fn part(&self, part: BodyPart) -> &PartPose {
        match part {
            BodyPart::Legs => &self.legs,
            BodyPart::Torso => &self.torso,
            BodyPart::Head => &self.head,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Parts<T> {
    legs: T,
    torso: T,
    head: T,
}

impl<T> Parts<T> {
    fn get(&self, part: BodyPart) -> &T {
        match part {
            BodyPart::Legs => &self.legs,
            BodyPart::Torso => &self.torso,
            BodyPart::Head => &self.head,
        }
    }

    fn get_mut(&mut self, part: BodyPart) -> &mut T {
        match part {
            BodyPart::Legs => &mut self.legs,
            BodyPart::Torso => &mut self.torso,
            BodyPart::Head => &mut self.head,
        }
    }
}

/// A loaded player model with its animation and skin state
pub struct PlayerModel {
    provider: Arc<dyn ResourceProvider>,
    clock: Arc<dyn Clock>,
    path: String,
    models: Parts<Md3Model>,
    skins: Parts<SkinMapping>,
    skin_name: String,
    animations: Option<AnimationConfig>,
    legs: PlaybackState,
    torso: PlaybackState,
    playing: bool,
    center_height: f32,
    bounding_radius: f32,
}

impl fmt::Debug for PlayerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerModel")
            .field("path", &self.path)
            .field("skin_name", &self.skin_name)
            .field("legs", &self.legs)
            .field("torso", &self.torso)
            .field("playing", &self.playing)
            .field("center_height", &self.center_height)
            .field("bounding_radius", &self.bounding_radius)
            .finish_non_exhaustive()
    }
}

impl PlayerModel {
    /// Load the player model stored in the directory `model_path`.
    ///
    /// All three part models are required. A missing `animation.cfg` leaves
    /// the model without animations and a missing skin file leaves that part
    /// without a skin mapping.
    pub fn load(
        provider: Arc<dyn ResourceProvider>,
        model_path: &str,
        clock: Arc<dyn Clock>,
        options: PlayerModelOptions,
    ) -> Result<Self> {
        let path = model_path.trim_end_matches('/').to_string();

        let load_part = |part: BodyPart| -> Result<Md3Model> {
            let file = format!("{}/{}", path, part.model_file());
            let data = provider
                .read(&file)
                .ok_or_else(|| Md3Error::MissingResource(file.clone()))?;
            Md3Model::parse(&data, &file)
        };
        let models = Parts {
            legs: load_part(BodyPart::Legs)?,
            torso: load_part(BodyPart::Torso)?,
            head: load_part(BodyPart::Head)?,
        };

        let animations = match provider.read(&format!("{path}/{ANIMATION_FILE}")) {
            Some(data) => Some(AnimationConfig::parse(&data)),
            None => {
                log::warn!("{path}: no {ANIMATION_FILE}, model will not animate");
                None
            }
        };

        let now = clock.now_ms();
        let mut model = Self {
            provider,
            clock,
            path,
            models,
            skins: Parts::default(),
            skin_name: String::new(),
            animations,
            legs: PlaybackState::new(options.legs_animation, now),
            torso: PlaybackState::new(options.torso_animation, now),
            playing: true,
            center_height: 0.0,
            bounding_radius: DEFAULT_BOUNDING_RADIUS,
        };
        model.select_skin(&options.skin);
        model.compute_bounds();

        log::debug!(
            "{}: loaded, center height {:.2}, radius {:.2}",
            model.path,
            model.center_height,
            model.bounding_radius
        );
        Ok(model)
    }

    pub fn model_path(&self) -> &str {
        &self.path
    }

    pub fn model(&self, part: BodyPart) -> &Md3Model {
        self.models.get(part)
    }

    pub fn skin(&self, part: BodyPart) -> &SkinMapping {
        self.skins.get(part)
    }

    pub fn skin_name(&self) -> &str {
        &self.skin_name
    }

    /// Parsed animation table, if the model has one
    pub fn animations(&self) -> Option<&AnimationConfig> {
        self.animations.as_ref()
    }

    /// Skins that have a legs skin file, `default` first
    pub fn available_skins(&self) -> Vec<String> {
        let prefix = format!("{}/lower_", self.path).to_ascii_lowercase();
        let names = self.provider.list().into_iter().filter_map(|file| {
            let lower = file.to_ascii_lowercase();
            let name_len = lower.strip_prefix(&prefix)?.strip_suffix(".skin")?.len();
            file.get(prefix.len()..prefix.len() + name_len)
                .filter(|name| !name.is_empty() && !name.contains('/'))
                .map(str::to_string)
        });
        sort_skin_names(names.collect())
    }

    /// Load the skin mappings of all three parts
    pub fn select_skin(&mut self, name: &str) {
        for part in BodyPart::ALL {
            let file = format!("{}/{}", self.path, part.skin_file(name));
            let data = self.provider.read(&file);
            if data.is_none() {
                log::warn!("{file}: skin not found, using model shaders");
            }
            *self.skins.get_mut(part) = SkinMapping::from_resource(data.as_deref());
        }
        self.skin_name = name.to_string();
    }

    fn entry(&self, animation: AnimNumber) -> Option<&AnimationEntry> {
        self.animations.as_ref().map(|config| config.entry(animation))
    }

    /// Restart the torso with another animation
    pub fn set_torso_animation(&mut self, animation: AnimNumber) {
        self.torso.reset(animation, self.clock.now_ms());
        self.torso.playing = self.playing;
    }

    /// Restart the legs with another animation
    pub fn set_legs_animation(&mut self, animation: AnimNumber) {
        self.legs.reset(animation, self.clock.now_ms());
        self.legs.playing = self.playing;
    }

    pub fn torso_animation(&self) -> AnimNumber {
        self.torso.animation
    }

    pub fn legs_animation(&self) -> AnimNumber {
        self.legs.animation
    }

    pub fn torso_state(&self) -> &PlaybackState {
        &self.torso
    }

    pub fn legs_state(&self) -> &PlaybackState {
        &self.legs
    }

    /// Pause or resume both parts
    pub fn set_playing(&mut self, playing: bool) {
        let now = self.clock.now_ms();
        self.playing = playing;
        self.torso.set_playing(playing, now);
        self.legs.set_playing(playing, now);
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Step both parts one frame while paused
    pub fn step_frame(&mut self, direction: i32) {
        let Some(config) = &self.animations else {
            return;
        };
        let (torso_anim, legs_anim) = (self.torso.animation, self.legs.animation);
        step(&mut self.torso, config.entry(torso_anim), direction);
        step(&mut self.legs, config.entry(legs_anim), direction);
    }

    /// Move the paused torso to a frame of its animation
    pub fn scrub_torso_to_frame(&mut self, frame: i32) {
        if let Some(config) = &self.animations {
            let anim = self.torso.animation;
            scrub(&mut self.torso, config.entry(anim), frame);
        }
    }

    /// Move the paused legs to a frame of their animation
    pub fn scrub_legs_to_frame(&mut self, frame: i32) {
        if let Some(config) = &self.animations {
            let anim = self.legs.animation;
            scrub(&mut self.legs, config.entry(anim), frame);
        }
    }

    pub fn torso_frame(&self) -> i32 {
        self.torso.current_frame
    }

    pub fn legs_frame(&self) -> i32 {
        self.legs.current_frame
    }

    /// Frames in the torso animation, 0 without an animation table
    pub fn torso_frame_count(&self) -> i32 {
        self.entry(self.torso.animation).map_or(0, |e| e.num_frames)
    }

    /// Frames in the legs animation, 0 without an animation table
    pub fn legs_frame_count(&self) -> i32 {
        self.entry(self.legs.animation).map_or(0, |e| e.num_frames)
    }

    /// Height of the bounding box center in the default pose
    pub fn center_height(&self) -> f32 {
        self.center_height
    }

    /// Half diagonal of the bounding box in the default pose
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    fn frames_of(&self, state: &PlaybackState) -> FramePair {
        self.entry(state.animation)
            .map_or(FramePair::still(0), |entry| resolve_frames(state, entry))
    }

    /// Advance playback to `now_ms` and compose the three parts
    pub fn update(&mut self, now_ms: f64) -> PlayerPose {
        if self.playing {
            if let Some(config) = &self.animations {
                let (legs_anim, torso_anim) = (self.legs.animation, self.torso.animation);
                advance(&mut self.legs, config.entry(legs_anim), now_ms);
                advance(&mut self.torso, config.entry(torso_anim), now_ms);
            }
        }

        let legs_frames = self.frames_of(&self.legs);
        let torso_frames = self.frames_of(&self.torso);

        let legs_transform = RigidTransform::IDENTITY;
        let torso_tag = lerp_tag(
            &self.models.legs,
            TAG_TORSO,
            legs_frames.frame_a,
            legs_frames.frame_b,
            legs_frames.fraction,
        );
        let torso_transform = attach(&legs_transform, &torso_tag);
        let head_tag = lerp_tag(
            &self.models.torso,
            TAG_HEAD,
            torso_frames.frame_a,
            torso_frames.frame_b,
            torso_frames.fraction,
        );
        let head_transform = attach(&torso_transform, &head_tag);

        PlayerPose {
            legs: PartPose {
                frames: legs_frames,
                transform: legs_transform,
            },
            torso: PartPose {
                frames: torso_frames,
                transform: torso_transform,
            },
            head: PartPose {
                frames: FramePair::still(0),
                transform: head_transform,
            },
        }
    }

    /// Update from the clock and hand legs, torso and head to `sink`
    pub fn render<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> PlayerPose {
        let pose = self.update(self.clock.now_ms());
        for part in BodyPart::ALL {
            let part_pose = pose.part(part);
            sink.render_part(&RenderPart {
                part,
                model: self.models.get(part),
                frames: part_pose.frames,
                transform: part_pose.transform,
                skin: self.skins.get(part),
            });
        }
        pose
    }

    fn compute_bounds(&mut self) {
        let first_frame = |animation: AnimNumber| self.entry(animation).map_or(0, |e| e.first_frame);
        let legs_frame = stored_frame(&self.models.legs, first_frame(AnimNumber::LegsIdle));
        let torso_frame = stored_frame(&self.models.torso, first_frame(AnimNumber::TorsoStand));

        if let Some((min, max)) = default_pose_bounds(&self.models, legs_frame, torso_frame) {
            self.center_height = (min.z + max.z) * 0.5;
            self.bounding_radius = ((max - min) * 0.5).length();
        }
    }
}

/// Frame index if the model stores it, else the first frame
fn stored_frame(model: &Md3Model, frame: i32) -> usize {
    usize::try_from(frame)
        .ok()
        .filter(|&f| f < model.num_frames())
        .unwrap_or(0)
}

fn tag_or_identity(model: &Md3Model, name: &str, frame: usize) -> Tag {
    model
        .tag_for_name(name, frame)
        .cloned()
        .unwrap_or_else(|| Tag::identity(name))
}

/// Bounding box of every vertex of the three parts, posed at fixed frames
fn default_pose_bounds(
    models: &Parts<Md3Model>,
    legs_frame: usize,
    torso_frame: usize,
) -> Option<(Vec3, Vec3)> {
    let legs = RigidTransform::IDENTITY;
    let torso = attach(&legs, &tag_or_identity(&models.legs, TAG_TORSO, legs_frame));
    let head = attach(&torso, &tag_or_identity(&models.torso, TAG_HEAD, torso_frame));

    let placed = [
        (&models.legs, legs_frame, legs),
        (&models.torso, torso_frame, torso),
        (&models.head, 0, head),
    ];

    let mut bounds: Option<(Vec3, Vec3)> = None;
    for (model, frame, transform) in placed {
        for surface in &model.surfaces {
            for vertex in surface.frame_vertices(frame) {
                let p = transform.transform_point(vertex.position);
                bounds = Some(match bounds {
                    Some((min, max)) => (min.min(p), max.max(p)),
                    None => (p, p),
                });
            }
        }
    }
    bounds
}

fn sort_skin_names(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_key(|name| {
        (
            !name.eq_ignore_ascii_case(DEFAULT_SKIN),
            name.to_ascii_lowercase(),
        )
    });
    names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    names
}

//! Animation identifiers and per-animation playback parameters

use std::fmt;
use std::ops::{Index, IndexMut};

/// Player animations in the order they appear in `animation.cfg`,
/// followed by the entries synthesized after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimNumber {
    BothDeath1 = 0,
    BothDead1,
    BothDeath2,
    BothDead2,
    BothDeath3,
    BothDead3,

    TorsoGesture,

    TorsoAttack,
    TorsoAttack2,

    TorsoDrop,
    TorsoRaise,

    TorsoStand,
    TorsoStand2,

    LegsWalkCr,
    LegsWalk,
    LegsRun,
    LegsBack,
    LegsSwim,

    LegsJump,
    LegsLand,

    LegsJumpB,
    LegsLandB,

    LegsIdle,
    LegsIdleCr,

    LegsTurn,

    TorsoGetFlag,
    TorsoGuardBase,
    TorsoPatrol,
    TorsoFollowMe,
    TorsoAffirmative,
    TorsoNegative,

    // Synthesized after parsing
    LegsBackCr,
    LegsBackWalk,
    FlagRun,
    FlagStand,
    FlagStand2Run,
}

/// Number of animations read from `animation.cfg`
pub const MAX_ANIMATIONS: usize = 31;

/// Size of the full table including synthesized entries
pub const MAX_TOTAL_ANIMATIONS: usize = 36;

impl AnimNumber {
    /// Every animation, in table order
    pub const ALL: [Self; MAX_TOTAL_ANIMATIONS] = [
        Self::BothDeath1,
        Self::BothDead1,
        Self::BothDeath2,
        Self::BothDead2,
        Self::BothDeath3,
        Self::BothDead3,
        Self::TorsoGesture,
        Self::TorsoAttack,
        Self::TorsoAttack2,
        Self::TorsoDrop,
        Self::TorsoRaise,
        Self::TorsoStand,
        Self::TorsoStand2,
        Self::LegsWalkCr,
        Self::LegsWalk,
        Self::LegsRun,
        Self::LegsBack,
        Self::LegsSwim,
        Self::LegsJump,
        Self::LegsLand,
        Self::LegsJumpB,
        Self::LegsLandB,
        Self::LegsIdle,
        Self::LegsIdleCr,
        Self::LegsTurn,
        Self::TorsoGetFlag,
        Self::TorsoGuardBase,
        Self::TorsoPatrol,
        Self::TorsoFollowMe,
        Self::TorsoAffirmative,
        Self::TorsoNegative,
        Self::LegsBackCr,
        Self::LegsBackWalk,
        Self::FlagRun,
        Self::FlagStand,
        Self::FlagStand2Run,
    ];

    /// Table index of this animation
    pub fn index(self) -> usize {
        self as usize
    }

    /// Animation at a table index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this entry is read from `animation.cfg` rather than synthesized
    pub fn is_parsed(self) -> bool {
        self.index() < MAX_ANIMATIONS
    }

    /// Whether this is one of the team gestures missing from older configs
    pub fn is_team_action(self) -> bool {
        (Self::TorsoGetFlag..=Self::TorsoNegative).contains(&self)
    }

    /// Whether this animation drives the torso model
    pub fn is_torso(self) -> bool {
        matches!(
            self,
            Self::TorsoGesture
                | Self::TorsoAttack
                | Self::TorsoAttack2
                | Self::TorsoDrop
                | Self::TorsoRaise
                | Self::TorsoStand
                | Self::TorsoStand2
        ) || self.is_team_action()
    }

    /// Whether this animation drives the legs model
    pub fn is_legs(self) -> bool {
        (Self::LegsWalkCr..=Self::LegsTurn).contains(&self)
            || matches!(self, Self::LegsBackCr | Self::LegsBackWalk)
    }

    /// Conventional upper-case name, e.g. `TORSO_STAND`
    pub fn name(self) -> &'static str {
        ANIMATION_NAMES[self.index()]
    }

    /// Look up an animation by its conventional name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        ANIMATION_NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .and_then(Self::from_index)
    }
}

impl fmt::Display for AnimNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ANIMATION_NAMES: [&str; MAX_TOTAL_ANIMATIONS] = [
    "BOTH_DEATH1",
    "BOTH_DEAD1",
    "BOTH_DEATH2",
    "BOTH_DEAD2",
    "BOTH_DEATH3",
    "BOTH_DEAD3",
    "TORSO_GESTURE",
    "TORSO_ATTACK",
    "TORSO_ATTACK2",
    "TORSO_DROP",
    "TORSO_RAISE",
    "TORSO_STAND",
    "TORSO_STAND2",
    "LEGS_WALKCR",
    "LEGS_WALK",
    "LEGS_RUN",
    "LEGS_BACK",
    "LEGS_SWIM",
    "LEGS_JUMP",
    "LEGS_LAND",
    "LEGS_JUMPB",
    "LEGS_LANDB",
    "LEGS_IDLE",
    "LEGS_IDLECR",
    "LEGS_TURN",
    "TORSO_GETFLAG",
    "TORSO_GUARDBASE",
    "TORSO_PATROL",
    "TORSO_FOLLOWME",
    "TORSO_AFFIRMATIVE",
    "TORSO_NEGATIVE",
    "LEGS_BACKCR",
    "LEGS_BACKWALK",
    "FLAG_RUN",
    "FLAG_STAND",
    "FLAG_STAND2RUN",
];

/// Playback parameters of one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationEntry {
    /// First frame in the owning model
    pub first_frame: i32,
    /// Number of frames in the animation
    pub num_frames: i32,
    /// Size of the repeating tail window, 0 for no loop
    pub loop_frames: i32,
    /// Milliseconds per frame
    pub frame_lerp: i32,
    /// Play the frame range back to front
    pub reversed: bool,
    /// Reserved
    pub flipflop: bool,
}

impl AnimationEntry {
    /// Frame duration for a playback rate, rounded to whole milliseconds
    pub fn lerp_for_fps(fps: f32) -> i32 {
        let fps = if fps == 0.0 { 1.0 } else { fps };
        (1000.0 / fps).round() as i32
    }

    /// Whether the animation repeats its tail window
    pub fn is_looping(&self) -> bool {
        self.loop_frames > 0
    }

    /// Frame an advancing animation wraps back to when it runs off the end
    pub fn loop_start(&self) -> i32 {
        self.num_frames
            .saturating_sub(self.loop_frames.min(self.num_frames))
    }
}

/// Fixed-size table of animation entries indexed by [`AnimNumber`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationTable {
    entries: Vec<AnimationEntry>,
}

impl AnimationTable {
    /// Table with every entry zeroed
    pub fn new() -> Self {
        Self {
            entries: vec![AnimationEntry::default(); MAX_TOTAL_ANIMATIONS],
        }
    }

    /// Entries paired with their identifiers, in table order
    pub fn iter(&self) -> impl Iterator<Item = (AnimNumber, &AnimationEntry)> {
        AnimNumber::ALL.iter().copied().zip(self.entries.iter())
    }
}

impl Default for AnimationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<AnimNumber> for AnimationTable {
    type Output = AnimationEntry;

    fn index(&self, anim: AnimNumber) -> &Self::Output {
        &self.entries[anim.index()]
    }
}

impl IndexMut<AnimNumber> for AnimationTable {
    fn index_mut(&mut self, anim: AnimNumber) -> &mut Self::Output {
        &mut self.entries[anim.index()]
    }
}

//! Quake III MD3 models and articulated player rigs.
//!
//! The crate decodes `.md3` model files, parses player `animation.cfg` and
//! `.skin` files, and drives a three-part player model (legs, torso, head)
//! whose parts are chained through interpolated attachment tags.
//!
//! Rendering, file access and timing are left to the host through the
//! [`RenderSink`], [`ResourceProvider`], [`TextureResolver`] and [`Clock`]
//! traits.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use q3_md3::{DirectoryProvider, MonotonicClock, PlayerModel, PlayerModelOptions};
//!
//! # fn main() -> q3_md3::Result<()> {
//! let provider = Arc::new(DirectoryProvider::new("baseq3")?);
//! let mut player = PlayerModel::load(
//!     provider,
//!     "models/players/sarge",
//!     Arc::new(MonotonicClock::new()),
//!     PlayerModelOptions::default(),
//! )?;
//!
//! let pose = player.update(0.0);
//! println!("head at {:?}, center height {}", pose.head.transform.origin, player.center_height());
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod clock;
pub mod common;
pub mod error;
pub mod header;
pub mod model;
pub mod normal;
pub mod player_model;
pub mod render;
pub mod resource;
pub mod skeleton;
pub mod skin;

// Re-export common types
pub use animation::{AnimNumber, AnimationConfig, AnimationEntry, FramePair, PlaybackState};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{Md3Error, Result};
pub use header::Md3Header;
pub use model::{Frame, Md3Model, Surface, Tag, Vertex};
pub use normal::decode_normal;
pub use player_model::{BodyPart, PartPose, PlayerModel, PlayerModelOptions, PlayerPose};
pub use render::{RenderPart, RenderSink};
pub use resource::{DirectoryProvider, MemoryProvider, ResourceProvider, TextureResolver};
pub use skeleton::{RigidTransform, attach, blend_tags, lerp_tag};
pub use skin::SkinMapping;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

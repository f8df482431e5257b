//! MD3 player animation
//!
//! This module provides:
//! - The animation identifiers and table read from `animation.cfg`
//! - The `animation.cfg` parser, including the legs frame offset correction
//! - Per-part playback state driven by time, stepping and scrubbing
//!
//! # Example
//!
//! ```rust
//! use q3_md3::animation::{AnimNumber, AnimationConfig, PlaybackState, advance, resolve_frames};
//!
//! let config = AnimationConfig::parse(b"0 30 0 25\n");
//! let entry = config.entry(AnimNumber::BothDeath1);
//!
//! let mut state = PlaybackState::new(AnimNumber::BothDeath1, 0.0);
//! advance(&mut state, entry, 100.0);
//! let frames = resolve_frames(&state, entry);
//! assert_eq!(frames.frame_a, 2);
//! ```

mod config;
mod player;
mod types;

pub use config::{AnimationConfig, decode_text};
pub use player::{FramePair, PlaybackState, advance, resolve_frames, scrub, step};
pub use types::{AnimNumber, AnimationEntry, AnimationTable, MAX_ANIMATIONS, MAX_TOTAL_ANIMATIONS};

//! Per-body-part playback state and its transitions
//!
//! A [`PlaybackState`] is advanced by wall-clock time while playing, and
//! stepped or scrubbed frame by frame while paused. Frames in the state are
//! relative to the animation; [`resolve_frames`] maps them to model frames.

use super::types::{AnimNumber, AnimationEntry};

/// Playback state of one animated body part
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackState {
    /// Animation being played
    pub animation: AnimNumber,
    /// Current frame, relative to the animation
    pub current_frame: i32,
    /// Frame being blended towards, relative to the animation
    pub next_frame: i32,
    /// Blend weight between current and next frame, in [0, 1)
    pub fraction: f32,
    /// Time of the last frame change (milliseconds)
    pub frame_time: f64,
    /// Whether time advances this state
    pub playing: bool,
}

/// Absolute model frames and blend weight for one part
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct FramePair {
    pub frame_a: i32,
    pub frame_b: i32,
    pub fraction: f32,
}

impl FramePair {
    /// Both frames at one pose without blending
    pub fn still(frame: i32) -> Self {
        Self {
            frame_a: frame,
            frame_b: frame,
            fraction: 0.0,
        }
    }
}

impl PlaybackState {
    /// Start an animation at its first frame
    pub fn new(animation: AnimNumber, now_ms: f64) -> Self {
        Self {
            animation,
            current_frame: 0,
            next_frame: 0,
            fraction: 0.0,
            frame_time: now_ms,
            playing: true,
        }
    }

    /// Restart with another animation
    pub fn reset(&mut self, animation: AnimNumber, now_ms: f64) {
        *self = Self::new(animation, now_ms);
    }

    /// Pause or resume. Resuming restarts the frame clock so the time spent
    /// paused is not played back.
    pub fn set_playing(&mut self, playing: bool, now_ms: f64) {
        if playing && !self.playing {
            self.frame_time = now_ms;
        }
        self.playing = playing;
    }
}

/// Wrap a frame that ran past the end of the animation
fn wrap_frame(entry: &AnimationEntry, frame: i32) -> i32 {
    if frame < entry.num_frames {
        frame
    } else if entry.is_looping() {
        entry.loop_start()
    } else {
        entry.num_frames - 1
    }
}

/// Advance a playing state to `now_ms`
pub fn advance(state: &mut PlaybackState, entry: &AnimationEntry, now_ms: f64) {
    if !state.playing || entry.frame_lerp <= 0 || entry.num_frames <= 1 {
        return;
    }

    let lerp = f64::from(entry.frame_lerp);
    let mut fraction = ((now_ms - state.frame_time) / lerp).max(0.0);

    while fraction >= 1.0 {
        fraction -= 1.0;
        state.frame_time += lerp;
        state.current_frame += 1;

        if entry.is_looping() {
            state.current_frame = wrap_frame(entry, state.current_frame);
        } else if state.current_frame >= entry.num_frames - 1 {
            state.current_frame = entry.num_frames - 1;
            fraction = 0.0;
        }
        log::trace!(
            "{}: frame {} of {}",
            state.animation,
            state.current_frame,
            entry.num_frames
        );
    }

    state.next_frame = wrap_frame(entry, state.current_frame + 1);
    state.fraction = fraction as f32;
}

/// Move a paused state one frame forwards or backwards, wrapping around
pub fn step(state: &mut PlaybackState, entry: &AnimationEntry, direction: i32) {
    if state.playing || entry.num_frames <= 0 {
        return;
    }
    let frame = i64::from(state.current_frame) + i64::from(direction);
    state.current_frame = frame.rem_euclid(i64::from(entry.num_frames)) as i32;
    state.next_frame = state.current_frame;
    state.fraction = 0.0;
}

/// Jump a paused state to an explicit frame, taken modulo the frame count
pub fn scrub(state: &mut PlaybackState, entry: &AnimationEntry, frame: i32) {
    if state.playing || entry.num_frames <= 0 {
        return;
    }
    state.current_frame = frame.rem_euclid(entry.num_frames);
    state.next_frame = state.current_frame;
    state.fraction = 0.0;
}

/// Map the state's relative frames to absolute model frames
pub fn resolve_frames(state: &PlaybackState, entry: &AnimationEntry) -> FramePair {
    let absolute = |frame: i32| {
        if entry.reversed {
            entry
                .first_frame
                .wrapping_add(entry.num_frames - 1)
                .wrapping_sub(frame)
        } else {
            entry.first_frame.wrapping_add(frame)
        }
    };
    FramePair {
        frame_a: absolute(state.current_frame),
        frame_b: absolute(state.next_frame),
        fraction: state.fraction,
    }
}

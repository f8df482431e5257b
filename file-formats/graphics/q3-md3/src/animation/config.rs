//! Parser for player `animation.cfg` files

use super::types::{AnimNumber, AnimationEntry, AnimationTable, MAX_ANIMATIONS};

/// Parsed animation configuration of a player model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationConfig {
    /// Entries for every animation, including synthesized ones
    pub animations: AnimationTable,
    /// `fixedlegs` keyword was present
    pub fixed_legs: bool,
    /// `fixedtorso` keyword was present
    pub fixed_torso: bool,
}

/// Decode text as UTF-8, falling back to Latin-1 when that fails
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => data.iter().map(|&b| char::from(b)).collect(),
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(['\r', '\n'])
        .map(|line| line.find("//").map_or(line, |idx| &line[..idx]))
        .flat_map(str::split_whitespace)
        .collect()
}

fn starts_data(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn parse_int(token: &str) -> i32 {
    token
        .parse::<i32>()
        .or_else(|_| token.parse::<f32>().map(|f| f as i32))
        .unwrap_or(0)
}

fn parse_float(token: &str) -> f32 {
    token.parse::<f32>().unwrap_or(0.0)
}

impl AnimationConfig {
    /// Parse raw `animation.cfg` bytes
    pub fn parse(data: &[u8]) -> Self {
        Self::parse_str(&decode_text(data))
    }

    /// Parse `animation.cfg` text
    pub fn parse_str(text: &str) -> Self {
        let tokens = tokenize(text);
        let mut config = Self::default();
        let mut pos = 0;

        // Optional header keywords
        while let Some(&token) = tokens.get(pos) {
            if starts_data(token) {
                break;
            }
            pos += match token.to_ascii_lowercase().as_str() {
                "footsteps" | "sex" => 2,
                "headoffset" => 4,
                "fixedlegs" => {
                    config.fixed_legs = true;
                    1
                }
                "fixedtorso" => {
                    config.fixed_torso = true;
                    1
                }
                other => {
                    log::debug!("ignoring unknown animation.cfg keyword '{}'", other);
                    1
                }
            };
        }

        let table = &mut config.animations;
        let mut skip = 0;

        for anim in AnimNumber::ALL.iter().copied().take(MAX_ANIMATIONS) {
            let Some(fields) = tokens.get(pos..pos + 4) else {
                if anim.is_team_action() {
                    table[anim] = table[AnimNumber::TorsoGesture];
                    continue;
                }
                log::warn!(
                    "animation.cfg ended before {}; remaining entries are zero",
                    anim
                );
                break;
            };
            pos += 4;

            let mut entry = AnimationEntry {
                first_frame: parse_int(fields[0]),
                ..Default::default()
            };

            // Legs frames are numbered after the torso frames in the file
            if anim == AnimNumber::LegsWalkCr {
                skip = entry
                    .first_frame
                    .wrapping_sub(table[AnimNumber::TorsoGesture].first_frame);
            }
            if (AnimNumber::LegsWalkCr..AnimNumber::TorsoGetFlag).contains(&anim) {
                entry.first_frame = entry.first_frame.wrapping_sub(skip);
            }

            let num_frames = parse_int(fields[1]);
            entry.reversed = num_frames < 0;
            entry.num_frames = num_frames.saturating_abs();
            entry.loop_frames = parse_int(fields[2]);
            entry.frame_lerp = AnimationEntry::lerp_for_fps(parse_float(fields[3]));

            table[anim] = entry;
        }

        table[AnimNumber::LegsBackCr] = AnimationEntry {
            reversed: true,
            ..table[AnimNumber::LegsWalkCr]
        };
        table[AnimNumber::LegsBackWalk] = AnimationEntry {
            reversed: true,
            ..table[AnimNumber::LegsWalk]
        };
        table[AnimNumber::FlagRun] = AnimationEntry {
            first_frame: 0,
            num_frames: 16,
            loop_frames: 16,
            frame_lerp: AnimationEntry::lerp_for_fps(15.0),
            reversed: false,
            flipflop: false,
        };
        table[AnimNumber::FlagStand] = AnimationEntry {
            first_frame: 16,
            num_frames: 5,
            loop_frames: 0,
            frame_lerp: AnimationEntry::lerp_for_fps(20.0),
            reversed: false,
            flipflop: false,
        };
        table[AnimNumber::FlagStand2Run] = AnimationEntry {
            first_frame: 16,
            num_frames: 5,
            loop_frames: 1,
            frame_lerp: AnimationEntry::lerp_for_fps(15.0),
            reversed: true,
            flipflop: false,
        };

        config
    }

    /// Entry for an animation
    pub fn entry(&self, anim: AnimNumber) -> &AnimationEntry {
        &self.animations[anim]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(first_frames: impl Fn(AnimNumber) -> i32) -> String {
        AnimNumber::ALL
            .iter()
            .take(MAX_ANIMATIONS)
            .map(|&a| format!("{} 10 0 20\n", first_frames(a)))
            .collect()
    }

    #[test]
    fn test_header_keywords() {
        let text = format!(
            "// player config\nsex m\nfootsteps boot\nheadoffset 0 0 0\nfixedtorso\n{}",
            lines(|_| 0)
        );
        let config = AnimationConfig::parse_str(&text);
        assert!(config.fixed_torso);
        assert!(!config.fixed_legs);
        assert_eq!(config.entry(AnimNumber::BothDeath1).num_frames, 10);
    }

    #[test]
    fn test_negative_frames_set_reversed() {
        let config = AnimationConfig::parse_str("0 -8 0 10\n");
        let entry = config.entry(AnimNumber::BothDeath1);
        assert_eq!(entry.num_frames, 8);
        assert!(entry.reversed);
        assert_eq!(entry.frame_lerp, 100);
    }

    #[test]
    fn test_most_negative_frame_count_saturates() {
        let config = AnimationConfig::parse_str("0 -2147483648 0 10\n");
        let entry = config.entry(AnimNumber::BothDeath1);
        assert_eq!(entry.num_frames, i32::MAX);
        assert!(entry.reversed);
    }

    #[test]
    fn test_extreme_skip_offset_wraps() {
        let text = lines(|anim| match anim {
            AnimNumber::TorsoGesture => -10,
            AnimNumber::LegsWalkCr => i32::MAX,
            _ => 0,
        });
        let config = AnimationConfig::parse_str(&text);
        assert_eq!(config.entry(AnimNumber::LegsWalkCr).first_frame, -10);
        // Skip is i32::MAX + 10 wrapped, so 0 - skip wraps too
        assert_eq!(
            config.entry(AnimNumber::LegsIdle).first_frame,
            0i32.wrapping_sub(i32::MAX.wrapping_add(10))
        );
    }

    #[test]
    fn test_zero_fps_treated_as_one() {
        let config = AnimationConfig::parse_str("0 1 0 0\n");
        assert_eq!(config.entry(AnimNumber::BothDeath1).frame_lerp, 1000);
    }

    #[test]
    fn test_trailing_comments_are_stripped() {
        let config = AnimationConfig::parse_str("0 30 0 25 // BOTH_DEATH1\n");
        let entry = config.entry(AnimNumber::BothDeath1);
        assert_eq!(entry.num_frames, 30);
        assert_eq!(entry.frame_lerp, 40);
    }

    #[test]
    fn test_missing_team_actions_copy_gesture() {
        let text: String = AnimNumber::ALL
            .iter()
            .take(AnimNumber::TorsoGetFlag.index())
            .map(|&a| {
                if a == AnimNumber::TorsoGesture {
                    "90 16 0 15\n".to_string()
                } else {
                    "0 1 0 20\n".to_string()
                }
            })
            .collect();
        let config = AnimationConfig::parse_str(&text);
        let gesture = *config.entry(AnimNumber::TorsoGesture);
        for anim in AnimNumber::ALL.iter().filter(|a| a.is_team_action()) {
            assert_eq!(*config.entry(*anim), gesture);
        }
    }

    #[test]
    fn test_latin1_fallback() {
        let mut data = b"// caf\xe9\n".to_vec();
        data.extend_from_slice(b"5 2 0 10\n");
        let config = AnimationConfig::parse(&data);
        assert_eq!(config.entry(AnimNumber::BothDeath1).first_frame, 5);
    }

    #[test]
    fn test_synthesized_entries() {
        let text = lines(|a| a.index() as i32);
        let config = AnimationConfig::parse_str(&text);
        let walk = config.entry(AnimNumber::LegsWalk);
        let back = config.entry(AnimNumber::LegsBackWalk);
        assert_eq!(back.first_frame, walk.first_frame);
        assert!(back.reversed);
        assert!(config.entry(AnimNumber::LegsBackCr).reversed);

        let flag_run = config.entry(AnimNumber::FlagRun);
        assert_eq!((flag_run.first_frame, flag_run.num_frames, flag_run.loop_frames), (0, 16, 16));
        let stand = config.entry(AnimNumber::FlagStand);
        assert_eq!((stand.first_frame, stand.num_frames, stand.loop_frames), (16, 5, 0));
        assert_eq!(stand.frame_lerp, 50);
        let to_run = config.entry(AnimNumber::FlagStand2Run);
        assert_eq!((to_run.first_frame, to_run.loop_frames), (16, 1));
        assert!(to_run.reversed);
    }

    #[test]
    fn test_empty_input() {
        let config = AnimationConfig::parse(b"");
        assert_eq!(config.entry(AnimNumber::TorsoStand).num_frames, 0);
        assert_eq!(config.entry(AnimNumber::FlagRun).num_frames, 16);
    }
}

mod common;

use std::sync::Arc;

use common::{PLAYER_DIR, player_provider};
use glam::Vec3;
use q3_md3::animation::AnimNumber;
use q3_md3::{
    BodyPart, FramePair, ManualClock, Md3Error, MemoryProvider, PlayerModel, PlayerModelOptions,
    RenderPart, RenderSink, ResourceProvider, RigidTransform, TextureResolver,
};

fn load(provider: MemoryProvider, clock: &ManualClock) -> PlayerModel {
    PlayerModel::load(
        Arc::new(provider),
        PLAYER_DIR,
        Arc::new(clock.clone()),
        PlayerModelOptions::default(),
    )
    .expect("Player model should load")
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-4, "{a} != {b}");
}

#[test]
fn test_load_computes_bounds() {
    let clock = ManualClock::new(0.0);
    let player = load(player_provider(), &clock);

    // Box spans z -24..44 and x, y -10..10 in the default pose
    assert_close(player.center_height(), 10.0);
    assert_close(player.bounding_radius(), (100.0f32 + 100.0 + 34.0 * 34.0).sqrt());
    assert_eq!(player.torso_animation(), AnimNumber::TorsoStand);
    assert_eq!(player.legs_animation(), AnimNumber::LegsIdle);
    assert_eq!(player.legs_frame_count(), 4);
    assert!(player.playing());
}

#[test]
fn test_missing_part_is_fatal() {
    let full = player_provider();
    let mut provider = MemoryProvider::new();
    for file in full.list() {
        if !file.ends_with("head.md3") {
            provider.insert(file.clone(), full.read(&file).unwrap());
        }
    }
    let err = PlayerModel::load(
        Arc::new(provider),
        PLAYER_DIR,
        Arc::new(ManualClock::default()),
        PlayerModelOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Md3Error::MissingResource(ref p) if p.ends_with("head.md3")));
}

#[test]
fn test_missing_animation_table() {
    let mut provider = MemoryProvider::new();
    let full = player_provider();
    for file in full.list() {
        if !file.ends_with("animation.cfg") {
            provider.insert(file.clone(), full.read(&file).unwrap());
        }
    }
    let clock = ManualClock::new(0.0);
    let mut player = load(provider, &clock);

    assert!(player.animations().is_none());
    assert_eq!(player.torso_frame_count(), 0);
    assert_eq!(player.legs_frame_count(), 0);

    let pose = player.update(1000.0);
    assert_eq!(pose.legs.frames, FramePair::still(0));
    // Tags at frame 0 still place the parts
    assert_close(pose.torso.transform.origin.z, 20.0);
    assert_close(pose.head.transform.origin.z, 36.0);
}

#[test]
fn test_update_interpolates_attachment_chain() {
    let clock = ManualClock::new(0.0);
    let mut player = load(player_provider(), &clock);

    let pose = player.update(250.0);
    assert_eq!(pose.legs.frames.frame_a, 2);
    assert_eq!(pose.legs.frames.frame_b, 3);
    assert_close(pose.legs.frames.fraction, 0.5);
    assert_eq!(pose.legs.transform, RigidTransform::IDENTITY);

    // tag_torso rises one unit per legs frame from 20
    assert_close(pose.torso.transform.origin.z, 22.5);
    assert_close(pose.head.transform.origin.z, 38.5);
    assert_eq!(pose.head.frames, FramePair::still(0));
    for row in pose.head.transform.axis {
        assert_close(row.length(), 1.0);
    }
}

#[test]
fn test_looping_legs_wrap_to_window_start() {
    let clock = ManualClock::new(0.0);
    let mut player = load(player_provider(), &clock);
    player.set_legs_animation(AnimNumber::LegsRun);

    // LEGS_RUN is legs frames 4..10 looping all 6
    let pose = player.update(650.0);
    assert_eq!(player.legs_frame(), 0);
    assert_eq!(pose.legs.frames.frame_a, 4);
    assert_eq!(pose.legs.frames.frame_b, 5);
}

#[test]
fn test_non_looping_torso_holds_last_frame() {
    let clock = ManualClock::new(0.0);
    let mut player = load(player_provider(), &clock);
    player.set_torso_animation(AnimNumber::TorsoAttack);

    let pose = player.update(10_000.0);
    assert_eq!(player.torso_frame(), 5);
    assert_eq!(pose.torso.frames, FramePair::still(9));
}

#[test]
fn test_pause_step_and_scrub() {
    let clock = ManualClock::new(0.0);
    let mut player = load(player_provider(), &clock);

    player.step_frame(1);
    assert_eq!(player.torso_frame(), 0);

    clock.set(120.0);
    player.set_playing(false);
    assert!(!player.playing());
    player.update(5000.0);
    assert_eq!(player.torso_frame(), 0);

    player.step_frame(-1);
    assert_eq!((player.torso_frame(), player.legs_frame()), (3, 3));
    player.scrub_torso_to_frame(4);
    player.scrub_legs_to_frame(-1);
    assert_eq!((player.torso_frame(), player.legs_frame()), (0, 3));

    // Resuming does not replay the paused time
    clock.set(10_000.0);
    player.set_playing(true);
    player.update(10_050.0);
    assert_eq!(player.torso_frame(), 0);
    assert_close(player.torso_state().fraction, 0.5);
}

#[test]
fn test_animation_change_while_paused_stays_paused() {
    let clock = ManualClock::new(0.0);
    let mut player = load(player_provider(), &clock);
    player.set_playing(false);
    player.set_legs_animation(AnimNumber::LegsRun);
    player.update(1000.0);
    assert_eq!(player.legs_frame(), 0);
    player.scrub_legs_to_frame(2);
    assert_eq!(player.legs_frame(), 2);
}

#[derive(Default)]
struct Recorder {
    parts: Vec<(BodyPart, FramePair, Vec3)>,
    textures: Vec<String>,
}

struct Paths;

impl TextureResolver for Paths {
    type Handle = String;

    fn texture_for_path(&mut self, path: &str) -> String {
        path.to_string()
    }

    fn white(&mut self) -> String {
        "*white".to_string()
    }
}

impl RenderSink for Recorder {
    fn render_part(&mut self, part: &RenderPart<'_>) {
        self.parts
            .push((part.part, part.frames, part.transform.origin));
        for (_, texture) in part.surface_textures(&mut Paths) {
            self.textures.push(texture);
        }
    }
}

#[test]
fn test_render_order_and_skins() {
    let clock = ManualClock::new(0.0);
    let mut player = load(player_provider(), &clock);

    clock.set(100.0);
    let mut sink = Recorder::default();
    let pose = player.render(&mut sink);

    let order: Vec<BodyPart> = sink.parts.iter().map(|p| p.0).collect();
    assert_eq!(order, BodyPart::ALL.to_vec());
    assert_eq!(sink.parts[1].1, pose.torso.frames);
    assert_eq!(pose.legs.frames.frame_a, 1);
    assert_eq!(
        sink.textures,
        vec![
            "models/players/tester/legs.tga",
            "models/players/tester/torso.tga",
            "models/players/tester/head.tga",
        ]
    );

    player.select_skin("blue");
    assert_eq!(player.skin_name(), "blue");
    let mut sink = Recorder::default();
    player.render(&mut sink);
    assert_eq!(sink.textures[2], "models/players/tester/head_blue.tga");
}

#[test]
fn test_missing_skin_falls_back() {
    let clock = ManualClock::new(0.0);
    let mut player = load(player_provider(), &clock);
    player.select_skin("green");
    assert!(player.skin(BodyPart::Legs).is_empty());

    let mut sink = Recorder::default();
    player.render(&mut sink);
    assert_eq!(
        sink.textures,
        vec!["*white", "*white", "models/players/tester/head.tga"]
    );
}

#[test]
fn test_available_skins() {
    let clock = ManualClock::new(0.0);
    let provider = player_provider()
        .with(format!("{PLAYER_DIR}/lower_Arctic.skin"), "")
        .with("models/players/other/lower_zzz.skin", "");
    let player = load(provider, &clock);
    assert_eq!(player.available_skins(), vec!["default", "Arctic", "blue"]);
}

#[test]
fn test_render_part_reduces_frames() {
    let clock = ManualClock::new(0.0);
    let player = load(player_provider(), &clock);
    let part = RenderPart {
        part: BodyPart::Torso,
        model: player.model(BodyPart::Torso),
        frames: FramePair {
            frame_a: 12,
            frame_b: -1,
            fraction: 0.25,
        },
        transform: RigidTransform::IDENTITY,
        skin: player.skin(BodyPart::Torso),
    };
    assert_eq!(part.model_frames(), (2, 9));
    let surface = &player.model(BodyPart::Torso).surfaces[0];
    assert_eq!(part.blended_vertices(surface).len(), 3);
}

#[test]
fn test_player_model_paths() {
    let provider = player_provider();
    assert_eq!(provider.player_model_paths(), vec![PLAYER_DIR]);
}

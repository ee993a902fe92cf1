//! Integration tests for the timeline subsystem.
//!
//! Exercises cross-crate interactions between snapcut-core,
//! snapcut-timeline, snapcut-effects and snapcut-render.

use proptest::prelude::*;
use snapcut_color::{ColorGradingAdjustments, Lut3D, WhiteBalance};
use snapcut_core::{Color, Easing, Frame, FrameRate, Keyframe, KeyframeTrack, RationalTime};
use snapcut_effects::{ChromaKeySettings, Effect, EffectInstance, Stylize, TransitionKind};
use snapcut_render::{Compositor, StillSource};
use snapcut_timeline::{
    property, Clip, ClipRef, Project, ProjectFile, Track, TrackKind, TransitionEdge, TransitionSpec,
};

// ── Helpers ────────────────────────────────────────────────────

fn ms(v: i64) -> RationalTime {
    RationalTime::from_millis(v)
}

fn clip(name: &str, start_ms: i64, dur_ms: i64) -> Clip {
    Clip::new(name, ClipRef::new("media/test", ms(dur_ms))).at(ms(start_ms))
}

fn build_project() -> Project {
    let mut project = Project::new("Integration Test Project", 8, 4, FrameRate::FPS_24);

    let mut video = Track::new_video("V1");
    video.add_clip(clip("Intro", 0, 5000)).unwrap();
    video
        .add_clip(
            clip("Body", 5000, 30_000)
                .with_effect(EffectInstance::new(Effect::ColorGrade(ColorGradingAdjustments {
                    white_balance: WhiteBalance {
                        temperature: 20.0,
                        tint: 0.0,
                    },
                    lut: Some(Lut3D::identity(17).unwrap()),
                    ..Default::default()
                })))
                .with_effect(EffectInstance::disabled(Effect::Stylize(Stylize::Invert)))
                .with_transition(TransitionSpec::new(
                    TransitionKind::Dissolve,
                    ms(500),
                    TransitionEdge::Start,
                )),
        )
        .unwrap();
    video.add_clip(clip("Outro", 35_000, 10_000)).unwrap();

    let mut overlay = Track::new("Logo", TrackKind::Overlay).with_z_order(1);
    overlay
        .add_clip(
            clip("Logo", 1000, 4000)
                .with_effect(EffectInstance::new(Effect::ChromaKey(ChromaKeySettings::green_screen())))
                .with_keyframes(KeyframeTrack::from_samples(
                    property::OPACITY,
                    [Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)],
                    Easing::EaseInOut,
                )),
        )
        .unwrap();

    let mut music = Track::new_audio("Music");
    music.add_clip(clip("Music", 0, 50_000)).unwrap();

    project.add_track(video);
    project.add_track(overlay);
    project.add_track(music);
    project
}

// ── Project assembly & timing ──────────────────────────────────

#[test]
fn project_duration_is_max_clip_end() {
    let project = build_project();
    assert_eq!(project.duration(), ms(50_000));
    assert!(project.validate().is_ok());
}

#[test]
fn active_clips_follow_transition_windows() {
    let project = build_project();
    let video = project.track(0).unwrap();

    let names = |t: i64| -> Vec<String> {
        video
            .active_clips(ms(t), false)
            .iter()
            .map(|c| c.name.clone())
            .collect()
    };
    assert_eq!(names(100), ["Intro"]);
    assert_eq!(names(4750), ["Intro", "Body"]);
    assert_eq!(names(5000), ["Body"]);
    assert_eq!(names(35_000), ["Outro"]);
    assert!(names(45_000).is_empty());
}

#[test]
fn overlapping_clip_is_rejected() {
    let mut project = build_project();
    let video = project.track_mut(0).unwrap();
    assert!(video.add_clip(clip("Late", 44_000, 2000)).is_err());
    assert!(video.add_clip(clip("Tail", 45_000, 2000)).is_ok());
}

#[test]
fn trim_outside_source_is_rejected() {
    let bad = clip("Bad", 0, 1000).trimmed(ms(800), ms(500));
    let mut track = Track::new_video("V1");
    assert!(track.add_clip(bad).is_err());
}

// ── Snapshots ──────────────────────────────────────────────────

#[test]
fn snapshot_roundtrip_preserves_everything() {
    let project = build_project();
    let json = ProjectFile::new(project.clone()).to_json().unwrap();
    let loaded = ProjectFile::from_json(&json).unwrap();
    assert_eq!(loaded.project, project);
}

#[test]
fn snapshot_renders_identically() {
    let project = build_project();
    let json = ProjectFile::new(project.clone()).to_json().unwrap();
    let loaded = ProjectFile::from_json(&json).unwrap().project;

    let source = StillSource::new().with("media/test", Frame::test_pattern(8, 4));
    let compositor = Compositor::new(source);
    for t in [0, 1500, 4750, 20_000] {
        assert_eq!(
            compositor.render(&project, ms(t)).unwrap(),
            compositor.render(&loaded, ms(t)).unwrap(),
            "mismatch at {t}ms"
        );
    }
}

#[test]
fn snapshot_with_overlapping_clips_is_rejected() {
    let project = build_project();
    let mut value: serde_json::Value =
        serde_json::from_slice(&ProjectFile::new(project).to_json().unwrap()).unwrap();
    // move the outro on top of the body
    value["project"]["tracks"][0]["clips"][2]["start"] = serde_json::json!([10, 1]);
    let data = serde_json::to_vec(&value).unwrap();
    assert!(ProjectFile::from_json(&data).is_err());
}

// ── Rendering through the timeline ─────────────────────────────

#[test]
fn overlay_keyframes_respect_easing() {
    let project = build_project();
    let logo = &project.track(1).unwrap().clips()[0];
    let early = logo.transform_at(ms(1250)).opacity;
    let mid = logo.transform_at(ms(1500)).opacity;
    assert!(early < 0.25);
    assert!((mid - 0.5).abs() < 1e-6);
}

#[test]
fn disabled_effect_is_skipped_in_render() {
    let mut project = Project::new("Disabled", 4, 4, FrameRate::FPS_24);
    let mut track = Track::new_video("V1");
    track
        .add_clip(clip("Body", 0, 1000).with_effect(EffectInstance::disabled(Effect::Stylize(Stylize::Invert))))
        .unwrap();
    project.add_track(track);

    let compositor = Compositor::new(StillSource::new().with("media/test", Frame::filled(4, 4, Color::RED)));
    let out = compositor.render(&project, ms(10)).unwrap().into_frame().unwrap();
    assert_eq!(out.pixel(0, 0), Color::RED);
}

proptest! {
    #[test]
    fn added_clips_stay_sorted_and_disjoint(starts in prop::collection::vec(0i64..100, 1..20)) {
        let mut track = Track::new_video("V1");
        for (i, s) in starts.iter().enumerate() {
            let _ = track.add_clip(clip(&format!("c{i}"), s * 100, 150));
        }
        prop_assert!(track.validate().is_ok());
        for pair in track.clips().windows(2) {
            prop_assert!(pair[0].end() <= pair[1].start);
        }
    }
}

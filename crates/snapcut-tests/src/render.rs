//! End-to-end render scenarios.
//!
//! Exercises snapcut-render over timelines built with snapcut-timeline and
//! effects from snapcut-effects and snapcut-color.

use snapcut_color::{grade_frame, ColorGradingAdjustments, ColorWheel, ColorWheels, HslAdjustment};
use snapcut_core::{Color, Frame, FrameRate, KeyframeTrack, RationalTime};
use snapcut_effects::{blend, ChromaKeySettings, Effect, EffectInstance, TransitionKind};
use snapcut_render::{Compositor, DecodeError, RenderOutput, StillSource};
use snapcut_timeline::{
    property, Clip, ClipRef, ClipTransform, Project, Track, TransitionEdge, TransitionSpec,
};

use crate::init_tracing;

// ── Helpers ────────────────────────────────────────────────────

const W: u32 = 16;
const H: u32 = 8;

fn ms(v: i64) -> RationalTime {
    RationalTime::from_millis(v)
}

fn clip(media: &str, start_ms: i64, dur_ms: i64) -> Clip {
    Clip::new(media, ClipRef::new(media, ms(dur_ms))).at(ms(start_ms))
}

fn project(tracks: Vec<Track>) -> Project {
    let mut project = Project::new("Render Test", W, H, FrameRate::FPS_25);
    for track in tracks {
        project.add_track(track);
    }
    project
}

fn track(name: &str, clips: Vec<Clip>) -> Track {
    let mut track = Track::new_video(name);
    for c in clips {
        track.add_clip(c).unwrap();
    }
    track
}

fn source() -> StillSource {
    StillSource::new()
        .with("bars", Frame::test_pattern(W, H))
        .with("red", Frame::filled(W, H, Color::RED))
        .with("blue", Frame::filled(W, H, Color::BLUE))
        .with("white", Frame::filled(W, H, Color::WHITE))
}

fn render(compositor: &Compositor<StillSource>, project: &Project, t_ms: i64) -> Frame {
    match compositor.render(project, ms(t_ms)).unwrap() {
        RenderOutput::Frame(frame) => frame,
        RenderOutput::Empty => panic!("unexpected empty render"),
    }
}

fn warm_grade() -> ColorGradingAdjustments {
    ColorGradingAdjustments {
        wheels: ColorWheels {
            highlights: ColorWheel {
                gain: 1.2,
                ..ColorWheel::NEUTRAL
            },
            ..Default::default()
        },
        hsl: HslAdjustment {
            saturation: 1.2,
            ..Default::default()
        },
        ..Default::default()
    }
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn opacity_keyframes_fade_in_graded_clip() {
    init_tracing();
    let c = clip("bars", 0, 1000)
        .with_effect(EffectInstance::new(Effect::ColorGrade(warm_grade())))
        .with_keyframes(
            KeyframeTrack::new(property::OPACITY)
                .with_key(0.0, 0.0)
                .with_key(1.0, 1.0),
        );
    let project = project(vec![track("V1", vec![c])]);
    let compositor = Compositor::new(source());

    let start = render(&compositor, &project, 0);
    assert!(start.pixels().iter().all(|p| p.a == 0.0));

    let end = render(&compositor, &project, 1000);
    let expected = grade_frame(&Frame::test_pattern(W, H), &warm_grade()).unwrap();
    assert_eq!(end, expected);

    let mid = render(&compositor, &project, 500);
    assert!((mid.pixel(0, 0).a - 0.5).abs() < 1e-6);
}

#[test]
fn fade_midpoint_equals_half_blend() {
    init_tracing();
    let incoming = clip("blue", 1000, 1000).with_transition(TransitionSpec::new(
        TransitionKind::Fade,
        ms(100),
        TransitionEdge::Start,
    ));
    let project = project(vec![track("V1", vec![clip("bars", 0, 1000), incoming])]);
    let compositor = Compositor::new(source());

    let out = render(&compositor, &project, 950);
    let expected = blend(
        &Frame::test_pattern(W, H),
        &Frame::filled(W, H, Color::BLUE),
        TransitionKind::Fade,
        0.5,
    )
    .unwrap();
    assert_eq!(out, expected);

    // outside the region only one clip shows
    assert_eq!(render(&compositor, &project, 899), Frame::test_pattern(W, H));
    assert_eq!(render(&compositor, &project, 1000), Frame::filled(W, H, Color::BLUE));
}

#[test]
fn end_transition_on_outgoing_clip() {
    let outgoing = clip("red", 0, 1000).with_transition(TransitionSpec::new(
        TransitionKind::WipeRight,
        ms(200),
        TransitionEdge::End,
    ));
    let project = project(vec![track("V1", vec![outgoing, clip("blue", 1000, 1000)])]);
    let compositor = Compositor::new(source());

    let out = render(&compositor, &project, 1100);
    let expected = blend(
        &Frame::filled(W, H, Color::RED),
        &Frame::filled(W, H, Color::BLUE),
        TransitionKind::WipeRight,
        0.5,
    )
    .unwrap();
    assert_eq!(out, expected);
}

#[test]
fn decode_failure_is_isolated_to_its_clip() {
    init_tracing();
    let bottom = track("V1", vec![clip("red", 0, 1000)]);
    let top = track("V2", vec![clip("offline", 0, 1000)]).with_z_order(1);
    let project = project(vec![bottom, top]);
    let compositor = Compositor::new(source());

    let out = render(&compositor, &project, 500);
    assert!(out.pixels().iter().all(|p| *p == Color::RED));
}

#[test]
fn flaky_source_only_drops_failing_requests() {
    let source = |media: &str, t: i64| -> Result<Frame, DecodeError> {
        if t >= 500_000 {
            return Err(DecodeError::OutOfRange(t));
        }
        match media {
            "red" => Ok(Frame::filled(W, H, Color::RED)),
            other => Err(DecodeError::UnknownMedia(other.to_string())),
        }
    };
    let project = project(vec![track("V1", vec![clip("red", 0, 1000)])]);
    let compositor = Compositor::new(source);

    let early = compositor.render(&project, ms(100)).unwrap().into_frame().unwrap();
    assert_eq!(early.pixel(0, 0), Color::RED);
    let late = compositor.render(&project, ms(600)).unwrap().into_frame().unwrap();
    assert_eq!(late.pixel(0, 0), Color::TRANSPARENT);
}

#[test]
fn empty_project_renders_empty() {
    let compositor = Compositor::new(source());
    let mut project = project(vec![]);
    assert_eq!(compositor.render(&project, ms(0)).unwrap(), RenderOutput::Empty);
    project.add_track(Track::new_video("V1"));
    assert!(compositor.render(&project, ms(0)).unwrap().is_empty());
}

#[test]
fn higher_track_z_order_draws_on_top() {
    let red = track("V1", vec![clip("red", 0, 1000)]).with_z_order(5);
    let blue = track("V2", vec![clip("blue", 0, 1000)]).with_z_order(1);
    let project = project(vec![red, blue]);
    let compositor = Compositor::new(source());
    assert_eq!(render(&compositor, &project, 10).pixel(3, 3), Color::RED);
}

#[test]
fn audio_and_hidden_tracks_are_skipped() {
    let mut audio = Track::new_audio("A1");
    audio.add_clip(clip("red", 0, 1000)).unwrap();
    let mut hidden = track("V2", vec![clip("blue", 0, 1000)]).with_z_order(2);
    hidden.visible = false;
    let project = project(vec![track("V1", vec![clip("white", 0, 1000)]), audio, hidden]);
    let compositor = Compositor::new(source());
    assert_eq!(render(&compositor, &project, 10).pixel(0, 0), Color::WHITE);
}

#[test]
fn keyframed_scale_shrinks_layer() {
    let c = clip("red", 0, 1000).with_keyframes(
        KeyframeTrack::new(property::SCALE)
            .with_key(0.0, 1.0)
            .with_key(1.0, 0.5),
    );
    let project = project(vec![track("V1", vec![c])]);
    let compositor = Compositor::new(source());

    let full = render(&compositor, &project, 0);
    assert_eq!(full.pixel(0, 0), Color::RED);

    let half = render(&compositor, &project, 1000);
    assert_eq!(half.pixel(0, 0).a, 0.0);
    assert_eq!(half.pixel(W / 2, H / 2), Color::RED);
}

#[test]
fn light_wrap_tints_key_edges() {
    let mut plate = Frame::filled(W, H, Color::GREEN);
    for y in 2..6 {
        for x in 4..12 {
            plate.set_pixel(x, y, Color::RED);
        }
    }
    let source = source().with("plate", plate);
    let keyed = |wrap: f32| {
        clip("plate", 0, 1000).with_effect(EffectInstance::new(Effect::ChromaKey(ChromaKeySettings {
            light_wrap: wrap,
            ..ChromaKeySettings::green_screen()
        })))
    };

    let render_with = |wrap: f32| {
        let project = project(vec![
            track("BG", vec![clip("white", 0, 1000)]),
            track("FG", vec![keyed(wrap)]).with_z_order(1),
        ]);
        let compositor = Compositor::new(source.clone());
        render(&compositor, &project, 10)
    };

    let plain = render_with(0.0);
    let wrapped = render_with(0.8);
    // keyed-out area shows the background
    assert_eq!(plain.pixel(0, 0), Color::WHITE);
    assert_eq!(plain.pixel(4, 2).g, 0.0);
    assert!(wrapped.pixel(4, 2).g > 0.0);
    assert_eq!(wrapped.pixel(0, 0), Color::WHITE);
}

#[test]
fn clip_transform_z_order_and_opacity() {
    let faded = clip("blue", 0, 1000).with_transform(ClipTransform {
        opacity: 0.5,
        ..ClipTransform::IDENTITY
    });
    let project = project(vec![
        track("V1", vec![clip("red", 0, 1000)]),
        track("V2", vec![faded]).with_z_order(1),
    ]);
    let compositor = Compositor::new(source());
    let px = render(&compositor, &project, 10).pixel(0, 0);
    assert!((px.r - 0.5).abs() < 1e-6);
    assert!((px.b - 0.5).abs() < 1e-6);
    assert_eq!(px.a, 1.0);
}

#[test]
fn batch_render_matches_single_renders() {
    let project = project(vec![track(
        "V1",
        vec![clip("bars", 0, 1000).with_keyframes(
            KeyframeTrack::new(property::OPACITY)
                .with_key(0.0, 0.2)
                .with_key(1.0, 0.9),
        )],
    )]);
    let compositor = Compositor::new(source());
    let times: Vec<_> = (0..5).map(|i| ms(i * 250)).collect();
    let batch = compositor.render_batch(&project, &times);
    for (t, result) in times.iter().zip(batch) {
        assert_eq!(result.unwrap(), compositor.render(&project, *t).unwrap());
    }
}

#[test]
fn every_frame_reaches_the_sink() {
    let project = project(vec![track("V1", vec![clip("red", 0, 200), clip("blue", 200, 200)])]);
    let compositor = Compositor::new(source());
    let mut sink: Vec<Frame> = Vec::new();
    for index in 0..project.frame_count() {
        assert!(compositor
            .render_to_sink(&project, project.frame_time(index), &mut sink)
            .unwrap());
    }
    assert_eq!(sink.len(), 10);
    assert_eq!(sink[0].pixel(0, 0), Color::RED);
    assert_eq!(sink[9].pixel(0, 0), Color::BLUE);
}

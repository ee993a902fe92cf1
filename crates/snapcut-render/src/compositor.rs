//! CPU frame compositor.
//!
//! A render runs in three passes. Planning selects the clips active at `t`
//! on every visible track and prepares their effect chains, so a bad
//! parameter fails the call before any pixel work. Layer building turns
//! each clip into a canvas-sized layer (placement, effects, opacity) and
//! blends transition pairs, optionally one rayon task per track. The
//! composite pass paints the layers back to front with straight-alpha over.

use rayon::prelude::*;
use smallvec::SmallVec;
use snapcut_core::{Frame, FramePool, RationalTime, Result, SnapcutError, TimeRange};
use snapcut_effects::{blend, light_wrap, PreparedChain, TransitionKind};
use snapcut_timeline::{Clip, Project, TransitionEdge};
use tracing::{debug, warn};

use crate::config::CompositorConfig;
use crate::source::{FrameSink, FrameSource};
use crate::transform::place;

/// Result of rendering one instant.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    Frame(Frame),
    /// The project has no clips.
    Empty,
}

impl RenderOutput {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_frame(self) -> Option<Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            Self::Empty => None,
        }
    }
}

struct ClipPlan<'a> {
    clip: &'a Clip,
    chain: PreparedChain,
}

struct TrackPlan<'a> {
    /// Position in bottom-to-top track order.
    rank: usize,
    clips: SmallVec<[ClipPlan<'a>; 2]>,
}

struct Layer {
    rank: usize,
    z_order: i32,
    light_wrap: Option<f32>,
    frame: Frame,
}

/// Transition kind and blend region shared by two neighbouring clips.
fn transition_between(outgoing: &Clip, incoming: &Clip) -> Option<(TransitionKind, TimeRange)> {
    let spec = incoming
        .transition(TransitionEdge::Start)
        .or_else(|| outgoing.transition(TransitionEdge::End))?;
    let region = outgoing
        .active_window()
        .intersection(incoming.active_window())?;
    Some((spec.kind, region))
}

fn progress(region: TimeRange, t: RationalTime) -> f32 {
    ((t - region.start) / region.duration) as f32
}

/// Transition at `edge` of a clip with no neighbour to blend with: the
/// lead-in before it starts or the tail after it ends.
fn lone_edge(clip: &Clip, edge: TransitionEdge, t: RationalTime) -> Option<(TransitionKind, f32)> {
    let spec = clip.transition(edge)?;
    let region = match edge {
        TransitionEdge::Start => TimeRange::new(clip.start - spec.duration, spec.duration),
        TransitionEdge::End => TimeRange::new(clip.end(), spec.duration),
    };
    region.contains(t).then(|| (spec.kind, progress(region, t)))
}

fn composite_over(dst: &mut Frame, layer: &Frame) {
    dst.pixels_mut()
        .par_iter_mut()
        .zip(layer.pixels().par_iter())
        .for_each(|(d, s)| *d = s.over(*d));
}

/// Renders project frames from a [`FrameSource`].
pub struct Compositor<S> {
    source: S,
    config: CompositorConfig,
    pool: FramePool,
}

impl<S: FrameSource> Compositor<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, CompositorConfig::default())
    }

    pub fn with_config(source: S, config: CompositorConfig) -> Self {
        let pool = FramePool::new(config.pool_budget);
        Self {
            source,
            config,
            pool,
        }
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn pool(&self) -> &FramePool {
        &self.pool
    }

    /// Hand an output frame back for reuse by later renders.
    pub fn recycle(&self, frame: Frame) {
        self.pool.release(frame);
    }

    /// Render the project at timeline time `t`, clamped to `[0, duration]`.
    pub fn render(&self, project: &Project, t: RationalTime) -> Result<RenderOutput> {
        if project.width == 0 || project.height == 0 {
            return Err(SnapcutError::Configuration(format!(
                "invalid output resolution {}x{}",
                project.width, project.height
            )));
        }
        if project.is_empty() {
            debug!(project = %project.name, "Empty project, nothing to render");
            return Ok(RenderOutput::Empty);
        }

        let duration = project.duration();
        let t = t.clamp(RationalTime::ZERO, duration);
        let at_end = self.config.include_timeline_end && t == duration;

        let plans = self.plan(project, t, at_end)?;
        let layers: Vec<Vec<Layer>> = if self.config.parallel_tracks {
            plans
                .par_iter()
                .map(|plan| self.track_layers(project, plan, t))
                .collect::<Result<_>>()?
        } else {
            plans
                .iter()
                .map(|plan| self.track_layers(project, plan, t))
                .collect::<Result<_>>()?
        };
        let mut layers: Vec<Layer> = layers.into_iter().flatten().collect();
        layers.sort_by_key(|l| (l.rank, l.z_order));

        let mut output =
            self.pool
                .acquire_filled(project.width, project.height, self.config.background)?;
        for layer in &layers {
            match layer.light_wrap {
                Some(amount) => {
                    let wrapped = light_wrap(&layer.frame, &output, amount)?;
                    composite_over(&mut output, &wrapped);
                }
                None => composite_over(&mut output, &layer.frame),
            }
        }
        debug!(time = %t, layers = layers.len(), "Rendered frame");
        Ok(RenderOutput::Frame(output))
    }

    /// Render independent instants in parallel.
    pub fn render_batch(&self, project: &Project, times: &[RationalTime]) -> Vec<Result<RenderOutput>> {
        times.par_iter().map(|&t| self.render(project, t)).collect()
    }

    /// Render `t` and hand the frame to `sink`. Returns `false` for an
    /// empty project.
    pub fn render_to_sink<K: FrameSink + ?Sized>(
        &self,
        project: &Project,
        t: RationalTime,
        sink: &mut K,
    ) -> Result<bool> {
        match self.render(project, t)? {
            RenderOutput::Frame(frame) => {
                sink.accept(frame)?;
                Ok(true)
            }
            RenderOutput::Empty => Ok(false),
        }
    }

    fn plan<'a>(&self, project: &'a Project, t: RationalTime, at_end: bool) -> Result<Vec<TrackPlan<'a>>> {
        let mut plans = Vec::new();
        let frame_seed = t.to_micros().unsigned_abs();
        for (rank, index) in project.render_order().into_iter().enumerate() {
            let track = &project.tracks[index];
            let clips = track
                .active_clips(t, at_end)
                .into_iter()
                .map(|clip| {
                    let chain = PreparedChain::new(&clip.effects)
                        .map_err(|e| {
                            SnapcutError::Configuration(format!("clip '{}': {e}", clip.name))
                        })?
                        .with_seed(frame_seed);
                    Ok(ClipPlan { clip, chain })
                })
                .collect::<Result<SmallVec<_>>>()?;
            if !clips.is_empty() {
                plans.push(TrackPlan { rank, clips });
            }
        }
        Ok(plans)
    }

    /// One layer per run of clips joined by a transition at `t`. A run of
    /// three or more clips folds its transitions left to right.
    fn track_layers(&self, project: &Project, plan: &TrackPlan<'_>, t: RationalTime) -> Result<Vec<Layer>> {
        let clips = plan.clips.as_slice();
        let mut layers = Vec::with_capacity(clips.len());
        let mut first = 0;
        while first < clips.len() {
            let mut last = first;
            while last + 1 < clips.len()
                && transition_between(clips[last].clip, clips[last + 1].clip)
                    .is_some_and(|(_, region)| region.contains(t))
            {
                last += 1;
            }
            if let Some(layer) = self.run_layer(project, plan.rank, &clips[first..=last], t)? {
                layers.push(layer);
            }
            first = last + 1;
        }
        Ok(layers)
    }

    fn run_layer(
        &self,
        project: &Project,
        rank: usize,
        run: &[ClipPlan<'_>],
        t: RationalTime,
    ) -> Result<Option<Layer>> {
        let (Some(head), Some(tail)) = (run.first(), run.last()) else {
            return Ok(None);
        };

        let mut frame = self.clip_layer(project, head, t);
        if let Some((kind, p)) = lone_edge(head.clip, TransitionEdge::Start, t) {
            frame = frame
                .map(|layer| self.blend_with_clear(&layer, kind, p, TransitionEdge::Start))
                .transpose()?;
        }

        for pair in run.windows(2) {
            let Some((kind, region)) = transition_between(pair[0].clip, pair[1].clip) else {
                continue;
            };
            frame = match (frame, self.clip_layer(project, &pair[1], t)) {
                (Some(from), Some(to)) => Some(blend(&from, &to, kind, progress(region, t))?),
                (Some(only), None) | (None, Some(only)) => Some(only),
                (None, None) => None,
            };
        }

        if let Some((kind, p)) = lone_edge(tail.clip, TransitionEdge::End, t) {
            frame = frame
                .map(|layer| self.blend_with_clear(&layer, kind, p, TransitionEdge::End))
                .transpose()?;
        }

        Ok(frame.map(|frame| Layer {
            rank,
            z_order: run.iter().map(|cp| cp.clip.transform.z_order).max().unwrap_or_default(),
            light_wrap: run
                .iter()
                .filter_map(|cp| cp.chain.light_wrap())
                .reduce(f32::max),
            frame,
        }))
    }

    /// Transition a lone clip in from, or out to, transparency.
    fn blend_with_clear(
        &self,
        layer: &Frame,
        kind: TransitionKind,
        progress: f32,
        edge: TransitionEdge,
    ) -> Result<Frame> {
        let clear = self.pool.acquire(layer.width(), layer.height())?;
        let blended = match edge {
            TransitionEdge::Start => blend(&clear, layer, kind, progress),
            TransitionEdge::End => blend(layer, &clear, kind, progress),
        };
        self.pool.release(clear);
        blended
    }

    /// Decode, place, run the effect chain and apply opacity. `None` when
    /// the source cannot supply the frame.
    fn clip_layer(&self, project: &Project, plan: &ClipPlan<'_>, t: RationalTime) -> Option<Frame> {
        let clip = plan.clip;
        let time_us = clip.local_media_time(t);
        let decoded = match self.source.get_frame(&clip.source.media_id, time_us) {
            Ok(frame) => frame,
            Err(e) => {
                let error = e.at(&clip.source.media_id, time_us);
                warn!(clip = %clip.id, name = %clip.name, error = %error, "Decode failed, skipping clip");
                return None;
            }
        };

        let transform = clip.transform_at(t);
        let placed = place(decoded, &transform, project.width, project.height);
        let layer = if plan.chain.is_empty() {
            placed
        } else {
            plan.chain.apply(&placed)
        };
        if transform.opacity < 1.0 {
            let opacity = transform.opacity;
            Some(layer.map_pixels(|p| p.with_alpha(p.a * opacity)))
        } else {
            Some(layer)
        }
    }
}

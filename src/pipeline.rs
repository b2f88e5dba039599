use std::path::Path;

use anyhow::Context as _;

use crate::encode::{EncodeJob, Encoder};
use crate::error::{SimanimError, SimanimResult};
use crate::levels::ValueRange;
use crate::render::render;
use crate::snapshot::Snapshot;
use crate::timeline::{TimeSeries, TimeWindow};

/// Pipeline phases that report progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// First pass: loading snapshots to compute the global value range.
    Scan,
    /// Second pass: rendering and writing stills.
    Render,
}

/// Progress-event seam so the core pipeline has no direct output-stream
/// dependency. Events arrive with `done < total`, at most once per frame.
pub trait ProgressSink {
    fn on_progress(&mut self, phase: Phase, done: usize, total: usize);
}

/// Sink that ignores all progress events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_progress(&mut self, _phase: Phase, _done: usize, _total: usize) {}
}

/// What to render: output framerate, the time window to cover and the
/// animation length in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationOpts {
    pub framerate: f64,
    pub window: TimeWindow,
    pub length_secs: f64,
}

impl Default for AnimationOpts {
    fn default() -> Self {
        Self {
            framerate: 24.0,
            window: TimeWindow::default(),
            length_secs: 10.0,
        }
    }
}

/// Upper bound on `length_secs * framerate`. Anything larger is a request
/// nobody can store, and it keeps the frame count safely inside `usize`.
const MAX_FRAMES: f64 = 1e9;

impl AnimationOpts {
    pub fn validate(&self) -> SimanimResult<()> {
        if !self.framerate.is_finite() || self.framerate <= 0.0 {
            return Err(SimanimError::validation(
                "framerate must be a positive number",
            ));
        }
        if !self.length_secs.is_finite() || self.length_secs <= 0.0 {
            return Err(SimanimError::validation(
                "animation length must be a positive number of seconds",
            ));
        }
        if self.length_secs * self.framerate > MAX_FRAMES {
            return Err(SimanimError::validation(format!(
                "length * framerate must not exceed {MAX_FRAMES} frames"
            )));
        }
        Ok(())
    }

    /// Number of output frames: one per framerate tick plus the final frame
    /// landing on the window end. Saturates rather than overflowing for
    /// counts beyond what `validate` accepts.
    pub fn image_count(&self) -> usize {
        ((self.length_secs * self.framerate) as usize).saturating_add(1)
    }
}

/// Decimal digit width of `image_count`, used to zero-pad frame filenames
/// so lexical and numeric order coincide.
pub fn digit_count(image_count: usize) -> usize {
    image_count.to_string().len()
}

/// Convert the snapshot series in `input_dir` into a video.
///
/// Expects `input_dir/time.txt` plus one `frame<N>.txt` per timestamp.
/// Stills are written to `input_dir/anim/tmp/` and the encoder is invoked
/// once for `input_dir/anim/anim.mp4`. Two passes over the selected
/// snapshots keep at most one matrix in memory at a time: the first folds
/// every element into the shared [`ValueRange`], the second renders through
/// it. Any load or format failure aborts the run; there is no partial
/// output mode.
#[tracing::instrument(skip(opts, encoder, progress))]
pub fn create_animation(
    input_dir: &Path,
    opts: &AnimationOpts,
    encoder: &dyn Encoder,
    progress: &mut dyn ProgressSink,
) -> SimanimResult<()> {
    opts.validate()?;

    let times = TimeSeries::load(&input_dir.join("time.txt"))?;
    let image_count = opts.image_count();
    let plan = times.select(opts.window, image_count)?;
    let digits = digit_count(image_count);

    let anim_dir = input_dir.join("anim");
    let tmp_dir = anim_dir.join("tmp");
    std::fs::create_dir_all(&tmp_dir)
        .with_context(|| format!("create frame directory '{}'", tmp_dir.display()))?;

    tracing::debug!(image_count, digits, timestamps = times.len(), "selection complete");

    let stride = image_count / 100 + 1;

    let mut range = ValueRange::new();
    let mut input_paths = Vec::with_capacity(image_count);
    for (i, &index) in plan.indices().iter().enumerate() {
        if i % stride == 0 {
            progress.on_progress(Phase::Scan, i, image_count);
        }
        let path = input_dir.join(format!("frame{index}.txt"));
        let snap = Snapshot::load(&path)?;
        range.observe(&snap);
        input_paths.push(path);
    }

    tracing::debug!(min = range.min, max = range.max, "global range computed");

    let mut dims: Option<(usize, usize)> = None;
    for (i, path) in input_paths.iter().enumerate() {
        if i % stride == 0 {
            progress.on_progress(Phase::Render, i, image_count);
        }
        let snap = Snapshot::load(path)?;
        match dims {
            None => dims = Some((snap.rows(), snap.cols())),
            Some((r, c)) if (r, c) != (snap.rows(), snap.cols()) => {
                return Err(SimanimError::data(format!(
                    "snapshot '{}' is {}x{}, expected {r}x{c}",
                    path.display(),
                    snap.rows(),
                    snap.cols()
                )));
            }
            Some(_) => {}
        }
        let raster = render(&snap, &range);
        raster.write_png(&tmp_dir.join(format!("{i:0digits$}.png")))?;
    }

    encoder.encode(&EncodeJob {
        frame_dir: tmp_dir,
        digit_count: digits,
        framerate: opts.framerate,
        out_path: anim_dir.join("anim.mp4"),
    })
}

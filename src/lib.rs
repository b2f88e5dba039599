#![forbid(unsafe_code)]

pub mod encode;
pub mod error;
pub mod levels;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod timeline;

pub use encode::{EncodeJob, Encoder, FfmpegEncoder};
pub use error::{SimanimError, SimanimResult};
pub use levels::ValueRange;
pub use pipeline::{AnimationOpts, NullProgress, Phase, ProgressSink, create_animation};
pub use render::{Raster, render};
pub use snapshot::Snapshot;
pub use timeline::{SelectionPlan, TimeSeries, TimeWindow};

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{SimanimError, SimanimResult};

/// Everything an encoder needs to assemble the written frame sequence into
/// a video: where the stills live, how their names are padded, the target
/// framerate and the output path.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeJob {
    pub frame_dir: PathBuf,
    /// Zero-padding width of the frame filenames.
    pub digit_count: usize,
    pub framerate: f64,
    pub out_path: PathBuf,
}

impl EncodeJob {
    pub fn validate(&self) -> SimanimResult<()> {
        if !self.framerate.is_finite() || self.framerate <= 0.0 {
            return Err(SimanimError::validation(
                "encode framerate must be a positive number",
            ));
        }
        if self.digit_count == 0 {
            return Err(SimanimError::validation("encode digit_count must be >= 1"));
        }
        Ok(())
    }

    /// ffmpeg-style input pattern matching the written frame names.
    pub fn frame_pattern(&self) -> String {
        format!(
            "{}/%0{}d.png",
            self.frame_dir.display(),
            self.digit_count
        )
    }
}

/// Capability seam for video assembly, so the pipeline stays testable
/// without an encoder installed.
pub trait Encoder {
    fn encode(&self, job: &EncodeJob) -> SimanimResult<()>;
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Encoder that invokes the system `ffmpeg` binary once over the whole
/// frame sequence (h264, constant quality).
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegEncoder;

impl Encoder for FfmpegEncoder {
    fn encode(&self, job: &EncodeJob) -> SimanimResult<()> {
        job.validate()?;

        if !is_ffmpeg_on_path() {
            return Err(SimanimError::encoding(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let output = Command::new("ffmpeg")
            .args([
                "-y",
                "-loglevel",
                "error",
                "-r",
                &job.framerate.to_string(),
                "-i",
                &job.frame_pattern(),
                "-c:v",
                "libx264",
                "-crf",
                "10",
                "-c:a",
                "aac",
                "-strict",
                "-2",
            ])
            .arg(&job.out_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .output()
            .map_err(|e| {
                SimanimError::encoding(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SimanimError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

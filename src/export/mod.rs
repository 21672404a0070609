//! Frame capture and video export.
//!
//! Frames are written to a scratch directory during a run and only turned
//! into a video on an explicit export request.

mod encoder;
mod sequencer;

pub use encoder::{FfmpegEncoder, Frame, VideoEncoder};
pub use sequencer::FrameSequencer;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export is disabled in the configuration")]
    Disabled,
    #[error("No frames have been captured")]
    NoFrames,
    #[error("Cannot export while the simulation is running")]
    SimulationRunning,
    #[error("Video encoder `{0}` was not found")]
    EncoderNotFound(PathBuf),
    #[error("Video encoder failed: {0}")]
    Encoder(String),
    #[error("Frame {generation} is {found:?}, expected {expected:?}")]
    FrameSize {
        generation: u64,
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("Failed to process frame image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Frame storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

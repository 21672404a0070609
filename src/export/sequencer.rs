use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::{ExportError, Frame, VideoEncoder};

/// Owns the generation-indexed frames of the current run.
///
/// Each frame lives on disk as `<generation>.png` inside `dir`; the in-memory
/// index keeps them ordered. When disabled, capture is a no-op and the
/// directory is never touched.
pub struct FrameSequencer {
    dir: PathBuf,
    enabled: bool,
    frames: BTreeMap<u64, PathBuf>,
}

impl FrameSequencer {
    /// Create a sequencer over `dir`. When enabled the directory is created
    /// and emptied of leftovers from earlier sessions.
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Result<Self, ExportError> {
        let mut sequencer = Self {
            dir: dir.into(),
            enabled,
            frames: BTreeMap::new(),
        };
        if enabled {
            fs::create_dir_all(&sequencer.dir)?;
            sequencer.reset()?;
        }
        Ok(sequencer)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Captured generation indices in ascending order
    pub fn generations(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.keys().copied()
    }

    /// Discard every held frame and every `<generation>.png` file in the
    /// working directory. Other files in the directory are left alone.
    pub fn reset(&mut self) -> Result<(), ExportError> {
        self.frames.clear();
        if !self.enabled || !self.dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && is_frame_file(&path) {
                fs::remove_file(&path)?;
            }
        }
        log::debug!("Cleared frame directory {:?}", self.dir);
        Ok(())
    }

    /// Store `image` as the frame for `generation`, replacing any earlier one.
    pub fn capture(&mut self, generation: u64, image: &RgbaImage) -> Result<(), ExportError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.dir.join(format!("{}.png", generation));
        image.save(&path)?;
        log::trace!("Captured frame {} to {:?}", generation, path);
        self.frames.insert(generation, path);
        Ok(())
    }

    /// Hand the held frames to `encoder` in increasing generation order.
    /// Frames stay in place so the same sequence can be exported again.
    pub fn flush(
        &self,
        encoder: &mut dyn VideoEncoder,
        filename: &str,
        fps: u32,
    ) -> Result<PathBuf, ExportError> {
        if !self.enabled {
            return Err(ExportError::Disabled);
        }
        if self.frames.is_empty() {
            return Err(ExportError::NoFrames);
        }

        log::info!("Exporting {} frames at {} fps", self.frames.len(), fps);
        let mut frames = self.frames.iter().map(|(&generation, path)| -> Result<Frame, ExportError> {
            let image = image::open(path)?.to_rgba8();
            Ok(Frame { generation, image })
        });
        encoder.encode(filename, fps, &mut frames)
    }
}

/// Matches the `<generation>.png` names written by `capture`
fn is_frame_file(path: &Path) -> bool {
    let is_png = path.extension().is_some_and(|ext| ext == "png");
    let numbered = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.parse::<u64>().is_ok());
    is_png && numbered
}

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::RgbaImage;

use super::ExportError;

/// One captured snapshot handed to an encoder
pub struct Frame {
    pub generation: u64,
    pub image: RgbaImage,
}

/// Sink that turns an ordered frame sequence into a video file
pub trait VideoEncoder {
    /// Encode `frames` (already in playback order) at `fps` and return the
    /// path of the produced video.
    fn encode(
        &mut self,
        filename: &str,
        fps: u32,
        frames: &mut dyn Iterator<Item = Result<Frame, ExportError>>,
    ) -> Result<PathBuf, ExportError>;
}

/// Pipes raw RGBA frames into an `ffmpeg` child process and writes
/// `<filename>.mp4`.
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific ffmpeg binary
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    fn command(&self, width: u32, height: u32, fps: u32, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-hide_banner")
            .arg("-loglevel").arg("error")
            .arg("-y")
            .arg("-f").arg("rawvideo")
            .arg("-pix_fmt").arg("rgba")
            .arg("-s").arg(format!("{}x{}", width, height))
            .arg("-r").arg(fps.to_string())
            .arg("-i").arg("-")
            // yuv420p needs even dimensions
            .arg("-vf").arg("pad=ceil(iw/2)*2:ceil(ih/2)*2")
            .arg("-c:v").arg("libx264")
            .arg("-pix_fmt").arg("yuv420p")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn encode(
        &mut self,
        filename: &str,
        fps: u32,
        frames: &mut dyn Iterator<Item = Result<Frame, ExportError>>,
    ) -> Result<PathBuf, ExportError> {
        let first = frames.next().ok_or(ExportError::NoFrames)??;
        let expected = first.image.dimensions();
        let output = PathBuf::from(format!("{}.mp4", filename));

        let mut child = self
            .command(expected.0, expected.1, fps, &output)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ExportError::EncoderNotFound(self.program.clone()),
                _ => ExportError::Io(e),
            })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::Encoder("stdin of encoder process unavailable".into()))?;

        let mut write_all = || -> Result<usize, ExportError> {
            stdin.write_all(first.image.as_raw())?;
            let mut written = 1;
            for frame in &mut *frames {
                let frame = frame?;
                let found = frame.image.dimensions();
                if found != expected {
                    return Err(ExportError::FrameSize {
                        generation: frame.generation,
                        expected,
                        found,
                    });
                }
                stdin.write_all(frame.image.as_raw())?;
                written += 1;
            }
            Ok(written)
        };
        let written = write_all();
        // Closing stdin signals end of stream
        drop(stdin);

        // An encoder that quit early also broke the pipe; its exit status wins
        let result = child.wait_with_output()?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            remove_partial(&output);
            return Err(ExportError::Encoder(format!("{} ({})", stderr, result.status)));
        }
        let written = match written {
            Ok(written) => written,
            Err(e) => {
                remove_partial(&output);
                return Err(e);
            }
        };

        log::info!("Encoded {} frames into {:?}", written, output);
        Ok(output)
    }
}

fn remove_partial(output: &Path) {
    match std::fs::remove_file(output) {
        Ok(()) => log::debug!("Removed partial video {:?}", output),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove partial video {:?}: {}", output, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::scratch_dir;

    fn blank(generation: u64, side: u32) -> Result<Frame, ExportError> {
        Ok(Frame { generation, image: RgbaImage::new(side, side) })
    }

    /// Write an executable shell script standing in for ffmpeg
    #[cfg(unix)]
    fn fake_encoder(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        std::fs::create_dir_all(dir).unwrap();
        let script = dir.join("fake-ffmpeg");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_encoder_reports_its_stderr() {
        let dir = scratch_dir("encoder_exit");
        let script = fake_encoder(&dir, "echo \"Unknown encoder 'libx264'\" >&2\nexit 1");
        let mut encoder = FfmpegEncoder::with_program(script);
        // Large enough to overflow the pipe once the process has exited
        let mut frames = (0..5).map(|g| blank(g, 400));

        let output = dir.join("clip");
        let result = encoder.encode(output.to_str().unwrap(), 10, &mut frames);
        match result {
            Err(ExportError::Encoder(message)) => assert!(message.contains("Unknown encoder 'libx264'")),
            other => panic!("expected encoder failure, got {:?}", other),
        }
        assert!(!dir.join("clip.mp4").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_frame_error_removes_partial_video() {
        let dir = scratch_dir("encoder_partial");
        // Copies stdin to the output path given as the last argument
        let script = fake_encoder(&dir, "for last; do :; done\ncat > \"$last\"");
        let mut encoder = FfmpegEncoder::with_program(script);
        let mut frames = vec![blank(0, 4), blank(1, 4), blank(2, 6)].into_iter();

        let output = dir.join("clip");
        let result = encoder.encode(output.to_str().unwrap(), 10, &mut frames);
        assert!(matches!(
            result,
            Err(ExportError::FrameSize { generation: 2, expected: (4, 4), found: (6, 6) })
        ));
        assert!(!dir.join("clip.mp4").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_encode_returns_output_path() {
        let dir = scratch_dir("encoder_ok");
        let script = fake_encoder(&dir, "for last; do :; done\ncat > \"$last\"");
        let mut encoder = FfmpegEncoder::with_program(script);
        let mut frames = (0..3).map(|g| blank(g, 4));

        let output = dir.join("clip");
        let path = encoder.encode(output.to_str().unwrap(), 10, &mut frames).unwrap();
        assert_eq!(path, dir.join("clip.mp4"));
        // Three 4x4 RGBA frames went through the pipe
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 3 * 4 * 4 * 4);
    }

    #[test]
    fn test_missing_binary_is_reported() {
        let mut encoder = FfmpegEncoder::with_program("life-recorder-no-such-encoder");
        let mut frames = std::iter::once(Ok::<_, ExportError>(Frame {
            generation: 0,
            image: RgbaImage::new(2, 2),
        }));

        let result = encoder.encode("never_written", 10, &mut frames);
        assert!(matches!(result, Err(ExportError::EncoderNotFound(_))));
    }

    #[test]
    fn test_empty_sequence_is_rejected_before_spawning() {
        let mut encoder = FfmpegEncoder::with_program("life-recorder-no-such-encoder");
        let mut frames = std::iter::empty::<Result<Frame, ExportError>>();

        let result = encoder.encode("never_written", 10, &mut frames);
        assert!(matches!(result, Err(ExportError::NoFrames)));
    }

    #[test]
    fn test_command_line() {
        let encoder = FfmpegEncoder::new();
        let command = encoder.command(500, 300, 12, Path::new("clip.mp4"));
        let args: Vec<_> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(command.get_program(), "ffmpeg");
        assert!(args.windows(2).any(|w| w == ["-s", "500x300"]));
        assert!(args.windows(2).any(|w| w == ["-r", "12"]));
        assert_eq!(args.last().map(String::as_str), Some("clip.mp4"));
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{bail, Context};

/// Whether an `ffmpeg` binary answers `-version` on this machine.
pub fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Arguments for encoding raw RGBA frames from stdin into an H.264 MP4.
pub fn ffmpeg_args(width: u32, height: u32, fps: u32, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = [
        "-y",
        "-f",
        "rawvideo",
        "-pixel_format",
        "rgba",
        "-video_size",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(format!("{width}x{height}"));
    args.push("-framerate".into());
    args.push(fps.to_string());
    args.extend(
        [
            "-i", "pipe:0", "-c:v", "libx264", "-preset", "veryfast", "-crf", "18", "-pix_fmt",
            "yuv420p",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Streams frames into a child `ffmpeg` process.
pub struct FfmpegEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    frame_len: usize,
    frames_written: u64,
    output: PathBuf,
}

impl FfmpegEncoder {
    pub fn spawn(
        output: impl Into<PathBuf>,
        width: u32,
        height: u32,
        fps: u32,
    ) -> anyhow::Result<Self> {
        let output = output.into();
        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(width, height, fps, &output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start ffmpeg")?;
        let stdin = child.stdin.take().context("ffmpeg stdin is not piped")?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            frame_len: width as usize * height as usize * 4,
            frames_written: 0,
            output,
        })
    }

    /// Writes one frame of RGBA bytes, top row first.
    pub fn write_frame(&mut self, rgba: &[u8]) -> anyhow::Result<()> {
        if rgba.len() != self.frame_len {
            bail!(
                "frame has {} bytes, encoder expects {}",
                rgba.len(),
                self.frame_len
            );
        }
        let stdin = self.stdin.as_mut().context("encoder already finished")?;
        stdin
            .write_all(rgba)
            .with_context(|| format!("failed to write frame {}", self.frames_written))?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Closes the pipe and waits for ffmpeg, returning the number of frames encoded.
    pub fn finish(mut self) -> anyhow::Result<u64> {
        drop(self.stdin.take());
        let status = self.child.wait().context("failed to wait for ffmpeg")?;
        if !status.success() {
            bail!("ffmpeg exited with {status}");
        }
        tracing::info!(
            "Encoded {} frames to {}.",
            self.frames_written,
            self.output.display()
        );
        Ok(self.frames_written)
    }
}

use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, FrameStamp, SinkConfig, check_frame};
use crate::foundation::core::{Fps, FrameIndex, PixelBuffer};
use crate::foundation::error::{GlitchError, GlitchResult};
use crate::foundation::math::mul_div255_u16;

/// Output container and codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VideoCodec {
    /// VP9 in WebM.
    #[default]
    Vp9Webm,
    /// H.264 in MP4.
    H264Mp4,
}

impl VideoCodec {
    pub fn extension(self) -> &'static str {
        match self {
            VideoCodec::Vp9Webm => "webm",
            VideoCodec::H264Mp4 => "mp4",
        }
    }

    /// Codec implied by a file extension, if recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "webm" => Some(VideoCodec::Vp9Webm),
            "mp4" => Some(VideoCodec::H264Mp4),
            _ => None,
        }
    }

    fn output_args(self) -> &'static [&'static str] {
        match self {
            VideoCodec::Vp9Webm => &[
                "-c:v",
                "libvpx-vp9",
                "-pix_fmt",
                "yuv420p",
                "-b:v",
                "2500k",
                "-deadline",
                "good",
            ],
            VideoCodec::H264Mp4 => &[
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ],
        }
    }
}

#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Overwrite `out_path` if it already exists.
    pub overwrite: bool,
    pub codec: VideoCodec,
    /// Background used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// `ffmpeg` executable; a bare name is looked up on `PATH`.
    pub ffmpeg: PathBuf,
}

impl FfmpegSinkOpts {
    /// Options for `out_path`, picking the codec from its extension (VP9/WebM otherwise).
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        let out_path = out_path.into();
        let codec = VideoCodec::from_path(&out_path).unwrap_or_default();
        Self {
            out_path,
            overwrite: true,
            codec,
            bg_rgba: [0, 0, 0, 255],
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

/// Spawns `ffmpeg` and streams raw RGBA frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    // Set while a spawned ffmpeg may have left an unfinished file at `out_path`.
    output_pending: bool,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            output_pending: false,
        }
    }

    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }

    fn finish(&mut self) -> GlitchResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| GlitchError::encoding("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| GlitchError::encoding(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| GlitchError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| GlitchError::encoding(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(GlitchError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        let written = std::fs::metadata(&self.opts.out_path).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(GlitchError::encoding(format!(
                "ffmpeg produced no output at '{}'",
                self.opts.out_path.display()
            )));
        }
        Ok(())
    }

    /// Remove whatever a failed or abandoned encode left at `out_path`.
    fn discard_output(&mut self) {
        if !std::mem::take(&mut self.output_pending) {
            return;
        }
        match std::fs::remove_file(&self.opts.out_path) {
            Ok(()) => tracing::debug!(
                out = %self.opts.out_path.display(),
                "removed incomplete video"
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                out = %self.opts.out_path.display(),
                error = %e,
                "failed to remove incomplete video"
            ),
        }
    }
}

impl FrameSink for FfmpegSink {
    #[tracing::instrument(skip(self), fields(out = %self.opts.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> GlitchResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GlitchError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(GlitchError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_available(&self.opts.ffmpeg) {
            return Err(GlitchError::unsupported_capture(format!(
                "video export needs ffmpeg, but '{}' could not be run",
                self.opts.ffmpeg.display()
            )));
        }
        ensure_parent_dir(&self.opts.out_path)?;

        let mut cmd = Command::new(&self.opts.ffmpeg);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an"]);
        // yuv420p needs even dimensions.
        cmd.args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"]);
        cmd.args(self.opts.codec.output_args());
        cmd.arg(&self.opts.out_path);

        let mut child = cmd
            .spawn()
            .map_err(|e| GlitchError::unsupported_capture(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GlitchError::encoding("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| GlitchError::encoding("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.output_pending = true;
        Ok(())
    }

    fn push_frame(&mut self, stamp: FrameStamp, frame: &PixelBuffer) -> GlitchResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| GlitchError::encoding("ffmpeg sink not started"))?;
        check_frame(cfg, self.last_idx, stamp, frame)?;
        self.last_idx = Some(stamp.index);

        flatten_over_bg(&mut self.scratch, frame.as_bytes(), self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(GlitchError::encoding("ffmpeg sink is already finalized"));
        };
        stdin
            .write_all(&self.scratch)
            .map_err(|e| GlitchError::encoding(format!("failed to write frame to ffmpeg: {e}")))
    }

    #[tracing::instrument(skip(self), fields(out = %self.opts.out_path.display()))]
    fn end(&mut self) -> GlitchResult<()> {
        match self.finish() {
            Ok(()) => {
                self.output_pending = false;
                Ok(())
            }
            Err(err) => {
                self.discard_output();
                Err(err)
            }
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.discard_output();
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // `-r` before `-i` sets the rawvideo input rate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Composite straight-alpha RGBA8 over `bg_rgba` into opaque RGBA8.
fn flatten_over_bg(dst: &mut [u8], src: &[u8], bg_rgba: [u8; 4]) -> GlitchResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GlitchError::validation(
            "flatten_over_bg expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let v = mul_div255_u16(u16::from(s[c]), a) + mul_div255_u16(u16::from(bg_rgba[c]), inv);
            d[c] = v.min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> GlitchResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_available(ffmpeg: &Path) -> bool {
    Command::new(ffmpeg)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_ffmpeg_available(Path::new("ffmpeg"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;

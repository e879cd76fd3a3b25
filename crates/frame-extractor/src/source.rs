//! Frame-indexed video access.
//!
//! Decoding the world video is left to external tooling (e.g. `ffmpeg -i
//! world.mp4 world_frames/%06d.png`). The extractor only needs random access
//! by frame index, which [`FrameSource`] captures.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use ballgaze_common::error::{GazeError, GazeResult};

/// File extensions recognized as decoded frames.
const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Random access to decoded video frames.
///
/// Reads seek the underlying resource, so a source must not be shared
/// between parallel readers; give each worker its own source.
pub trait FrameSource {
    /// Number of frames available.
    fn frame_count(&self) -> u64;

    /// Seek to `index` and decode that frame.
    fn read_frame(&mut self, index: u64) -> GazeResult<DynamicImage>;

    /// Release the underlying resource. Calling it again is a no-op.
    fn release(&mut self);

    /// Whether the source can still be read.
    fn is_open(&self) -> bool;
}

/// A directory of decoded frames. Files named by frame number are ordered
/// numerically, so zero-padding is optional; any other names follow, in name
/// order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    open: bool,
}

impl ImageSequenceSource {
    /// Open `dir`. Fails with `VideoOpen` if the directory is missing,
    /// unreadable, or holds no frames.
    pub fn open(dir: impl AsRef<Path>) -> GazeResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(GazeError::video_open(&dir, "not a directory"));
        }

        let entries =
            std::fs::read_dir(&dir).map_err(|e| GazeError::video_open(&dir, e.to_string()))?;

        let mut frames = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| GazeError::video_open(&dir, e.to_string()))?
                .path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_frame && path.is_file() {
                frames.push(path);
            }
        }

        if frames.is_empty() {
            return Err(GazeError::video_open(&dir, "no frames found"));
        }
        frames.sort_by_cached_key(|path| {
            let number = frame_number(path);
            (number.is_none(), number, path.clone())
        });

        tracing::info!("Opened {} frames from {}", frames.len(), dir.display());
        Ok(Self {
            dir,
            frames,
            open: true,
        })
    }
}

/// Frame number encoded in a file stem (`42.png`, `000042.png`).
fn frame_number(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

impl FrameSource for ImageSequenceSource {
    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn read_frame(&mut self, index: u64) -> GazeResult<DynamicImage> {
        if !self.open {
            return Err(GazeError::frame_read(index, "source has been released"));
        }
        let path = usize::try_from(index)
            .ok()
            .and_then(|i| self.frames.get(i))
            .ok_or_else(|| {
                GazeError::frame_read(
                    index,
                    format!("out of range (video has {} frames)", self.frames.len()),
                )
            })?;

        image::open(path).map_err(|e| GazeError::frame_read(index, e.to_string()))
    }

    fn release(&mut self) {
        if self.open {
            tracing::debug!("Releasing frame source {}", self.dir.display());
            self.open = false;
            self.frames.clear();
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_frames(dir: &Path, count: u8) {
        std::fs::create_dir_all(dir).unwrap();
        for i in 0..count {
            RgbImage::from_pixel(4, 3, Rgb([i, 0, 0]))
                .save(dir.join(format!("{i:06}.png")))
                .unwrap();
        }
    }

    #[test]
    fn test_reads_by_index() {
        let dir = std::env::temp_dir().join("ballgaze_test_source_read");
        let _ = std::fs::remove_dir_all(&dir);
        write_frames(&dir, 5);
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let mut source = ImageSequenceSource::open(&dir).unwrap();
        assert_eq!(source.frame_count(), 5);

        let frame = source.read_frame(3).unwrap().to_rgb8();
        assert_eq!(frame.get_pixel(0, 0), &Rgb([3, 0, 0]));

        let err = source.read_frame(5).unwrap_err();
        assert!(matches!(err, GazeError::FrameRead { frame_idx: 5, .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unpadded_names_order_numerically() {
        let dir = std::env::temp_dir().join("ballgaze_test_source_unpadded");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for i in [0u8, 1, 2, 10, 11] {
            RgbImage::from_pixel(2, 2, Rgb([i, 0, 0]))
                .save(dir.join(format!("{i}.png")))
                .unwrap();
        }

        let mut source = ImageSequenceSource::open(&dir).unwrap();
        let reds: Vec<u8> = (0..5)
            .map(|i| source.read_frame(i).unwrap().to_rgb8().get_pixel(0, 0)[0])
            .collect();
        assert_eq!(reds, vec![0, 1, 2, 10, 11]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_errors() {
        let err = ImageSequenceSource::open("/nonexistent/ballgaze/frames").unwrap_err();
        assert!(matches!(err, GazeError::VideoOpen { .. }));

        let dir = std::env::temp_dir().join("ballgaze_test_source_empty");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let err = ImageSequenceSource::open(&dir).unwrap_err();
        assert!(matches!(err, GazeError::VideoOpen { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_release_is_idempotent() {
        let dir = std::env::temp_dir().join("ballgaze_test_source_release");
        let _ = std::fs::remove_dir_all(&dir);
        write_frames(&dir, 2);

        let mut source = ImageSequenceSource::open(&dir).unwrap();
        source.release();
        source.release();
        assert!(!source.is_open());
        assert!(source.read_frame(0).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}

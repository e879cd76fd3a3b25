//! ballgaze frame extraction
//!
//! Pulls representative world-video frames for each fixation so the object
//! detector can be run on them:
//! - **Selector:** which frame indices represent a fixation
//! - **Source:** frame-indexed access to decoded video
//! - **Extractor:** batch extraction with a metadata table
//!
//! Extraction is best-effort per fixation: a frame that cannot be read is
//! logged and skipped, and the batch continues.

pub mod extractor;
pub mod selector;
pub mod source;

pub use extractor::{
    extract_session, load_frame_ranges, ExtractionReport, FixationFrameExtractor, FrameRecord,
};
pub use selector::select_frames;
pub use source::{FrameSource, ImageSequenceSource};

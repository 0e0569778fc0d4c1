use thiserror::Error;

use crate::video::source::VideoError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("video error: {0}")]
    Video(#[from] VideoError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("label JSON error: {0}")]
    LabelJson(#[from] serde_json::Error),
    #[error("patch is {width}x{height}, expected {expected}x{expected} (patch size is fixed by the first label)")]
    PatchSize {
        expected: u32,
        width: u32,
        height: u32,
    },
    #[error("class index {0} does not fit in the record's label byte")]
    ClassIndexOverflow(usize),
}

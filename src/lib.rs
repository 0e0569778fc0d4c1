pub mod export;
pub mod video;

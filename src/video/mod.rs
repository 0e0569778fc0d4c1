//! 视频源抽象 - 解码器后端的消费契约与复用帧缓冲

pub mod frame;
pub mod source;

pub use frame::FrameBuffer;
pub use source::{MockVideoSource, VideoError, VideoSource};

use std::path::Path;

use thiserror::Error;

use crate::video::frame::FrameBuffer;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("failed to open video: {0}")]
    Open(String),
    #[error("seek failed: {0}")]
    Seek(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("end of stream")]
    EndOfStream,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 视频源契约 - 对解码器后端的最小消费接口
///
/// 解码游标是严格串行的：seek 之后必须顺序解码，时间戳由
/// `last_frame_time_microsecond` 在每次解码后读取。
pub trait VideoSource {
    fn open(&mut self, path: &Path) -> Result<(), VideoError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Seek near `t`; not frame-accurate, lands at or before a nearby keyframe
    fn seek_to_microsecond(&mut self, t: i64) -> Result<(), VideoError>;

    /// Decode the next frame into the caller-owned buffer
    fn decode_frame_rgba(&mut self, frame: &mut FrameBuffer) -> Result<(), VideoError>;

    /// Presentation timestamp of the most recently decoded frame
    fn last_frame_time_microsecond(&self) -> i64;
}

/// 脚本化视频源（用于测试）
///
/// 每一帧是 (pts, 纯色填充)，seek 落在第一个 pts >= t 的帧上，
/// 并记录所有 seek 目标供断言使用。
pub struct MockVideoSource {
    width: u32,
    height: u32,
    frames: Vec<MockFrame>,
    cursor: usize,
    last_pts: i64,
    decode_calls: usize,
    seeks: Vec<i64>,
    fail_open: bool,
    fail_decode_at: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct MockFrame {
    pub pts: i64,
    pub fill: [u8; 4],
}

impl MockVideoSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
            cursor: 0,
            last_pts: 0,
            decode_calls: 0,
            seeks: Vec::new(),
            fail_open: false,
            fail_decode_at: None,
        }
    }

    pub fn with_frame(mut self, pts: i64, fill: [u8; 4]) -> Self {
        self.frames.push(MockFrame { pts, fill });
        self
    }

    pub fn with_open_error(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Fail the n-th decode call (1-based)
    pub fn with_decode_error_at(mut self, call: usize) -> Self {
        self.fail_decode_at = Some(call);
        self
    }

    /// All seek targets issued so far, in order
    pub fn seeks(&self) -> &[i64] {
        &self.seeks
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls
    }
}

impl VideoSource for MockVideoSource {
    fn open(&mut self, path: &Path) -> Result<(), VideoError> {
        if self.fail_open {
            return Err(VideoError::Open(format!("cannot open {}", path.display())));
        }
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn seek_to_microsecond(&mut self, t: i64) -> Result<(), VideoError> {
        self.seeks.push(t);
        self.cursor = self
            .frames
            .iter()
            .position(|f| f.pts >= t)
            .unwrap_or(self.frames.len());
        Ok(())
    }

    fn decode_frame_rgba(&mut self, frame: &mut FrameBuffer) -> Result<(), VideoError> {
        self.decode_calls += 1;
        if self.fail_decode_at == Some(self.decode_calls) {
            return Err(VideoError::Decode("scripted decode failure".to_string()));
        }

        let scripted = match self.frames.get(self.cursor) {
            Some(f) => *f,
            None => return Err(VideoError::EndOfStream),
        };

        for px in frame.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&scripted.fill);
        }
        self.last_pts = scripted.pts;
        self.cursor += 1;
        Ok(())
    }

    fn last_frame_time_microsecond(&self) -> i64 {
        self.last_pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_sequential_decode() {
        let mut video = MockVideoSource::new(2, 2)
            .with_frame(0, [10, 20, 30, 255])
            .with_frame(40_000, [50, 60, 70, 255]);
        let mut frame = FrameBuffer::new(2, 2);

        video.decode_frame_rgba(&mut frame).unwrap();
        assert_eq!(video.last_frame_time_microsecond(), 0);
        assert_eq!(&frame.data()[..4], &[10, 20, 30, 255]);

        video.decode_frame_rgba(&mut frame).unwrap();
        assert_eq!(video.last_frame_time_microsecond(), 40_000);
        assert_eq!(&frame.data()[..4], &[50, 60, 70, 255]);

        assert!(matches!(
            video.decode_frame_rgba(&mut frame),
            Err(VideoError::EndOfStream)
        ));
    }

    #[test]
    fn test_mock_seek_lands_at_or_after_target() {
        let mut video = MockVideoSource::new(2, 2)
            .with_frame(0, [0, 0, 0, 255])
            .with_frame(5_000_000, [0, 0, 0, 255])
            .with_frame(10_000_000, [0, 0, 0, 255]);
        let mut frame = FrameBuffer::new(2, 2);

        video.seek_to_microsecond(7_000_000).unwrap();
        video.decode_frame_rgba(&mut frame).unwrap();
        assert_eq!(video.last_frame_time_microsecond(), 10_000_000);
        assert_eq!(video.seeks(), &[7_000_000]);
    }

    #[test]
    fn test_mock_open_error() {
        let mut video = MockVideoSource::new(2, 2).with_open_error();
        assert!(matches!(
            video.open(Path::new("missing.mp4")),
            Err(VideoError::Open(_))
        ));
    }
}

use log::{debug, warn};

use crate::export::error::ExportError;
use crate::video::frame::FrameBuffer;
use crate::video::source::VideoSource;

/// 目标超前超过 5 秒才 seek，避免长距离顺序解码
pub const SEEK_AHEAD_THRESHOLD_US: i64 = 5_000_000;
/// seek 落点比目标提前 3 秒，补偿 seek 的不精确
pub const SEEK_REWIND_US: i64 = 3_000_000;

/// 一次同步的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 解码到了 pts 恰好等于目标的帧，帧缓冲里就是它
    Matched,
    /// 解码越过了目标，这个标注帧已无法精确恢复
    Overshot { pts: i64 },
}

/// 帧同步器 - 驱动解码游标精确对齐标注时间戳
///
/// 整个导出期间独占视频源。只接受精确匹配：宁可丢掉一个标注帧，
/// 也不导出时间戳对不上的样本。
pub struct FrameSynchronizer<'a, V: VideoSource> {
    video: &'a mut V,
    last_frame_time: i64,
}

impl<'a, V: VideoSource> FrameSynchronizer<'a, V> {
    pub fn new(video: &'a mut V) -> Self {
        Self {
            video,
            last_frame_time: 0,
        }
    }

    /// Pts of the most recently decoded frame
    pub fn last_frame_time(&self) -> i64 {
        self.last_frame_time
    }

    /// 把解码游标推进到 pts == `target_us` 的帧
    ///
    /// 匹配到的帧留在 `frame` 里；seek / 解码失败对整次导出是致命的。
    pub fn advance_to(
        &mut self,
        target_us: i64,
        frame: &mut FrameBuffer,
    ) -> Result<SyncOutcome, ExportError> {
        if target_us - self.last_frame_time > SEEK_AHEAD_THRESHOLD_US {
            let seek_to = target_us - SEEK_REWIND_US;
            debug!("seeking to {}us for target {}us", seek_to, target_us);
            self.video.seek_to_microsecond(seek_to)?;
        }

        loop {
            self.video.decode_frame_rgba(frame)?;
            let pts = self.video.last_frame_time_microsecond();
            self.last_frame_time = pts;

            if pts == target_us {
                return Ok(SyncOutcome::Matched);
            }
            if pts > target_us {
                warn!(
                    "no decoded frame matches {}us (decoder is at {}us), skipping",
                    target_us, pts
                );
                return Ok(SyncOutcome::Overshot { pts });
            }
        }
    }
}

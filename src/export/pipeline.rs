use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::export::error::ExportError;
use crate::export::labels::{LabelIndex, VideoLabels};
use crate::export::patch::{Patch, PatchView};
use crate::export::sink::{Cifar10Sink, PatchSink, PngDirSink};
use crate::export::sync::{FrameSynchronizer, SyncOutcome};
use crate::video::frame::FrameBuffer;
use crate::video::source::VideoSource;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// 每个标注帧一个 .bin 文件，CIFAR-10 风格二进制记录
    Cifar10,
    /// 按类别目录输出 PNG
    Png,
}

/// 一次导出的统计结果
#[derive(Debug, Clone, Default)]
pub struct ExportOutcome {
    pub processed_frames: usize,
    pub total_frames: usize,
    pub exported_patches: usize,
    /// 因解码越过目标时间戳而丢弃的标注帧
    pub skipped_frames: usize,
    pub cancelled: bool,
}

/// patch 输出目录由视频路径唯一决定
pub fn patch_dir(video_path: &Path) -> PathBuf {
    video_path.with_extension("patches")
}

/// 导出一个视频的全部标注 patch
///
/// 标签索引在任何解码发生之前对完整标签集建立；之后按时间戳
/// 逐帧同步解码器，把每个标注矩形裁出来交给所选的编码器。
/// 进度回调在每个标注帧处理完后调用一次，返回 false 表示在
/// 帧边界处干净地取消（不是错误）。
pub fn export_video<V, F>(
    video: &mut V,
    video_path: &Path,
    labels: &VideoLabels,
    format: ExportFormat,
    mut progress: F,
) -> Result<ExportOutcome, ExportError>
where
    V: VideoSource,
    F: FnMut(usize, usize) -> bool,
{
    let out_dir = patch_dir(video_path);
    fs::create_dir_all(&out_dir)?;

    video.open(video_path)?;
    let mut frame = FrameBuffer::new(video.width(), video.height());

    let index = LabelIndex::build(labels);
    info!(
        "exporting {} labeled frames ({} classes, {} labels) from {} to {}",
        labels.frames.len(),
        index.len(),
        labels.total_labels(),
        video_path.display(),
        out_dir.display()
    );

    let mut sink: Box<dyn PatchSink> = match format {
        ExportFormat::Cifar10 => Box::new(Cifar10Sink::new(&out_dir)),
        ExportFormat::Png => Box::new(PngDirSink::new(&out_dir)),
    };

    let total = labels.frames.len();
    let mut outcome = ExportOutcome {
        total_frames: total,
        ..Default::default()
    };
    let mut sync = FrameSynchronizer::new(video);

    for labeled in &labels.frames {
        if labeled.labels.is_empty() {
            // 空帧不触碰解码器，只消耗循环位置
        } else {
            match sync.advance_to(labeled.time, &mut frame)? {
                SyncOutcome::Matched => {
                    for label in &labeled.labels {
                        let patch = Patch {
                            view: PatchView::new(&frame, label.rect),
                            class: &label.class,
                            class_id: index
                                .get(&label.class)
                                .expect("label index covers every class in the label set"),
                            frame_time: labeled.time,
                        };
                        sink.write(&patch)?;
                        outcome.exported_patches += 1;
                    }
                }
                SyncOutcome::Overshot { .. } => {
                    outcome.skipped_frames += 1;
                }
            }
        }

        outcome.processed_frames += 1;
        if !progress(outcome.processed_frames, total) {
            outcome.cancelled = true;
            info!(
                "export cancelled after {}/{} frames",
                outcome.processed_frames, total
            );
            return Ok(outcome);
        }
    }

    info!(
        "export finished: {} patches written, {} frames skipped",
        outcome.exported_patches, outcome.skipped_frames
    );
    Ok(outcome)
}

//! 标注视频 patch 导出 - 把已标注视频裁成训练样本
//!
//! 导出流程：
//! 1. 标签预扫描 - 为每个类别按首次出现顺序分配稳定整数索引
//! 2. 帧同步 - seek-ahead + 顺序解码，pts 精确对齐标注时间戳
//! 3. patch 裁剪 - 对解码帧做零拷贝窗口
//! 4. 编码输出 - CIFAR-10 二进制记录 / 按类别目录 PNG 两种格式

pub mod error;
pub mod labels;
pub mod patch;
pub mod pipeline;
pub mod sink;
pub mod sync;

pub use error::ExportError;
pub use labels::{BoxLabel, LabelIndex, LabeledFrame, Rectangle, VideoLabels};
pub use patch::{Patch, PatchView};
pub use pipeline::{export_video, patch_dir, ExportFormat, ExportOutcome};
pub use sink::{Cifar10Sink, PatchSink, PngDirSink};
pub use sync::{FrameSynchronizer, SyncOutcome};

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::export::error::ExportError;
use crate::export::patch::Patch;

/// Patch 编码策略 - 每次接收一个 patch
///
/// 同步器和裁剪逻辑不感知具体格式；新增格式只需要新的实现。
pub trait PatchSink {
    fn write(&mut self, patch: &Patch<'_>) -> Result<(), ExportError>;
}

/// CIFAR-10 风格的二进制记录
///
/// 每个标注帧一个 `{时间戳}.bin` 文件，记录首尾相接无分隔符。
/// 记录布局：1 字节类别索引 + 3 * dim * dim 的平面像素
/// （先全部 R 行，再 G 行，再 B 行，丢弃 alpha）。
/// patch 边长由第一个 patch 固定，之后不一致直接报错，
/// 避免写出错位的记录。
pub struct Cifar10Sink {
    out_dir: PathBuf,
    dim: Option<u32>,
    current: Option<(i64, File)>,
    record: Vec<u8>,
}

impl Cifar10Sink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            dim: None,
            current: None,
            record: Vec::new(),
        }
    }
}

impl PatchSink for Cifar10Sink {
    fn write(&mut self, patch: &Patch<'_>) -> Result<(), ExportError> {
        let rect = patch.view.rect();
        let dim = *self.dim.get_or_insert(rect.width);
        if rect.width != dim || rect.height != dim {
            return Err(ExportError::PatchSize {
                expected: dim,
                width: rect.width,
                height: rect.height,
            });
        }

        let class_id = u8::try_from(patch.class_id)
            .map_err(|_| ExportError::ClassIndexOverflow(patch.class_id))?;

        if self.current.as_ref().map(|(t, _)| *t) != Some(patch.frame_time) {
            let path = self.out_dir.join(format!("{}.bin", patch.frame_time));
            self.current = Some((patch.frame_time, File::create(path)?));
        }
        let (_, file) = self.current.as_mut().expect("record file opened above");

        self.record.clear();
        self.record.push(class_id);
        for chan in 0..3 {
            for y in 0..dim {
                let row = patch.view.row(y);
                for x in 0..dim as usize {
                    self.record.push(row[x * 4 + chan]);
                }
            }
        }
        file.write_all(&self.record)?;
        Ok(())
    }
}

/// 按类别目录输出 RGB PNG
///
/// 文件名编码帧时间戳和矩形，零填充保证唯一且按时间戳可排序。
pub struct PngDirSink {
    out_dir: PathBuf,
}

impl PngDirSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

fn sanitize_class_name(class: &str) -> String {
    class.replace(' ', "_")
}

impl PatchSink for PngDirSink {
    fn write(&mut self, patch: &Patch<'_>) -> Result<(), ExportError> {
        let class_dir = self.out_dir.join(sanitize_class_name(patch.class));
        fs::create_dir_all(&class_dir)?;

        let rect = patch.view.rect();
        let name = format!(
            "{:09}-{:04}-{:04}-{:04}-{:04}.png",
            patch.frame_time, rect.x1, rect.y1, rect.width, rect.height
        );

        // PNG 不带 alpha，先转成紧凑的 RGB
        let mut rgb = Vec::with_capacity(rect.width as usize * rect.height as usize * 3);
        for y in 0..rect.height {
            for px in patch.view.row(y).chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
            }
        }
        let img = image::RgbImage::from_raw(rect.width, rect.height, rgb)
            .expect("patch buffer matches rect dimensions");
        img.save(class_dir.join(name))?;
        Ok(())
    }
}

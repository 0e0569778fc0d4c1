use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::export::error::ExportError;

/// 整数像素坐标的轴对齐标注框
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x1: i32,
    pub y1: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x1: i32, y1: i32, width: u32, height: u32) -> Self {
        Self {
            x1,
            y1,
            width,
            height,
        }
    }

    pub fn x2(&self) -> i64 {
        self.x1 as i64 + self.width as i64
    }

    pub fn y2(&self) -> i64 {
        self.y1 as i64 + self.height as i64
    }
}

/// 单个标注：矩形 + 类别名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxLabel {
    pub rect: Rectangle,
    pub class: String,
}

impl BoxLabel {
    pub fn new(rect: Rectangle, class: impl Into<String>) -> Self {
        Self {
            rect,
            class: class.into(),
        }
    }
}

/// 一个时间戳（微秒）上可见的全部标注
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledFrame {
    pub time: i64,
    pub labels: Vec<BoxLabel>,
}

/// 一个视频的完整标注序列，按时间升序（调用方保证）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoLabels {
    pub frames: Vec<LabeledFrame>,
}

impl VideoLabels {
    /// Load a label sidecar file
    pub fn load_json(path: &Path) -> Result<Self, ExportError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn total_labels(&self) -> usize {
        self.frames.iter().map(|f| f.labels.len()).sum()
    }
}

/// 类别名 -> 稠密整数索引，按首次出现顺序分配
///
/// 导出开始前对全部标签做一次纯扫描建立映射，之后不再变化；
/// 二进制格式的类别字节完全由它决定。
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    by_class: HashMap<String, usize>,
    classes: Vec<String>,
}

impl LabelIndex {
    pub fn build(labels: &VideoLabels) -> Self {
        let mut index = LabelIndex::default();
        for frame in &labels.frames {
            for label in &frame.labels {
                if !index.by_class.contains_key(&label.class) {
                    index.by_class.insert(label.class.clone(), index.classes.len());
                    index.classes.push(label.class.clone());
                }
            }
        }
        index
    }

    pub fn get(&self, class: &str) -> Option<usize> {
        self.by_class.get(class).copied()
    }

    /// Class names in index order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_frame(time: i64, classes: &[&str]) -> LabeledFrame {
        LabeledFrame {
            time,
            labels: classes
                .iter()
                .map(|c| BoxLabel::new(Rectangle::new(0, 0, 4, 4), *c))
                .collect(),
        }
    }

    #[test]
    fn test_index_first_seen_order() {
        let labels = VideoLabels {
            frames: vec![
                labeled_frame(0, &["car", "pedestrian"]),
                labeled_frame(1000, &["pedestrian", "sign", "car"]),
            ],
        };

        let index = LabelIndex::build(&labels);
        assert_eq!(index.get("car"), Some(0));
        assert_eq!(index.get("pedestrian"), Some(1));
        assert_eq!(index.get("sign"), Some(2));
        assert_eq!(index.classes(), &["car", "pedestrian", "sign"]);
        assert_eq!(index.get("unknown"), None);
    }

    #[test]
    fn test_index_injective_and_idempotent() {
        let labels = VideoLabels {
            frames: vec![
                labeled_frame(0, &["a", "b", "a"]),
                labeled_frame(500, &["c", "b"]),
            ],
        };

        let first = LabelIndex::build(&labels);
        let second = LabelIndex::build(&labels);
        assert_eq!(first.len(), 3);

        for class in first.classes() {
            assert_eq!(first.get(class), second.get(class));
        }

        let mut seen: Vec<usize> = first
            .classes()
            .iter()
            .filter_map(|c| first.get(c))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_index_empty_labels() {
        let index = LabelIndex::build(&VideoLabels::default());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_labels_json_round_trip() {
        let labels = VideoLabels {
            frames: vec![labeled_frame(250_000, &["stop sign"])],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.labels.json");
        labels.save_json(&path).unwrap();

        let loaded = VideoLabels::load_json(&path).unwrap();
        assert_eq!(loaded.frames.len(), 1);
        assert_eq!(loaded.frames[0].time, 250_000);
        assert_eq!(loaded.frames[0].labels[0].class, "stop sign");
        assert_eq!(loaded.frames[0].labels[0].rect, Rectangle::new(0, 0, 4, 4));
        assert_eq!(loaded.total_labels(), 1);
    }
}

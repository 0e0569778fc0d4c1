use crate::export::labels::Rectangle;
use crate::video::frame::FrameBuffer;

/// 解码帧上的零拷贝窗口
///
/// 只借用帧缓冲，不复制像素；行访问按源帧的行距换算。
/// 矩形越界属于调用方的契约错误，构造时直接 panic。
pub struct PatchView<'a> {
    frame: &'a FrameBuffer,
    rect: Rectangle,
}

impl<'a> PatchView<'a> {
    pub fn new(frame: &'a FrameBuffer, rect: Rectangle) -> Self {
        assert!(
            rect.x1 >= 0
                && rect.y1 >= 0
                && rect.x2() <= frame.width() as i64
                && rect.y2() <= frame.height() as i64,
            "patch rectangle {:?} outside {}x{} frame",
            rect,
            frame.width(),
            frame.height()
        );
        Self { frame, rect }
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    /// RGBA bytes of one window row (y relative to the window)
    pub fn row(&self, y: u32) -> &[u8] {
        let frame_row = self.frame.row(self.rect.y1 as u32 + y);
        let start = self.rect.x1 as usize * 4;
        &frame_row[start..start + self.rect.width as usize * 4]
    }
}

/// 一个待编码的训练样本：窗口 + 类别 + 所属帧时间戳
pub struct Patch<'a> {
    pub view: PatchView<'a>,
    pub class: &'a str,
    pub class_id: usize,
    pub frame_time: i64,
}

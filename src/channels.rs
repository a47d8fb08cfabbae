//! # 像素通道流
//!
//! 把图像的像素看作一串按顺序排列的单字节通道值 (每个像素 4 个通道，顺序为 R, G, B, A)，
//! 并允许按 bit 读写每个通道的低位。图像文件的读取和保存也在此处完成。
//!
//! 通道顺序与 `image` 库的 RGBA8 内存布局一致，不是 ARGB 整数按低字节优先展开的 B, G, R, A，
//! 因此写入的数据与按 B, G, R, A 顺序读取的工具不兼容。

use crate::constants::CHANNELS_PER_PIXEL;
use crate::error::Result;
use image::{ImageReader, RgbaImage};
use std::path::Path;

/// 图像的通道数据。长度在创建时固定为 `像素数 * 4`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStream {
    width: u32,
    height: u32,
    channels: Vec<u8>,
}

impl ChannelStream {
    /// 由原始 RGBA 数据创建通道流。
    ///
    /// 如果 `channels` 的长度不等于 `width * height * 4`，返回 `None`。
    pub fn from_raw(width: u32, height: u32, channels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(CHANNELS_PER_PIXEL)?;
        (channels.len() == expected).then_some(Self {
            width,
            height,
            channels,
        })
    }

    /// 读取图像文件，并将其转换为 RGBA8 通道流。
    ///
    /// # Errors
    ///
    /// 无法打开文件或无法解码图像时返回错误。
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::from(image.into_rgba8()))
    }

    /// 以 RGBA8 格式保存图像，格式由扩展名决定。
    ///
    /// # Errors
    ///
    /// 扩展名不受支持或写入失败时返回错误。
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        image::save_buffer(
            path,
            &self.channels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_pixels(&self) -> usize {
        self.channels.len() / CHANNELS_PER_PIXEL
    }

    /// 通道字节总数。
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.channels
    }

    /// 读取第 `channel` 个通道的第 `plane` 位 (0 为最低位)。越界时返回 `None`。
    pub fn read_bit(&self, channel: usize, plane: u8) -> Option<bool> {
        if plane >= 8 {
            return None;
        }
        self.channels
            .get(channel)
            .map(|&byte| byte & (1 << plane) != 0)
    }

    /// 写入第 `channel` 个通道的第 `plane` 位，其余位保持不变。越界时返回 `false`。
    pub fn write_bit(&mut self, channel: usize, plane: u8, bit: bool) -> bool {
        if plane >= 8 {
            return false;
        }
        match self.channels.get_mut(channel) {
            Some(byte) => {
                let mask = 1u8 << plane;
                *byte = if bit { *byte | mask } else { *byte & !mask };
                true
            }
            None => false,
        }
    }
}

impl From<RgbaImage> for ChannelStream {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: image.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_bit_keeps_other_planes() {
        let mut stream = ChannelStream::from_raw(1, 1, vec![0b1010_1010; 4]).unwrap();
        assert!(stream.write_bit(2, 0, true));
        assert!(stream.write_bit(2, 1, false));
        assert_eq!(stream.as_bytes()[2], 0b1010_1001);
        assert_eq!(stream.read_bit(2, 0), Some(true));
        assert_eq!(stream.read_bit(2, 7), Some(true));
    }

    #[test]
    fn out_of_range_access_is_reported() {
        let mut stream = ChannelStream::from_raw(1, 1, vec![0; 4]).unwrap();
        assert_eq!(stream.read_bit(4, 0), None);
        assert_eq!(stream.read_bit(0, 8), None);
        assert!(!stream.write_bit(4, 0, true));
        assert_eq!(stream.as_bytes(), &[0; 4]);
    }

    #[test]
    fn lanes_follow_rgba_order() {
        let image = RgbaImage::from_fn(2, 1, |x, _| {
            let base = x as u8 * 4;
            image::Rgba([base + 1, base + 2, base + 3, base + 4])
        });
        let stream = ChannelStream::from(image);
        assert_eq!(stream.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(ChannelStream::from_raw(2, 2, vec![0; 15]).is_none());
        assert_eq!(ChannelStream::from_raw(2, 2, vec![0; 16]).unwrap().num_pixels(), 4);
    }
}

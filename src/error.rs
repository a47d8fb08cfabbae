//! # 错误类型
//!
//! 隐写核心的所有失败情况。这些错误都由数据本身决定，重试没有意义。

use thiserror::Error;

/// 隐藏或提取文件时可能出现的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 图像在所选位深度下无法容纳全部数据。单位为 bit。
    #[error("not enough space in the image: {required} bits required, {available} bits available")]
    CapacityExceeded { required: u64, available: u64 },

    #[error("no hidden file found: the magic number does not match")]
    MagicMismatch,

    #[error("invalid bit depth {0}, expected a value between 1 and 8")]
    InvalidBitDepth(u8),

    /// 通道数据在某个字段中途耗尽。`decoded` 为已解码的字节数。
    #[error("the image ended after {decoded} decoded bytes, before the hidden file was complete")]
    TruncatedStream { decoded: usize },

    #[error("filename is {0} bytes long, at most 255 bytes are allowed")]
    FilenameTooLong(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl StegoError {
    /// 命令行程序针对每种错误使用的退出码。
    ///
    /// 1 留给其他失败，2 是 `clap` 的参数错误码，因此从 3 开始编号。
    pub fn exit_code(&self) -> u8 {
        match self {
            StegoError::CapacityExceeded { .. } => 3,
            StegoError::MagicMismatch => 4,
            StegoError::InvalidBitDepth(_) => 5,
            StegoError::TruncatedStream { .. } => 6,
            StegoError::FilenameTooLong(_) => 7,
            StegoError::Io(_) | StegoError::Image(_) => 8,
        }
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;

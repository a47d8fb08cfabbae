//! # lsb_stash 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：把任意文件连同文件名写入图像像素通道的最低位，
//! 并在之后将其完整恢复。

// 声明库包含的所有模块。

pub mod capacity;
pub mod channels;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod payload;
pub mod steganography;

pub use capacity::capacity_bytes;
pub use channels::ChannelStream;
pub use error::StegoError;
pub use payload::{BitDepth, HiddenPayload};
pub use steganography::{pack, unpack};

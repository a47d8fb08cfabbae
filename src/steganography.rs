//! # 隐写核心
//!
//! [`pack`] 把 [`HiddenPayload`] 写入通道流，[`unpack`] 从通道流中恢复它。
//!
//! 遍历顺序为像素优先、通道其次、位平面最内层。每个源字节从最低位开始写入，
//! 每个通道也从最低位开始填充。前 14 个字节 (魔数 + 位深度) 固定每个通道写 1 bit，
//! 从第 15 个字节 (文件名长度) 起每个通道写 `bit_depth` 位。

use crate::capacity::required_channels;
use crate::channels::ChannelStream;
use crate::constants::{MAGIC, PREAMBLE_BYTES};
use crate::error::{Result, StegoError};
use crate::payload::{BitDepth, HiddenPayload};

/// 一次 pack/unpack 调用期间在通道流上的位置。
#[derive(Debug)]
struct BitCursor {
    channel: usize,
    plane: u8,
    depth: u8,
}

impl BitCursor {
    fn new() -> Self {
        Self {
            channel: 0,
            plane: 0,
            depth: 1,
        }
    }

    /// 只能在通道边界上切换位深度。
    fn set_depth(&mut self, depth: BitDepth) {
        debug_assert_eq!(self.plane, 0, "bit depth switched mid-channel");
        self.depth = depth.get();
    }

    fn advance(&mut self) {
        self.plane += 1;
        if self.plane == self.depth {
            self.plane = 0;
            self.channel += 1;
        }
    }

    /// 至少被写入过一个 bit 的通道数。
    fn channels_touched(&self) -> usize {
        self.channel + usize::from(self.plane > 0)
    }

    fn write_byte(&mut self, stream: &mut ChannelStream, byte: u8) -> bool {
        for i in 0..8 {
            if !stream.write_bit(self.channel, self.plane, (byte >> i) & 1 == 1) {
                return false;
            }
            self.advance();
        }
        true
    }

    fn read_byte(&mut self, stream: &ChannelStream) -> Option<u8> {
        let mut byte = 0u8;
        for i in 0..8 {
            if stream.read_bit(self.channel, self.plane)? {
                byte |= 1 << i;
            }
            self.advance();
        }
        Some(byte)
    }
}

/// 将 `payload` 写入 `stream`，返回被修改过的通道数。
///
/// # Errors
///
/// 图像容量不足时返回 [`StegoError::CapacityExceeded`]，此时不会修改任何通道。
pub fn pack(payload: &HiddenPayload, stream: &mut ChannelStream) -> Result<usize> {
    let bytes = payload.to_bytes();
    let depth = payload.bit_depth();

    let needed = required_channels(bytes.len(), depth);
    if needed > stream.len() {
        return Err(capacity_exceeded(&bytes, depth, stream.len()));
    }

    let mut cursor = BitCursor::new();
    for (index, &byte) in bytes.iter().enumerate() {
        if index == PREAMBLE_BYTES {
            cursor.set_depth(depth);
        }
        if !cursor.write_byte(stream, byte) {
            return Err(capacity_exceeded(&bytes, depth, stream.len()));
        }
    }

    Ok(cursor.channels_touched())
}

fn capacity_exceeded(bytes: &[u8], depth: BitDepth, channels: usize) -> StegoError {
    let preamble_bits = (PREAMBLE_BYTES * 8) as u64;
    let total_bits = bytes.len() as u64 * 8;
    let available = (channels as u64).min(preamble_bits)
        + (channels as u64).saturating_sub(preamble_bits) * u64::from(depth.get());
    StegoError::CapacityExceeded {
        required: total_bits,
        available,
    }
}

/// 解码器当前正在读取的字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Magic,
    BitDepth,
    FilenameLength,
    Filename,
    PayloadLength,
    Payload,
    Done,
}

/// 从通道流中逐字节解析隐藏文件的状态机。
struct Unpacker<'a> {
    stream: &'a ChannelStream,
    cursor: BitCursor,
    state: State,
    buffer: Vec<u8>,
    depth: BitDepth,
    filename_len: usize,
    payload_len: usize,
}

impl<'a> Unpacker<'a> {
    fn new(stream: &'a ChannelStream) -> Self {
        Self {
            stream,
            cursor: BitCursor::new(),
            state: State::Magic,
            buffer: Vec::with_capacity(PREAMBLE_BYTES + 5),
            depth: BitDepth::MIN,
            filename_len: 0,
            payload_len: 0,
        }
    }

    /// 当前字段结束时缓冲区应有的字节数。所有偏移量只在这里计算。
    fn boundary(&self) -> usize {
        let filename_end = PREAMBLE_BYTES + 1 + self.filename_len;
        match self.state {
            State::Magic => MAGIC.len(),
            State::BitDepth => PREAMBLE_BYTES,
            State::FilenameLength => PREAMBLE_BYTES + 1,
            State::Filename => filename_end,
            State::PayloadLength => filename_end + 4,
            State::Payload => filename_end + 4 + self.payload_len,
            State::Done => self.buffer.len(),
        }
    }

    fn run(mut self) -> Result<HiddenPayload> {
        while self.state != State::Done {
            if self.buffer.len() == self.boundary() {
                self.transition()?;
                continue;
            }
            let byte = self
                .cursor
                .read_byte(self.stream)
                .ok_or(StegoError::TruncatedStream {
                    decoded: self.buffer.len(),
                })?;
            self.buffer.push(byte);
        }
        self.finish()
    }

    /// 当前字段读完后校验它，并进入下一个状态。
    fn transition(&mut self) -> Result<()> {
        self.state = match self.state {
            State::Magic => {
                if self.buffer[..] != MAGIC[..] {
                    return Err(StegoError::MagicMismatch);
                }
                State::BitDepth
            }
            State::BitDepth => {
                self.depth = BitDepth::try_from(self.buffer[MAGIC.len()])?;
                self.cursor.set_depth(self.depth);
                State::FilenameLength
            }
            State::FilenameLength => {
                self.filename_len = usize::from(self.buffer[PREAMBLE_BYTES]);
                State::Filename
            }
            State::Filename => State::PayloadLength,
            State::PayloadLength => {
                let start = self.buffer.len() - 4;
                let mut length = [0u8; 4];
                length.copy_from_slice(&self.buffer[start..]);
                self.payload_len = u32::from_le_bytes(length) as usize;
                // 长度字段可能已损坏，预分配不超过剩余通道能提供的字节数
                let remaining = self.stream.len().saturating_sub(self.cursor.channel)
                    * usize::from(self.depth.get())
                    / 8;
                self.buffer.reserve(self.payload_len.min(remaining));
                State::Payload
            }
            State::Payload => State::Done,
            State::Done => State::Done,
        };
        Ok(())
    }

    fn finish(self) -> Result<HiddenPayload> {
        let filename_start = PREAMBLE_BYTES + 1;
        let filename_end = filename_start + self.filename_len;
        let filename = self.buffer[filename_start..filename_end].to_vec();
        let data = self.buffer[filename_end + 4..].to_vec();
        HiddenPayload::new(filename, data, self.depth)
    }
}

/// 从 `stream` 中提取隐藏文件。读取到负载结尾后立即停止，不会读取之后的任何位。
///
/// # Errors
///
/// * 魔数不匹配时返回 [`StegoError::MagicMismatch`]。
/// * 位深度字节不在 1 到 8 之间时返回 [`StegoError::InvalidBitDepth`]。
/// * 通道数据在负载结尾之前耗尽时返回 [`StegoError::TruncatedStream`]。
pub fn unpack(stream: &ChannelStream) -> Result<HiddenPayload> {
    Unpacker::new(stream).run()
}

//! # 容量估算
//!
//! 计算一张图像在每种位深度下最多能隐藏多少字节的文件内容。

use crate::constants::{CHANNELS_PER_PIXEL, LENGTH_FIELDS_BYTES, PREAMBLE_CHANNELS};
use crate::payload::BitDepth;

/// 在 `bit_depth` 下可隐藏的最大文件字节数。
///
/// 前导部分 (魔数 + 位深度) 固定占用 112 个通道，剩余通道每个存储 `bit_depth` 位，
/// 再减去文件名长度字段、文件名和负载长度字段。
/// 返回值不大于 0 表示图像连头部都放不下。
pub fn capacity_bytes(num_pixels: usize, bit_depth: BitDepth, filename_len: usize) -> i64 {
    let channels = num_pixels.saturating_mul(CHANNELS_PER_PIXEL);
    let bits = channels.saturating_sub(PREAMBLE_CHANNELS) as u64 * u64::from(bit_depth.get());
    let overhead = (LENGTH_FIELDS_BYTES + filename_len) as u64;
    (bits / 8) as i64 - overhead as i64
}

/// 位深度 1 到 8 的容量，下标 0 对应位深度 1。
pub fn capacities(num_pixels: usize, filename_len: usize) -> [i64; 8] {
    let mut result = [0; 8];
    for (slot, depth) in result.iter_mut().zip(BitDepth::all()) {
        *slot = capacity_bytes(num_pixels, depth, filename_len);
    }
    result
}

/// 能容纳 `payload_len` 字节文件的最小位深度。任何位深度都放不下时返回 `None`。
pub fn smallest_fitting_depth(
    num_pixels: usize,
    filename_len: usize,
    payload_len: usize,
) -> Option<BitDepth> {
    BitDepth::all().find(|&depth| {
        let capacity = capacity_bytes(num_pixels, depth, filename_len);
        capacity >= 0 && capacity as u64 >= payload_len as u64
    })
}

/// 写入 `serialized_len` 字节 (完整的序列化数据) 所需的通道数。
pub fn required_channels(serialized_len: usize, bit_depth: BitDepth) -> usize {
    let preamble = PREAMBLE_CHANNELS.min(serialized_len * 8);
    let rest_bits = serialized_len.saturating_sub(PREAMBLE_CHANNELS / 8) * 8;
    preamble + rest_bits.div_ceil(bit_depth.get() as usize)
}

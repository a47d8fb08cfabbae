//! # 隐藏文件模型
//!
//! [`HiddenPayload`] 是隐藏在图像中的结构化数据: 头部字段加上文件内容。
//! 序列化后的布局为:
//!
//! | 偏移      | 长度 | 含义                   |
//! |-----------|------|------------------------|
//! | 0         | 13   | 魔数 `steganography`   |
//! | 13        | 1    | 位深度 (1-8)           |
//! | 14        | 1    | 文件名长度 N           |
//! | 15        | N    | 文件名                 |
//! | 15 + N    | 4    | 负载长度 (小端序)      |
//! | 19 + N    | L    | 负载                   |

use crate::constants::{
    EXTRACTED_PREFIX, FALLBACK_FILENAME, FIXED_HEADER_BYTES, MAGIC, MAX_FILENAME_LEN,
};
use crate::error::{Result, StegoError};
use std::path::Path;

/// 每个通道中被修改的最低位数量，取值范围 1 到 8。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitDepth(u8);

impl BitDepth {
    pub const MIN: BitDepth = BitDepth(1);
    pub const MAX: BitDepth = BitDepth(8);

    pub fn get(self) -> u8 {
        self.0
    }

    /// 按从小到大的顺序遍历所有合法的位深度。
    pub fn all() -> impl Iterator<Item = BitDepth> {
        (Self::MIN.0..=Self::MAX.0).map(BitDepth)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = StegoError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1..=8 => Ok(BitDepth(value)),
            _ => Err(StegoError::InvalidBitDepth(value)),
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> u8 {
        depth.0
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 要隐藏 (或已提取) 的文件及其头部信息。
///
/// 字段是私有的，长度约束在构造时检查，因此序列化不会失败。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenPayload {
    bit_depth: BitDepth,
    filename: Vec<u8>,
    data: Vec<u8>,
}

impl HiddenPayload {
    /// 创建新的隐藏文件。
    ///
    /// # Errors
    ///
    /// * 文件名超过 255 字节时返回 [`StegoError::FilenameTooLong`]。
    /// * 文件内容超过 `u32::MAX` 字节时返回 [`StegoError::CapacityExceeded`]。
    pub fn new(filename: impl Into<Vec<u8>>, data: Vec<u8>, bit_depth: BitDepth) -> Result<Self> {
        let filename = filename.into();
        if filename.len() > MAX_FILENAME_LEN {
            return Err(StegoError::FilenameTooLong(filename.len()));
        }
        if u32::try_from(data.len()).is_err() {
            return Err(StegoError::CapacityExceeded {
                required: data.len() as u64 * 8,
                available: u64::from(u32::MAX) * 8,
            });
        }
        Ok(Self {
            bit_depth,
            filename,
            data,
        })
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn filename(&self) -> &[u8] {
        &self.filename
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// 序列化后的总字节数: 19 + 文件名长度 + 负载长度。
    pub fn serialized_len(&self) -> usize {
        FIXED_HEADER_BYTES + self.filename.len() + self.data.len()
    }

    /// 按线格式序列化: 魔数、位深度、文件名长度、文件名、负载长度 (小端序)、负载。
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.serialized_len());
        bytes.extend_from_slice(MAGIC);
        bytes.push(self.bit_depth.get());
        // 长度在 new() 中已经检查过
        bytes.push(self.filename.len() as u8);
        bytes.extend_from_slice(&self.filename);
        bytes.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&self.data);
        bytes
    }

    /// 提取时使用的输出文件名: `extracted_` 加上隐藏的文件名。
    ///
    /// 只保留文件名的最后一个路径组件，避免写到目标目录之外。
    /// 文件名为空或不可用时使用 `extracted_payload.bin`。
    pub fn output_name(&self) -> String {
        let name = String::from_utf8_lossy(&self.filename);
        let base = Path::new(name.as_ref())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
        format!("{EXTRACTED_PREFIX}{base}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_layout_matches_wire_format() {
        let payload =
            HiddenPayload::new("a.txt", b"hello".to_vec(), BitDepth::try_from(3).unwrap())
                .unwrap();
        let bytes = payload.to_bytes();

        assert_eq!(bytes.len(), 19 + 5 + 5);
        assert_eq!(&bytes[..13], b"steganography");
        assert_eq!(bytes[13], 3);
        assert_eq!(bytes[14], 5);
        assert_eq!(&bytes[15..20], b"a.txt");
        assert_eq!(&bytes[20..24], &[5, 0, 0, 0]);
        assert_eq!(&bytes[24..], b"hello");
    }

    #[test]
    fn bit_depth_bounds() {
        assert!(matches!(BitDepth::try_from(0), Err(StegoError::InvalidBitDepth(0))));
        assert!(matches!(BitDepth::try_from(9), Err(StegoError::InvalidBitDepth(9))));
        assert_eq!(BitDepth::all().count(), 8);
    }

    #[test]
    fn output_name_strips_directories() {
        let depth = BitDepth::MIN;
        let nested = HiddenPayload::new("../../etc/passwd", Vec::new(), depth).unwrap();
        assert_eq!(nested.output_name(), "extracted_passwd");

        let empty = HiddenPayload::new("", Vec::new(), depth).unwrap();
        assert_eq!(empty.output_name(), "extracted_payload.bin");
    }
}

/// 隐藏数据开头的魔数，用于判断图像中是否存在隐藏文件。
pub const MAGIC: &[u8; 13] = b"steganography";

/// 以 1 bit 深度写入的前导字节数 (魔数 + 位深度字节)。
pub const PREAMBLE_BYTES: usize = MAGIC.len() + 1;

/// 前导部分占用的通道数。每个通道只存储 1 bit，因此为 14 * 8 = 112。
pub const PREAMBLE_CHANNELS: usize = PREAMBLE_BYTES * 8;

/// 每个像素的通道数 (R, G, B, A)。
pub const CHANNELS_PER_PIXEL: usize = 4;

/// 文件名长度字段与负载长度字段的字节数之和 (1 + 4)。
/// 不包括文件名本身，文件名长度可变。
pub const LENGTH_FIELDS_BYTES: usize = 1 + 4;

/// 头部固定部分的总字节数: 13 (魔数) + 1 (位深度) + 1 (文件名长度) + 4 (负载长度)。
pub const FIXED_HEADER_BYTES: usize = PREAMBLE_BYTES + LENGTH_FIELDS_BYTES;

/// 文件名允许的最大字节数，由单字节长度字段决定。
pub const MAX_FILENAME_LEN: usize = u8::MAX as usize;

/// 隐写后图像默认文件名的前缀。
pub const STEG_IMAGE_PREFIX: &str = "steg_";

/// 提取出的文件默认文件名的前缀。
pub const EXTRACTED_PREFIX: &str = "extracted_";

/// 隐藏文件名无法使用时的后备名称。
pub const FALLBACK_FILENAME: &str = "payload.bin";

/// 没有对应 [`crate::error::StegoError`] 的失败所使用的退出码。
pub const OTHER_FAILURE_EXIT_CODE: u8 = 1;

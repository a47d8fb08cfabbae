//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`extract` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::capacity::{capacities, smallest_fitting_depth};
use crate::channels::ChannelStream;
use crate::cli::{CapacityArgs, ExtractArgs, HideArgs};
use crate::constants::{OTHER_FAILURE_EXIT_CODE, STEG_IMAGE_PREFIX};
use crate::error::StegoError;
use crate::payload::{BitDepth, HiddenPayload};
use crate::steganography::{pack, unpack};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和要隐藏的文件、选择位深度、调用隐写核心函数写入数据，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和位深度的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文件。
/// * 文件名超过 255 字节。
/// * 图像在所选位深度下没有足够的空间。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let mut stream = ChannelStream::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let data = fs::read(&args.file).map_err(StegoError::from).with_context(|| {
        format!(
            "Unable to read file to hide: {}",
            args.file.to_string_lossy().red().bold()
        )
    })?;

    let filename = embedded_name(&args.file);

    let depth = match args.depth {
        Some(depth) => BitDepth::try_from(depth)?,
        // 所有位深度都放不下时，用最大位深度尝试，由 pack 报告容量错误
        None => smallest_fitting_depth(stream.num_pixels(), filename.len(), data.len())
            .unwrap_or(BitDepth::MAX),
    };

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_steg_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let payload = HiddenPayload::new(filename, data, depth).with_context(|| {
        format!(
            "Unable to hide {}",
            args.file.to_string_lossy().red().bold()
        )
    })?;

    let used = pack(&payload, &mut stream).with_context(|| {
        format!(
            "Not enough space in the image to hide the file at bit depth {}. \nRun the {} command to see what fits.",
            depth.to_string().red().bold(),
            "capacity".green().bold()
        )
    })?;

    stream.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The file has been successfully hidden with {} bit(s) per channel ({} of {} channels used) and saved: {}",
        depth.to_string().green().bold(),
        used,
        stream.len(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用提取核心函数恢复隐藏的文件，
/// 最后以 `extracted_<原文件名>` 为名写入输出目录。
///
/// # Arguments
///
/// * `args` - 包含输入图像和输出目录的 `ExtractArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有隐藏文件，或数据已损坏。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标文件。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    let stream = ChannelStream::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let payload = unpack(&stream).with_context(|| {
        format!(
            "Failed to extract a hidden file from '{}'. \nThe image may not contain a hidden file or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let out_dir = args.out_dir.unwrap_or_else(|| PathBuf::from("."));
    let dest = out_dir.join(payload.output_name());
    ensure_writable(&dest, args.force)?;

    fs::write(&dest, payload.data()).map_err(StegoError::from).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The hidden file has been successfully extracted ({} bytes) and saved: {}",
        payload.data().len(),
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 打印图像在每种位深度下能隐藏的最大文件大小。
///
/// # Errors
///
/// 无法读取输入的图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let stream = ChannelStream::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "Capacities for image {} ({}x{}):",
        args.image.to_string_lossy().green().bold(),
        stream.width(),
        stream.height()
    );

    let caps = capacities(stream.num_pixels(), usize::from(args.filename_len));
    for (depth, capacity) in BitDepth::all().zip(caps) {
        let formatted = format_capacity(capacity);
        let formatted = if capacity > 0 {
            formatted.green().bold()
        } else {
            formatted.red().bold()
        };
        println!("    - {} bit(s) per channel: {}", depth, formatted);
    }
    Ok(())
}

/// 将容量格式化为便于阅读的字符串 (B / kB / MB)。
pub fn format_capacity(bytes: i64) -> String {
    if bytes <= 0 {
        return "too small".to_string();
    }
    if bytes < 10 * 1024 {
        return format!("{bytes} B");
    }
    let kilobytes = bytes / 1024;
    if kilobytes < 10 * 1024 {
        return format!("{kilobytes} kB");
    }
    format!("{} MB", kilobytes / 1024)
}

/// 根据错误链中的 [`StegoError`] 决定命令行的退出码，找不到时为 1。
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StegoError>())
        .map_or(OTHER_FAILURE_EXIT_CODE, StegoError::exit_code)
}

/// 写入图像的文件名: 路径的最后一个组件。
///
/// Unix 上保留原始字节；其他平台上非 UTF-8 的部分会被替换为 U+FFFD。
fn embedded_name(path: &Path) -> Vec<u8> {
    let Some(name) = path.file_name() else {
        return Vec::new();
    };
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        name.as_bytes().to_vec()
    }
    #[cfg(not(unix))]
    {
        name.to_string_lossy().into_owned().into_bytes()
    }
}

/// 默认输出路径: 与输入图像同目录的 `steg_<名称>.png`。
fn default_steg_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    image.with_file_name(format!("{STEG_IMAGE_PREFIX}{stem}.png"))
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse {} to overwrite it.",
        dest.to_string_lossy().red().bold(),
        "--force".green().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_formatted_in_readable_units() {
        assert_eq!(format_capacity(-3), "too small");
        assert_eq!(format_capacity(0), "too small");
        assert_eq!(format_capacity(512), "512 B");
        assert_eq!(format_capacity(20 * 1024), "20 kB");
        assert_eq!(format_capacity(30 * 1024 * 1024), "30 MB");
    }

    #[test]
    fn embedded_name_is_the_last_component() {
        assert_eq!(embedded_name(Path::new("dir/sub/a.txt")), b"a.txt");
        assert!(embedded_name(Path::new("/")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn embedded_name_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = b"caf\xe9.txt";
        let path = Path::new(OsStr::from_bytes(raw));
        assert_eq!(embedded_name(path), raw.to_vec());
    }

    #[test]
    fn default_path_sits_next_to_the_image() {
        assert_eq!(
            default_steg_path(Path::new("pics/cat.bmp")),
            PathBuf::from("pics/steg_cat.png")
        );
    }
}

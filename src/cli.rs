//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或提取任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或提取任意文件。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、extract (提取) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏一个文件。
    Hide(HideArgs),

    /// 从经过隐写的图像中提取隐藏的文件。
    Extract(ExtractArgs),

    /// 显示图像在每种位深度 (1-8) 下能隐藏的最大文件大小。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径。
    #[arg(short, long)]
    pub file: PathBuf,

    /// 每个通道使用的最低位数 (1-8)。省略时自动选择能容纳文件的最小值。
    #[arg(short = 'b', long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub depth: Option<u8>,

    /// 保存结果图像的输出路径。默认为输入图像同目录下的 `steg_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 已隐藏文件的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存提取文件的目录。默认为当前目录。
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要计算容量的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 计算时假定的文件名长度 (字节)。
    #[arg(short = 'n', long, default_value_t = 0)]
    pub filename_len: u8,
}

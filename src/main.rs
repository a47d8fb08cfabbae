use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use lsb_stash::{
    cli::{Cli, Commands},
    handler::{exit_code, handle_capacity, handle_extract, handle_hide},
};

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令（`hide`、`extract` 或 `capacity`）
/// 将执行分派到相应的处理函数，失败时按错误种类返回不同的退出码
fn main() -> ExitCode {
    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    let result = match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Extract(args) => handle_extract(args),
        Commands::Capacity(args) => handle_capacity(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}

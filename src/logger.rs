//! 日志初始化
//!
//! 基于 `tracing-subscriber`，默认级别 info，可通过 `RUST_LOG` 覆盖。
//! 日志写到 stderr，标准输出只留给测验界面

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志（默认 info 级别）
pub fn init() {
    init_with_verbose(false);
}

/// 初始化全局日志
///
/// `verbose` 为 true 时默认级别提升为 debug
pub fn init_with_verbose(verbose: bool) {
    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

// ==========================================
// 裁缝店业务管理系统 - 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 日志写 stderr，stdout 留给命令输出
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// RUST_LOG 未设置时的过滤器
pub const DEFAULT_FILTER: &str = "info";

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读（终端）
    #[default]
    Pretty,
    /// JSON 行（日志采集）
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 按指定格式初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=tailor_shop::importer=debug 可查看逐行对账日志
///
/// # 示例
/// ```no_run
/// use tailor_shop::logging::{self, LogFormat};
/// logging::init_with(LogFormat::Json);
/// ```
pub fn init_with(format: LogFormat) {
    match format {
        LogFormat::Pretty => fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter())
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// 初始化测试环境的日志系统
///
/// 重复调用安全；使用 debug 级别便于查看逐行跳过原因
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

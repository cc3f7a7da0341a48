// ==========================================
// 车队投运决策系统 - 日志系统初始化
// ==========================================
// 工具: tracing + tracing-subscriber
// 环境变量:
// - RUST_LOG: 过滤器（默认 info）
// - FLEET_INDUCTION_LOG_FORMAT: text（默认）/ json
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 从环境变量读取,未知取值按 Text 处理
    pub fn from_env() -> Self {
        match std::env::var("FLEET_INDUCTION_LOG_FORMAT") {
            Ok(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统
///
/// # 示例
/// ```no_run
/// use fleet_induction::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_format(LogFormat::from_env());
}

/// 按指定格式初始化 (重复初始化时忽略)
pub fn init_with_format(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(default_filter())
        .with_target(true)
        .with_line_number(true);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
}

/// 初始化测试环境的日志系统
///
/// debug 级别,输出走测试捕获
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("fleet_induction=debug"))
        .with_test_writer()
        .try_init();
}

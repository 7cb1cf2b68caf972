//! 日志初始化
//!
//! 级别由 RUST_LOG 控制，未设置时为 info。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 安装全局日志订阅者，重复调用时返回错误而不 panic
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_line_number(true))
        .with(env_filter())
        .try_init()
}

/// 测试用：输出交给测试框架捕获，可多次调用
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(env_filter())
        .try_init();
}

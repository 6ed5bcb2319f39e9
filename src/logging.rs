// 日志模块
// fern 调度器：时间戳、等级、来源，输出到标准输出

use anyhow::Context;
use log::LevelFilter;

/// 安装全局日志器；由嵌入方在启动时调用一次
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
        .context("failed to install logger")?;
    Ok(())
}

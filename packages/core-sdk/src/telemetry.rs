use std::{fs::OpenOptions, io::Write, path::PathBuf};

use anyhow::Result;
use once_cell::sync::Lazy;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

static TELEMETRY_ENABLED: Lazy<std::sync::RwLock<bool>> =
    Lazy::new(|| std::sync::RwLock::new(false));

/**
 * \brief 更新文件日志开关状态。
 */
pub fn set_enabled(enabled: bool) {
    if let Ok(mut guard) = TELEMETRY_ENABLED.write() {
        *guard = enabled;
    }
}

/**
 * \brief 查询当前文件日志开关状态。
 */
pub fn is_enabled() -> bool {
    TELEMETRY_ENABLED.read().map(|g| *g).unwrap_or(false)
}

/**
 * \brief 记录常规事件。
 */
pub fn log_event(category: &str, message: &str) {
    emit("INFO", category, message);
}

pub fn log_warn(category: &str, message: &str) {
    emit("WARN", category, message);
}

/**
 * \brief 记录错误事件。
 */
pub fn log_error(category: &str, message: &str) {
    emit("ERROR", category, message);
}

/**
 * \brief 所有事件都输出到 stderr；开启后额外追加到 logs/nftjudge.log。
 */
fn emit(level: &str, category: &str, message: &str) {
    let line = match format_line(level, category, message) {
        Ok(line) => line,
        Err(err) => {
            eprintln!("telemetry format failed: {}", err);
            return;
        }
    };
    eprintln!("{}", line);
    if !is_enabled() {
        return;
    }
    if let Err(err) = write_line(&line) {
        eprintln!("telemetry write failed: {}", err);
    }
}

fn format_line(level: &str, category: &str, message: &str) -> Result<String> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
    Ok(format!("{} [{}] {} - {}", timestamp, level, category, message))
}

fn write_line(line: &str) -> Result<()> {
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("nftjudge.log"))?;
    writeln!(file, "{}", line)?;
    Ok(())
}

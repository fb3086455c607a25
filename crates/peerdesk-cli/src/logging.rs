use std::path::Path;

// Rotate log file if it exceeds 5 MB
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Log to stderr and to `log_path`, rotating the file to `.old` once it grows past 5 MB.
pub fn init(log_path: &Path, level: log::LevelFilter) -> Result<(), String> {
    if let Some(dir) = log_path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }

    if let Ok(meta) = std::fs::metadata(log_path) {
        if meta.len() > MAX_LOG_SIZE {
            let _ = std::fs::rename(log_path, log_path.with_extension("log.old"));
        }
    }

    let file_logger = fern::log_file(log_path)
        .map_err(|e| format!("Failed to create log file {}: {}", log_path.display(), e))?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .chain(file_logger)
        .apply()
        .map_err(|e| format!("Failed to initialize logger: {}", e))
}

//! Logging setup. The interactive browser owns the terminal, so diagnostics go to a log
//! file there (cache dir, or the temp dir as fallback); one-shot commands log to stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;

const LOG_FILE: &str = "achievement-explorer.log";

pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join(crate::config::APP_DIR_NAME))
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE)
}

fn open_log_file(path: &PathBuf) -> Option<std::fs::File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .or_else(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(std::env::temp_dir().join(LOG_FILE))
        })
        .ok()
}

/// Initialise the global logger. `RUST_LOG` wins over the `info` default.
/// Returns the file being written to, if any.
pub fn init(interactive: bool, log_file: Option<PathBuf>) -> Option<PathBuf> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // Keep our noise, drop the HTTP stack's.
    builder.filter_module("hyper", log::LevelFilter::Warn);
    builder.filter_module("reqwest", log::LevelFilter::Warn);

    let target_path = match (interactive, log_file) {
        (_, Some(path)) => Some(path),
        (true, None) => Some(default_log_path()),
        (false, None) => None,
    };

    let written_to = match target_path.as_ref().and_then(open_log_file) {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            target_path
        }
        None if interactive => {
            // Nowhere safe to write; stay silent rather than scribble over the UI.
            builder.filter_level(log::LevelFilter::Off);
            None
        }
        None => None,
    };

    let _ = builder.try_init();
    written_to
}

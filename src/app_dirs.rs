use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory the log file is written to. Never the terminal: the tui owns it.
    pub fn log_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local").join("state").join("paper")
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "paper") {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            std::env::temp_dir().join("paper")
        }
    }

    pub fn log_file_name() -> &'static str {
        "paper.log"
    }
}

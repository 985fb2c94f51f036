//! Per-user data paths: `<base>/<studio>/<project_id>/...`.

use std::path::PathBuf;

/// Context for managing application paths based on studio/project/app structure.
#[derive(Debug, Clone)]
pub struct PathContext {
    base_path: PathBuf,
    studio: String,
    project_id: String,
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext rooted in the platform data directory.
    ///
    /// Falls back to the current directory when the platform has no data directory.
    #[cfg_attr(debug_assertions, allow(dead_code))]
    pub fn new(
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        let base_path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_base_path(base_path, studio, project_id, app_id)
    }

    /// Creates a PathContext with an explicit base path (development builds and tests).
    pub fn with_base_path(
        base_path: PathBuf,
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        Self {
            base_path,
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    /// Returns the project root path: `<base>/<studio>/<project_id>`
    pub fn project_root(&self) -> PathBuf {
        self.base_path.join(&self.studio).join(&self.project_id)
    }

    /// Returns the logs directory path: `<studio>/<project_id>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.project_root().join("logs")
    }

    /// Returns a log file path: `<studio>/<project_id>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    /// Returns a log file path with the current local timestamp.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures all directories the application writes to exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.project_root(), self.logs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

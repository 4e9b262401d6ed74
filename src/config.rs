//! Configuration management for docport.

use std::fs;
use std::path::PathBuf;

/// Environment variable naming the backend API base URL.
pub const API_ENDPOINT_ENV: &str = "DOCPORT_API_ENDPOINT";

/// Default backend endpoint when nothing is configured.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:3000/api";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the document management API.
    pub api_endpoint: String,
    /// Base data directory (draft + temporary file storage).
    pub data_dir: PathBuf,
    /// Request timeout in seconds.
    pub request_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to ~/Documents/docport/ for user data
        let data_dir = dirs::document_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("docport");

        Self {
            api_endpoint: std::env::var(API_ENDPOINT_ENV)
                .unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string()),
            data_dir,
            request_timeout: 30,
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory. Tilde is expanded.
    pub fn with_data_dir(data_dir: &str) -> Self {
        let path = shellexpand::tilde(data_dir);
        Self {
            data_dir: PathBuf::from(path.as_ref()),
            ..Default::default()
        }
    }

    /// Directory holding the staged upload (one slot).
    pub fn temp_file_dir(&self) -> PathBuf {
        self.data_dir.join("tmp")
    }

    /// Directory holding the serialized draft and its flags.
    pub fn session_dir(&self) -> PathBuf {
        self.data_dir.join("session")
    }

    /// Ensure all directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(self.temp_file_dir())?;
        fs::create_dir_all(self.session_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_and_session_dirs_under_data_dir() {
        let settings = Settings::with_data_dir("/tmp/docport-test");
        assert!(settings.temp_file_dir().starts_with(&settings.data_dir));
        assert!(settings.session_dir().starts_with(&settings.data_dir));
    }

    #[test]
    fn ensure_directories_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_str().unwrap());
        settings.ensure_directories().unwrap();
        assert!(settings.temp_file_dir().is_dir());
        assert!(settings.session_dir().is_dir());
    }
}

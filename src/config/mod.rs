// ── Settings ─────────────────────────────────────────────────────────────────
//
// Reads the optional `preload.json` next to the executable and applies the
// environment overrides.  No `unsafe`, pure safe Rust + serde_json.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    arch::{self, Architecture},
    error::{PreloadError, Result},
};

// ── Environment ──────────────────────────────────────────────────────────────

/// Overrides the location of the settings file.
pub const CONFIG_ENV: &str = "PRELOAD_CONFIG";

/// Overrides the install root from the settings file.
pub const ROOT_ENV: &str = "PRELOAD_ROOT";

/// File name looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "preload.json";

/// Identifier used for failure records when none is configured.
pub const DEFAULT_APP_NAME: &str = "native-preload";

// ── On-disk type ─────────────────────────────────────────────────────────────

/// Root of the JSON settings file.  Every field is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Install root; the architecture directory is resolved beneath it.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Application identifier attached to failure records.
    #[serde(default)]
    pub app_name: Option<String>,
    /// `tracing` filter directive, e.g. `"native_preload=debug"`.
    #[serde(default)]
    pub log_filter: Option<String>,
}

// ── Resolved settings ────────────────────────────────────────────────────────

/// Settings after file, environment and defaults have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub app_name: String,
    pub log_filter: Option<String>,
}

impl Settings {
    /// Load settings for the running process.
    ///
    /// A missing settings file means defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let exe_dir = exe_dir()?;
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| exe_dir.join(CONFIG_FILE_NAME));

        let file = read_file(&path)?.unwrap_or_default();
        Self::merge(file, std::env::var_os(ROOT_ENV), &exe_dir)
    }

    /// Merge the sources.  Root precedence: `env_root`, then the file, then
    /// `exe_dir`.
    pub fn merge(file: SettingsFile, env_root: Option<OsString>, exe_dir: &Path) -> Result<Self> {
        let root = env_root
            .map(PathBuf::from)
            .or(file.root)
            .unwrap_or_else(|| exe_dir.to_path_buf());
        validate_root(&root)?;

        Ok(Self {
            root,
            app_name: file
                .app_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_owned()),
            log_filter: file.log_filter,
        })
    }

    /// Directory holding this process's libraries.
    pub fn library_directory(&self) -> PathBuf {
        arch::resolve(&self.root, Architecture::current())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn validate_root(root: &Path) -> Result<()> {
    if root.as_os_str().is_empty() || !root.is_absolute() {
        return Err(PreloadError::InvalidRoot(root.to_path_buf()));
    }
    Ok(())
}

fn exe_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        PreloadError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })
}

/// Parse the settings file, or `None` if it does not exist.
fn read_file(path: &Path) -> Result<Option<SettingsFile>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| PreloadError::Config { path: path.to_path_buf(), message: e.to_string() })
}

// ── Tests ────────────────────────────────────────────────────────────────────

// ── Central error type ───────────────────────────────────────────────────────
//
// All fallible operations return `error::Result<T>`.  Nothing in the library
// exits the process; the entry point decides to log and exit(1).

use std::path::PathBuf;

/// Every error that a preload pass can produce.
#[derive(Debug)]
pub enum PreloadError {
    /// A library file could not be loaded into the process.
    ///
    /// Not-found, bad image format, missing dependency and architecture
    /// mismatch all collapse into this one kind; `reason` is the OS message.
    LibraryLoad {
        /// File name of the library that failed.
        file: String,
        /// Directory the library was loaded from.
        directory: PathBuf,
        reason: String,
    },

    /// The library directory could not be listed.
    ReadDir {
        directory: PathBuf,
        source: std::io::Error,
    },

    /// A search-path OS call returned a failure code.
    Os {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw OS error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// The configured root path is empty or relative.
    InvalidRoot(PathBuf),

    /// The settings file exists but could not be parsed.
    Config { path: PathBuf, message: String },

    /// A standard I/O error (settings file read, executable lookup, …).
    Io(std::io::Error),
}

impl std::fmt::Display for PreloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LibraryLoad { file, directory, reason } => {
                write!(
                    f,
                    "failed to load library {file} from {}: {reason}",
                    directory.display()
                )
            }
            Self::ReadDir { directory, source } => {
                write!(f, "cannot list library directory {}: {source}", directory.display())
            }
            Self::Os { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::InvalidRoot(root) => {
                write!(f, "root path {root:?} must be a non-empty absolute path")
            }
            Self::Config { path, message } => {
                write!(f, "invalid settings file {}: {message}", path.display())
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for PreloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadDir { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::LibraryLoad { .. }
            | Self::Os { .. }
            | Self::InvalidRoot(_)
            | Self::Config { .. } => None,
        }
    }
}

impl From<std::io::Error> for PreloadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PreloadError>;

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_load_names_file_and_directory() {
        let e = PreloadError::LibraryLoad {
            file: "libssl.so".to_owned(),
            directory: PathBuf::from("/opt/app/OpenSSL_64"),
            reason: "invalid ELF header".to_owned(),
        };
        assert_eq!(
            e.to_string(),
            "failed to load library libssl.so from /opt/app/OpenSSL_64: invalid ELF header"
        );
    }

    #[test]
    fn os_error_formats_code_as_hex() {
        let e = PreloadError::Os { function: "SetDllDirectoryW", code: 0x57 };
        assert_eq!(e.to_string(), "SetDllDirectoryW failed (error 0x00000057)");
    }

    #[test]
    fn read_dir_exposes_io_source() {
        use std::error::Error as _;
        let e = PreloadError::ReadDir {
            directory: PathBuf::from("/missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(e.source().is_some());
    }
}

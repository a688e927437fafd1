// ── Architecture-specific library directory ──────────────────────────────────
//
// Pure Rust; no I/O.  The process architecture is fixed at compile time.

use std::path::{Path, PathBuf};

/// Pointer width of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    /// 32-bit process.
    X86,
    /// 64-bit process.
    X64,
}

impl Architecture {
    /// Architecture this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::X64
        } else {
            Self::X86
        }
    }

    /// Name of the directory under the install root holding this
    /// architecture's libraries.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::X86 => "OpenSSL_32",
            Self::X64 => "OpenSSL_64",
        }
    }
}

/// Directory to scan for `arch` under `root`.
///
/// A trailing separator on `root` is optional: `/opt/app/` and `/opt/app`
/// both give `/opt/app/OpenSSL_64`.
pub fn resolve(root: &Path, arch: Architecture) -> PathBuf {
    root.join(arch.dir_name())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_names() {
        assert_eq!(Architecture::X86.dir_name(), "OpenSSL_32");
        assert_eq!(Architecture::X64.dir_name(), "OpenSSL_64");
    }

    #[cfg(unix)]
    #[test]
    fn resolve_with_trailing_separator() {
        let dir = resolve(Path::new("/opt/app/"), Architecture::X64);
        assert_eq!(dir, PathBuf::from("/opt/app/OpenSSL_64"));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_without_trailing_separator() {
        let dir = resolve(Path::new("/opt/app"), Architecture::X86);
        assert_eq!(dir, PathBuf::from("/opt/app/OpenSSL_32"));
    }

    #[cfg(windows)]
    #[test]
    fn resolve_windows_root() {
        let dir = resolve(Path::new(r"C:\Program Files\App\"), Architecture::X86);
        assert_eq!(dir, PathBuf::from(r"C:\Program Files\App\OpenSSL_32"));
    }

    #[test]
    fn current_matches_pointer_width() {
        let expected = if std::mem::size_of::<usize>() == 8 {
            Architecture::X64
        } else {
            Architecture::X86
        };
        assert_eq!(Architecture::current(), expected);
    }
}

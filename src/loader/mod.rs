// ── Library directory loader ─────────────────────────────────────────────────
//
// Loads every dynamic library found directly inside one directory.
//
// ── Search-path model ────────────────────────────────────────────────────────
//
// Files are loaded by their full path.  The OS search-path override (a single
// process-wide slot on Windows) is still pointed at the directory for the
// duration of the pass so that a library's own dependencies resolve from the
// same directory.  The slot is not reentrant, so every pass holds
// `SEARCH_PATH_LOCK`, and `SearchPathOverride` puts the previous value back
// on every exit path.
//
// No `unsafe` here; the OS calls live behind `NativeLoader` in `platform`.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::error::{PreloadError, Result};

// ── Platform library extension ───────────────────────────────────────────────

/// File extension of a dynamic library on the target platform.
#[cfg(windows)]
pub const LIBRARY_EXTENSION: &str = "dll";
#[cfg(target_os = "macos")]
pub const LIBRARY_EXTENSION: &str = "dylib";
#[cfg(not(any(windows, target_os = "macos")))]
pub const LIBRARY_EXTENSION: &str = "so";

/// Serialises passes that touch the search-path slot.
static SEARCH_PATH_LOCK: Mutex<()> = Mutex::new(());

// ── OS seam ──────────────────────────────────────────────────────────────────

/// The two OS primitives a load pass needs.
///
/// `SystemLoader` in `platform` is the real implementation; tests substitute
/// a recording fake.
pub trait NativeLoader {
    /// Current value of the process-wide search-path override, if any.
    fn search_directory(&self) -> Result<Option<PathBuf>>;

    /// Replace the override.  `None` restores the OS default search order.
    fn set_search_directory(&self, dir: Option<&Path>) -> Result<()>;

    /// Load the library at `path` into the current process.
    ///
    /// The error string is the OS diagnostic and only ends up in logs.
    fn load(&self, path: &Path) -> std::result::Result<LibraryHandle, String>;
}

impl<L: NativeLoader + ?Sized> NativeLoader for &L {
    fn search_directory(&self) -> Result<Option<PathBuf>> {
        (**self).search_directory()
    }

    fn set_search_directory(&self, dir: Option<&Path>) -> Result<()> {
        (**self).set_search_directory(dir)
    }

    fn load(&self, path: &Path) -> std::result::Result<LibraryHandle, String> {
        (**self).load(path)
    }
}

/// Opaque handle to a library that stays resident for the life of the process.
///
/// Dropping a `LibraryHandle` does not unload anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryHandle {
    path: PathBuf,
    raw: usize,
}

impl LibraryHandle {
    /// Wrap a raw module handle (`HMODULE` or `dlopen` result).
    pub fn from_raw(path: PathBuf, raw: usize) -> Self {
        Self { path, raw }
    }

    /// Full path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn raw(&self) -> usize {
        self.raw
    }
}

/// Outcome of loading a single file.
pub type LoadResult = Result<LibraryHandle>;

// ── SearchPathOverride ───────────────────────────────────────────────────────

/// RAII guard over the search-path slot.
///
/// `push` remembers the previous value; `restore` (or `Drop`, on early
/// return) writes it back.
struct SearchPathOverride<'a, L: NativeLoader + ?Sized> {
    loader: &'a L,
    previous: Option<PathBuf>,
    restored: bool,
}

impl<'a, L: NativeLoader + ?Sized> SearchPathOverride<'a, L> {
    fn push(loader: &'a L, dir: &Path) -> Result<Self> {
        let previous = loader.search_directory()?;
        loader.set_search_directory(Some(dir))?;
        Ok(Self { loader, previous, restored: false })
    }

    fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.loader.set_search_directory(self.previous.as_deref())
    }
}

impl<L: NativeLoader + ?Sized> Drop for SearchPathOverride<'_, L> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.loader.set_search_directory(self.previous.as_deref()) {
            tracing::warn!(error = %e, "could not restore library search path");
        }
    }
}

// ── Enumeration ──────────────────────────────────────────────────────────────

/// True when `path` carries the platform's dynamic-library extension.
fn has_library_extension(path: &Path) -> bool {
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) if cfg!(windows) => ext.eq_ignore_ascii_case(LIBRARY_EXTENSION),
        Some(ext) => ext == LIBRARY_EXTENSION,
        None => false,
    }
}

/// True when the entry is, or links to, a directory.
///
/// A symlink whose target cannot be stat'ed is not a directory: it stays a
/// candidate so that loading it fails instead of the file going missing.
fn is_directory(entry: &fs::DirEntry) -> std::io::Result<bool> {
    let file_type = entry.file_type()?;
    if file_type.is_symlink() {
        return Ok(fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()));
    }
    Ok(file_type.is_dir())
}

/// Library files directly inside `dir`, sorted by file name.
///
/// Not recursive.  Every entry with the library extension that is not a
/// directory is returned, dangling symlinks included.
pub fn library_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err =
        |source: std::io::Error| PreloadError::ReadDir { directory: dir.to_path_buf(), source };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if has_library_extension(&path) && !is_directory(&entry).map_err(read_err)? {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

// ── LibraryDirectoryLoader ───────────────────────────────────────────────────

/// Loads every library in a directory, stopping at the first failure.
pub struct LibraryDirectoryLoader<L> {
    loader: L,
}

impl<L: NativeLoader> LibraryDirectoryLoader<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &L {
        &self.loader
    }

    /// Load every library file in `directory` into the process.
    ///
    /// Returns the handles in load order.  On the first file that fails to
    /// load, no further files are attempted and `PreloadError::LibraryLoad`
    /// is returned.  The search-path override is restored either way.
    pub fn load_all(&self, directory: &Path) -> Result<Vec<LibraryHandle>> {
        let _lock = SEARCH_PATH_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let guard = SearchPathOverride::push(&self.loader, directory)?;
        let files = library_files(directory)?;
        tracing::debug!(
            directory = %directory.display(),
            count = files.len(),
            "found native libraries"
        );

        let mut loaded = Vec::with_capacity(files.len());
        for path in &files {
            let handle = self.load_one(directory, path)?;
            tracing::debug!(library = %path.display(), "loaded");
            loaded.push(handle);
        }

        guard.restore()?;
        Ok(loaded)
    }

    fn load_one(&self, directory: &Path, path: &Path) -> LoadResult {
        self.loader.load(path).map_err(|reason| PreloadError::LibraryLoad {
            file: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            directory: directory.to_path_buf(),
            reason,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

// ── Unix backend (dlopen) ────────────────────────────────────────────────────
//
// One of the two modules in the crate where `unsafe` is permitted (the other
// is `platform::win32`).  Every `unsafe` block MUST carry a `// SAFETY:`
// comment.
//
// The dynamic linker reads its search path once, at process start, so there
// is no override slot to move: `search_directory` always reports `None` and
// setting it is a no-op.  Libraries are opened by full path with
// `RTLD_GLOBAL` so that a later library in the same directory can bind to
// symbols of an earlier one.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_NOW};

use crate::{
    error::Result,
    loader::{LibraryHandle, NativeLoader},
};

/// `NativeLoader` backed by `dlopen`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

impl NativeLoader for SystemLoader {
    fn search_directory(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    fn set_search_directory(&self, _dir: Option<&Path>) -> Result<()> {
        Ok(())
    }

    fn load(&self, path: &Path) -> std::result::Result<LibraryHandle, String> {
        // SAFETY: opening a library runs its initialisers.  The directory is
        // the application's own install location, whose contents are trusted
        // to the same degree as the executable itself.
        let lib = unsafe { Library::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }
            .map_err(|e| e.to_string())?;
        // Leak the handle: the library must stay mapped for the life of the
        // process, and `Library::drop` would `dlclose` it.
        let raw = lib.into_raw();
        Ok(LibraryHandle::from_raw(path.to_path_buf(), raw as usize))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

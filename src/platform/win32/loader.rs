// ── Win32 library loading ────────────────────────────────────────────────────
//
// `SetDllDirectoryW` is the single-slot search-path override: it replaces,
// it does not stack.  `GetDllDirectoryW` reads the current value so the
// loader can put it back.
//
// Libraries are loaded with `LoadLibraryW` on their full path.  While the
// override points at the same directory, their own imports (e.g. libssl's
// dependency on libcrypto) resolve from there too.  Modules are never passed
// to `FreeLibrary`; they stay resident for the life of the process.

#![allow(unsafe_code)]

use std::{
    ffi::OsString,
    os::windows::ffi::OsStringExt,
    path::{Path, PathBuf},
};

use windows::{
    core::PCWSTR,
    Win32::System::LibraryLoader::{GetDllDirectoryW, LoadLibraryW, SetDllDirectoryW},
};

use super::to_wide;
use crate::{
    error::{PreloadError, Result},
    loader::{LibraryHandle, NativeLoader},
};

/// `NativeLoader` backed by the Win32 library loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

impl NativeLoader for SystemLoader {
    fn search_directory(&self) -> Result<Option<PathBuf>> {
        // SAFETY: a `None` buffer asks only for the required length
        // (including the terminator); nothing is written.
        let needed = unsafe { GetDllDirectoryW(None) };
        if needed == 0 {
            return Ok(None);
        }

        let mut buf = vec![0u16; needed as usize];
        // SAFETY: buf is `needed` u16s long, which GetDllDirectoryW just
        // reported as sufficient.  The slice length is passed alongside.
        let len = unsafe { GetDllDirectoryW(Some(&mut buf)) } as usize;
        if len == 0 || len >= buf.len() {
            // Cleared, or grown by another caller between the two calls.
            return Ok(None);
        }
        buf.truncate(len);
        Ok(Some(PathBuf::from(OsString::from_wide(&buf))))
    }

    fn set_search_directory(&self, dir: Option<&Path>) -> Result<()> {
        let wide = dir.map(|d| to_wide(d.as_os_str()));
        let arg = wide
            .as_ref()
            .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()));
        // SAFETY: arg is either null (restore default search order) or a
        // null-terminated UTF-16 string that outlives the call.
        unsafe { SetDllDirectoryW(arg) }.map_err(|e| PreloadError::Os {
            function: "SetDllDirectoryW",
            code: e.code().0 as u32,
        })
    }

    fn load(&self, path: &Path) -> std::result::Result<LibraryHandle, String> {
        let wide = to_wide(path.as_os_str());
        // SAFETY: wide is a valid null-terminated UTF-16 path.  Loading runs
        // DllMain of the library, which lives in the application's own
        // install directory.
        let module = unsafe { LoadLibraryW(PCWSTR(wide.as_ptr())) }.map_err(|e| e.to_string())?;
        Ok(LibraryHandle::from_raw(path.to_path_buf(), module.0 as usize))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::loader::LibraryDirectoryLoader;

    #[test]
    #[serial]
    fn override_roundtrips_through_the_os() {
        let tmp = tempfile::tempdir().unwrap();
        let before = SystemLoader.search_directory().unwrap();

        SystemLoader.set_search_directory(Some(tmp.path())).unwrap();
        assert_eq!(SystemLoader.search_directory().unwrap().as_deref(), Some(tmp.path()));

        SystemLoader.set_search_directory(before.as_deref()).unwrap();
        assert_eq!(SystemLoader.search_directory().unwrap(), before);
    }

    #[test]
    #[serial]
    fn broken_dll_fails_and_restores_override() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("broken.dll"), b"MZ but not really").unwrap();
        let before = SystemLoader.search_directory().unwrap();

        let loader = LibraryDirectoryLoader::new(SystemLoader);
        assert!(matches!(
            loader.load_all(tmp.path()),
            Err(PreloadError::LibraryLoad { ref file, .. }) if file == "broken.dll"
        ));
        assert_eq!(SystemLoader.search_directory().unwrap(), before);
    }
}

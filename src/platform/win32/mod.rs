// ── Win32 backend ────────────────────────────────────────────────────────────
//
// One of the two modules in the crate where `unsafe` code is permitted (the
// other is `platform::unix`).  Every `unsafe` block MUST carry a `// SAFETY:`
// comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ──────────────────────────────────────────────────────────────

pub(crate) mod event_log; // failure records for the Windows Event Log
pub mod loader; // SetDllDirectoryW / LoadLibraryW

pub use loader::SystemLoader;

use std::{ffi::OsStr, iter, os::windows::ffi::OsStrExt};

/// Null-terminated UTF-16 copy of `s` for `PCWSTR` parameters.
pub(crate) fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(iter::once(0)).collect()
}

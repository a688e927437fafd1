//! Preloads an application's architecture-specific native libraries.
//!
//! A host calls [`startup::run`] as the first step of its startup sequence,
//! before any code that depends on the libraries.  Every library file in
//! `<root>/OpenSSL_32` or `<root>/OpenSSL_64` (chosen by the pointer width
//! of the process) is loaded and kept resident.  The first failure ends the
//! pass with an error.

// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except the per-OS backends under
// `platform`.  Each unsafe block in those modules MUST carry a `// SAFETY:`
// comment.
#![deny(unsafe_code)]

pub mod arch;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod platform;
pub mod startup;

pub use arch::Architecture;
pub use config::Settings;
pub use error::{PreloadError, Result};
pub use loader::{LibraryDirectoryLoader, LibraryHandle, NativeLoader};
pub use platform::SystemLoader;

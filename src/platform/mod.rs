// ── Platform abstraction layer ───────────────────────────────────────────────
//
// `SystemLoader` is the real `NativeLoader` for the target OS.  No `unsafe`
// lives here; all FFI is confined to the per-OS sub-modules and never leaks
// outward.

#[cfg(unix)]
pub mod unix;
#[cfg(windows)]
pub mod win32;

#[cfg(unix)]
pub use unix::SystemLoader;
#[cfg(windows)]
pub use win32::SystemLoader;

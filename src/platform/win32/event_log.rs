// Writes one error entry to the Windows Application event log.

#![allow(unsafe_code)]

use std::ffi::OsStr;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::PSID,
        System::EventLog::{
            DeregisterEventSource, RegisterEventSourceW, ReportEventW, EVENTLOG_ERROR_TYPE,
        },
    },
};

use super::to_wide;

/// Report `message` as an error event under the event source `source`.
///
/// The source does not need to be registered in the registry; unregistered
/// sources still log, with a generic description prefix.
pub(crate) fn report_error(source: &str, message: &str) -> windows::core::Result<()> {
    let source_w = to_wide(OsStr::new(source));
    let message_w = to_wide(OsStr::new(message));

    // SAFETY: null server name means the local machine; source_w is a valid
    // null-terminated UTF-16 string that outlives the call.
    let handle = unsafe { RegisterEventSourceW(PCWSTR::null(), PCWSTR(source_w.as_ptr())) }?;

    let strings = [PCWSTR(message_w.as_ptr())];
    // SAFETY: handle was just returned by RegisterEventSourceW.  `strings`
    // holds exactly one valid PCWSTR, matching wnumstrings = 1, and both it
    // and message_w outlive the call.  No raw data is attached.
    let result = unsafe {
        ReportEventW(
            handle,
            EVENTLOG_ERROR_TYPE,
            0,
            0,
            PSID::default(),
            1,
            0,
            Some(strings.as_ptr()),
            None,
        )
    };

    // SAFETY: handle is valid and is not used after this call.
    // Deregistration failure is intentionally ignored.
    unsafe {
        let _ = DeregisterEventSource(handle);
    }

    result
}

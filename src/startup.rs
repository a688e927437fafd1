// ── Startup step ─────────────────────────────────────────────────────────────
//
// The named step a host runs before anything that calls into the preloaded
// libraries.  Failure is fatal to startup: the step reports once and returns
// the error; the host exits.

use std::path::PathBuf;

use crate::{
    config::Settings,
    diagnostics::FailureSink,
    error::Result,
    loader::{LibraryDirectoryLoader, LibraryHandle, NativeLoader},
};

/// What a successful preload did.
#[derive(Debug)]
pub struct LoadReport {
    /// Directory that was scanned.
    pub directory: PathBuf,
    /// Libraries in load order.
    pub libraries: Vec<LibraryHandle>,
}

/// Preload every library in the architecture directory under
/// `settings.root`.
///
/// On error, exactly one record naming the cause is sent to `sink` before
/// the error is returned.
pub fn run<L, S>(settings: &Settings, loader: L, sink: &S) -> Result<LoadReport>
where
    L: NativeLoader,
    S: FailureSink + ?Sized,
{
    let directory = settings.library_directory();
    tracing::debug!(directory = %directory.display(), "preloading native libraries");

    match LibraryDirectoryLoader::new(loader).load_all(&directory) {
        Ok(libraries) => {
            tracing::info!(
                directory = %directory.display(),
                count = libraries.len(),
                "native libraries loaded"
            );
            Ok(LoadReport { directory, libraries })
        }
        Err(e) => {
            sink.report(&e.to_string());
            Err(e)
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        arch::Architecture,
        diagnostics::tests::RecordingSink,
        error::PreloadError,
        loader::tests::{lib, touch, FakeLoader},
    };

    fn settings_for(root: &std::path::Path) -> Settings {
        Settings {
            root: root.to_path_buf(),
            app_name: "test-app".to_owned(),
            log_filter: None,
        }
    }

    fn arch_dir(root: &std::path::Path) -> PathBuf {
        let dir = root.join(Architecture::current().dir_name());
        fs::create_dir(&dir).unwrap();
        dir
    }

    #[test]
    fn all_valid_libraries_load_without_records() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = arch_dir(tmp.path());
        touch(&dir, &lib("libcrypto"));
        touch(&dir, &lib("libssl"));

        let sink = RecordingSink::default();
        let report = run(&settings_for(tmp.path()), FakeLoader::default(), &sink).unwrap();

        assert_eq!(report.directory, dir);
        assert_eq!(report.libraries.len(), 2);
        assert!(sink.messages.borrow().is_empty());
    }

    #[test]
    fn failure_is_reported_exactly_once() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = arch_dir(tmp.path());
        touch(&dir, &lib("libcrypto"));
        touch(&dir, &lib("libssl"));

        let sink = RecordingSink::default();
        let err = run(
            &settings_for(tmp.path()),
            FakeLoader::failing_on(&lib("libcrypto")),
            &sink,
        )
        .unwrap_err();

        assert!(matches!(err, PreloadError::LibraryLoad { .. }));
        let messages = sink.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains(&lib("libcrypto")));
        assert!(messages[0].contains(&dir.display().to_string()));
    }

    #[test]
    fn missing_architecture_directory_is_reported() {
        let tmp = tempfile::tempdir().unwrap();

        let sink = RecordingSink::default();
        let err = run(&settings_for(tmp.path()), FakeLoader::default(), &sink).unwrap_err();

        assert!(matches!(err, PreloadError::ReadDir { .. }));
        assert_eq!(sink.messages.borrow().len(), 1);
    }
}

// ── Diagnostics ──────────────────────────────────────────────────────────────
//
// Logging setup and the sink that receives the single failure record of a
// failed preload.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `filter`; with neither set the level is
/// `info`.  Output goes to stderr and honours `NO_COLOR`.  A second call is
/// a no-op.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = match (std::env::var("RUST_LOG").is_ok(), filter) {
        (true, _) => EnvFilter::from_default_env(),
        (false, Some(f)) => EnvFilter::new(f),
        (false, None) => EnvFilter::new("info"),
    };

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(std::env::var_os("NO_COLOR").is_none()),
        )
        .with(env_filter)
        .try_init();
}

// ── Failure sink ─────────────────────────────────────────────────────────────

/// Receives the failure record of a startup step (severity: error).
pub trait FailureSink {
    fn report(&self, message: &str);
}

/// Logs through `tracing` and, on Windows, also to the Application event log.
///
/// `app_name` identifies the application in both outputs.
#[derive(Debug, Clone)]
pub struct SystemSink {
    app_name: String,
}

impl SystemSink {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self { app_name: app_name.into() }
    }
}

impl FailureSink for SystemSink {
    fn report(&self, message: &str) {
        tracing::error!(app = %self.app_name, "{message}");

        #[cfg(windows)]
        self.report_to_event_log(message);
    }
}

#[cfg(windows)]
impl SystemSink {
    fn report_to_event_log(&self, message: &str) {
        if let Err(e) = crate::platform::win32::event_log::report_error(&self.app_name, message) {
            tracing::warn!(error = %e, "could not write to the event log");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

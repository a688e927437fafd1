// Standalone entry point: runs the preload step and nothing else.  Exit
// status 1 means the application must not start.

use native_preload::{
    config::{Settings, DEFAULT_APP_NAME},
    diagnostics::{self, FailureSink, SystemSink},
    startup, SystemLoader,
};

fn main() {
    // ── Startup sequence ─────────────────────────────────────────────────────
    // 1. settings   2. logging   3. native libraries
    // Anything that calls into the preloaded libraries goes after step 3.
    let settings = Settings::load();
    diagnostics::init_logging(settings.as_ref().ok().and_then(|s| s.log_filter.as_deref()));

    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            SystemSink::new(DEFAULT_APP_NAME).report(&e.to_string());
            std::process::exit(1);
        }
    };

    let sink = SystemSink::new(settings.app_name.clone());
    if startup::run(&settings, SystemLoader, &sink).is_err() {
        // Already reported through the sink.
        std::process::exit(1);
    }
}

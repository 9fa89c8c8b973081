use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Default filter directive for a given verbosity
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "gamearchive=debug"
    } else if quiet {
        "gamearchive=warn"
    } else {
        "gamearchive=info"
    }
}

/// Install the global subscriber: stderr always, plus a daily rolling
/// file under `log_dir` when configured.
///
/// `RUST_LOG` overrides the verbosity flags. The returned guard must be
/// held until exit or buffered file lines are lost.
pub fn init(verbose: bool, quiet: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "gamearchive.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            let _ = tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
            None
        }
    }
}

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Filters for the subscriber. With `RUST_LOG` set it alone decides;
/// otherwise `verbose` picks debug or warn for this crate.
fn filters(verbose: bool, rust_log: Option<&str>) -> (Option<Targets>, EnvFilter) {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::WARN, "warn")
    };

    match rust_log.filter(|directives| !directives.trim().is_empty()) {
        Some(directives) => (
            None,
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(level)),
        ),
        None => {
            let app_filter = Targets::new()
                .with_target("tvldash", level_filter)
                .with_default(LevelFilter::WARN);
            (Some(app_filter), EnvFilter::new(level))
        }
    }
}

/// Installs the global subscriber. `--verbose` turns on debug output for this
/// crate; `RUST_LOG` takes over when set.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (app_filter, env_filter) = filters(verbose, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
        .init();
}

use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Maps the `-v`/`-q` flags to a level filter.
fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// HTTP stack crates whose debug output drowns the tool's own events.
const TRANSPORT_TARGETS: [&str; 4] = ["hyper", "hyper_util", "h2", "rustls"];

/// Filter directives used when `RUST_LOG` is unset.
///
/// The `isoscope` library and binary follow the flag-selected level; transport crates are
/// held at `info` at most.
fn default_directives(level: LevelFilter) -> String {
    let transport = level.min(LevelFilter::INFO);
    let mut directives = vec![
        level.to_string(),
        format!("isoscope={}", level),
    ];
    directives.extend(
        TRANSPORT_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, transport)),
    );
    directives.join(",")
}

fn build_filter(level_filter: LevelFilter) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(level_filter.into());
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) if !value.trim().is_empty() => builder.parse_lossy(value),
        _ => builder.parse_lossy(default_directives(level_filter)),
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let level_filter = level_for(verbosity, quiet);

    // `RUST_LOG` may narrow individual targets, but never above the flag-selected level.
    let env_filter = build_filter(level_filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter)
        .with(env_filter)
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn flags_map_to_expected_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(9, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }

    #[test]
    fn default_directives_cap_transport_crates_at_info() {
        assert_eq!(
            default_directives(LevelFilter::TRACE),
            "trace,isoscope=trace,hyper=info,hyper_util=info,h2=info,rustls=info"
        );
        assert_eq!(
            default_directives(LevelFilter::WARN),
            "warn,isoscope=warn,hyper=warn,hyper_util=warn,h2=warn,rustls=warn"
        );
        assert!(default_directives(LevelFilter::OFF).starts_with("off,isoscope=off"));
    }

    #[test]
    fn default_directives_parse_as_a_filter() {
        for level in [LevelFilter::OFF, LevelFilter::INFO, LevelFilter::TRACE] {
            assert!(EnvFilter::builder().parse(default_directives(level)).is_ok());
        }
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!(accession = "P38398", "This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn file_layer_writes_structured_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!(accession = "P04637", "Fetched prediction");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Fetched prediction"));
        assert!(content.contains("accession=\"P04637\""));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}

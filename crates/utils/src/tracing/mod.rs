use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (for example the
/// configured `log_filter`) is used. Output goes to stderr so stdout stays
/// free for command results.
pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one storage operation
pub fn operation_span(operation: &'static str) -> Span {
    span!(Level::DEBUG, "storage", operation = operation)
}

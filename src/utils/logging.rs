/// Initialize tracing/logging for the application.
///
/// Unknown level names fall back to `info`.
pub fn init(default_level: &str) {
    let lvl = parse_level(default_level);

    // a global subscriber may already be installed; keep the first one
    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(false)
        .try_init();
}

pub(crate) fn parse_level(name: &str) -> tracing::Level {
    match name.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}

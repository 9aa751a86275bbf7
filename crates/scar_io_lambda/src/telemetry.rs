use tracing_subscriber::EnvFilter;

const FALLBACK_DIRECTIVE: &str = "info";

/// Maps a `LOG_LEVEL` value to an `EnvFilter` directive.
///
/// Python-style level names are accepted (`WARNING`, `CRITICAL`); anything
/// else is passed through as a directive.
pub fn log_filter_directive(level: Option<&str>) -> String {
    let Some(level) = level.map(str::trim).filter(|level| !level.is_empty()) else {
        return FALLBACK_DIRECTIVE.to_string();
    };

    match level.to_ascii_uppercase().as_str() {
        "TRACE" => "trace".to_string(),
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARN" | "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" | "FATAL" => "error".to_string(),
        _ => level.to_string(),
    }
}

pub fn env_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_new(log_filter_directive(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Installs a JSON subscriber writing to stderr. Safe to call more than once.
pub fn init_logging(level: Option<&str>) {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

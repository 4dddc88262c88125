//! Logging utilities
//!
//! Subscriber setup plus small helpers used around external calls: timing,
//! truncated previews of long model output, and redaction of credentials.

use crate::{Result, ToolingError};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `default_filter` when it is set.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| ToolingError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ToolingError::Logging(e.to_string()))
}

/// Await `future` and log how long it took.
///
/// # Example
///
/// ```rust,ignore
/// let answer = timed("wolfram_alpha.query", client.query(q)).await?;
/// ```
pub async fn timed<F, T>(name: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = Instant::now();
    debug!("Starting: {}", name);

    let result = future.await;

    info!("Completed: {} in {}", name, format_duration(start.elapsed()));
    result
}

/// Format duration in human-readable form
///
/// ```rust
/// use tooling::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1000)
    } else if micros < 60_000_000 {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    } else {
        let seconds = micros / 1_000_000;
        format!("{}m{}s", seconds / 60, seconds % 60)
    }
}

/// First `max_chars` characters of `text` on one line, with an ellipsis and
/// total length when truncated.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', "\\n");
    let total = flat.chars().count();
    if total <= max_chars {
        return flat;
    }
    let head: String = flat.chars().take(max_chars).collect();
    format!("{}… ({} chars)", head, total)
}

/// Redact credentials from a string before it is logged.
///
/// ```rust
/// use tooling::logging::sanitize_for_logging;
///
/// let line = "GET /v2/query?input=pi&appid=ABCD-1234";
/// assert!(!sanitize_for_logging(line).contains("ABCD-1234"));
/// ```
pub fn sanitize_for_logging(input: &str) -> String {
    let patterns = [
        (r"(?i)(api[\s_-]?key|apikey|appid|key)=([^&\s]+)", "$1=[REDACTED]"),
        (r"(?i)(api[\s_-]?key|apikey|token|secret)\s*:\s*\S+", "$1: [REDACTED]"),
        (r"(?i)(authorization)\s*:\s*bearer\s+\S+", "$1: Bearer [REDACTED]"),
    ];

    let mut result = input.to_string();
    for (pattern, replacement) in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            result = re.replace_all(&result, *replacement).into_owned();
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(Duration::from_micros(500)), "500μs");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m5s");
    }

    #[test]
    fn test_preview_short_text_is_flattened() {
        assert_eq!(preview("Solve[x^2 == 4, x]\nPlot[Sin[x]]", 100), "Solve[x^2 == 4, x]\\nPlot[Sin[x]]");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "αβγδεζηθ";
        assert_eq!(preview(text, 3), "αβγ… (8 chars)");
    }

    #[test]
    fn test_sanitize_query_parameters() {
        let url = "https://api.wolframalpha.com/v2/query?input=pi&appid=XYZ-42&output=json";
        let clean = sanitize_for_logging(url);
        assert!(clean.contains("appid=[REDACTED]"));
        assert!(clean.contains("input=pi"));
        assert!(!clean.contains("XYZ-42"));

        let gemini = "models/gemini-1.5-pro:generateContent?key=AIzaSecret";
        assert!(!sanitize_for_logging(gemini).contains("AIzaSecret"));
    }

    #[test]
    fn test_sanitize_bearer_token() {
        let clean = sanitize_for_logging("Authorization: Bearer ya29.token");
        assert!(clean.contains("[REDACTED]"));
        assert!(!clean.contains("ya29.token"));
    }

    #[test]
    fn test_sanitize_preserves_safe_text() {
        let input = "query routed to lookup: Schrodinger equation solution in Physics";
        assert_eq!(sanitize_for_logging(input), input);
    }

    #[test]
    fn test_init_tracing_twice_reports_error() {
        // Whichever call installs first wins; the second must not panic.
        let _ = init_tracing("debug");
        assert!(init_tracing("info").is_err());
    }

    #[tokio::test]
    async fn test_timed_returns_inner_value() {
        let result = timed("test_operation", async { 42 }).await;
        assert_eq!(result, 42);
    }
}

//! Workflow commands understood by the CI runner
//!
//! Lines of the form `::error::message` printed on stdout become error
//! annotations on the job. Message data must escape `%`, `\r` and `\n`.

/// Environment variable the runner sets to `1` when step debug logging is on
pub const RUNNER_DEBUG: &str = "RUNNER_DEBUG";

/// Escape `message` for use as workflow command data
///
/// ```
/// use tarball_publisher::core::workflow::escape_data;
///
/// assert_eq!(escape_data("50%\nfailed"), "50%25%0Afailed");
/// ```
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::error::` annotation line for `message`
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Whether the runner asked for debug output
pub fn is_debug(value: Option<&str>) -> bool {
    value == Some("1")
}

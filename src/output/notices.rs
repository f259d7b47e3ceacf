//! User-facing notices
//!
//! Commands report progress and errors through `OutputWriter`, so the same
//! code can print to the terminal or collect toast notices for another front
//! end.

use crate::session::{ErrorSurface, SessionError};
use colored::Colorize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Shown under an oversized-export notice
pub const OVERSIZED_HINT: &str =
    "Narrow the search or tick the results you need and export \"Selected Results\" instead.";

/// Sink for user-facing notices
///
/// # Examples
///
/// ```no_run
/// use nslsl::output::{OutputWriter, StdoutWriter};
///
/// let output = StdoutWriter::new();
/// output.write("101  Bone loss in microgravity");
/// output.success("Results emailed");
/// output.error("Search service error");
/// ```
pub trait OutputWriter: Send + Sync {
    /// Plain line, used for results
    fn write(&self, message: &str);

    /// Failed operation
    fn error(&self, message: &str);

    /// Completed operation
    fn success(&self, message: &str);

    /// Rejected input or partial result
    fn warning(&self, message: &str);

    /// Secondary detail, dropped in quiet mode
    fn info(&self, message: &str);

    /// Dismiss pending notices
    fn clear(&self);
}

/// CLI implementation
///
/// Notices go to stderr so stdout only carries results.
pub struct StdoutWriter {
    quiet: bool,
}

impl StdoutWriter {
    /// Create a new writer
    #[must_use]
    pub const fn new() -> Self {
        Self { quiet: false }
    }

    /// Writer that drops info and success messages
    #[must_use]
    pub const fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Default for StdoutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter for StdoutWriter {
    fn write(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", "✓".green(), message);
        }
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "!".yellow(), message);
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message.dimmed());
        }
    }

    fn clear(&self) {}
}

/// Kind of notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Normal,
    Error,
    Success,
    Warning,
    Info,
}

/// Notices kept before the oldest half is dropped
const TOAST_HISTORY: usize = 100;

/// How long a toast stays up by default
const TOAST_LIFETIME: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct Toast {
    level: MessageLevel,
    text: String,
    raised: Instant,
}

/// Buffered toast notices with expiry
///
/// # Examples
///
/// ```
/// use nslsl::output::{MessageLevel, OutputWriter, ToastWriter};
///
/// let toasts = ToastWriter::new();
/// toasts.error("Search service error");
///
/// assert_eq!(toasts.latest_message().unwrap().0, MessageLevel::Error);
/// ```
#[derive(Clone)]
pub struct ToastWriter {
    toasts: Arc<Mutex<Vec<Toast>>>,
    lifetime: Duration,
}

impl ToastWriter {
    /// Writer whose toasts last ten seconds
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(TOAST_LIFETIME)
    }

    /// Writer whose toasts last `lifetime`
    #[must_use]
    pub fn with_ttl(lifetime: Duration) -> Self {
        Self {
            toasts: Arc::default(),
            lifetime,
        }
    }

    /// Toasts still showing, oldest first
    #[must_use]
    pub fn recent_messages(&self) -> Vec<(MessageLevel, String)> {
        self.showing()
            .into_iter()
            .map(|toast| (toast.level, toast.text))
            .collect()
    }

    /// Newest toast still showing
    #[must_use]
    pub fn latest_message(&self) -> Option<(MessageLevel, String)> {
        self.recent_messages().pop()
    }

    /// Number of toasts still showing
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.showing().len()
    }

    fn showing(&self) -> Vec<Toast> {
        let now = Instant::now();
        self.lock()
            .iter()
            .filter(|toast| now.duration_since(toast.raised) < self.lifetime)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn raise(&self, level: MessageLevel, text: &str) {
        let mut toasts = self.lock();
        toasts.push(Toast {
            level,
            text: text.to_string(),
            raised: Instant::now(),
        });
        if toasts.len() > TOAST_HISTORY {
            toasts.drain(..TOAST_HISTORY / 2);
        }
    }
}

impl Default for ToastWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter for ToastWriter {
    fn write(&self, text: &str) {
        self.raise(MessageLevel::Normal, text);
    }

    fn error(&self, text: &str) {
        self.raise(MessageLevel::Error, text);
    }

    fn success(&self, text: &str) {
        self.raise(MessageLevel::Success, text);
    }

    fn warning(&self, text: &str) {
        self.raise(MessageLevel::Warning, text);
    }

    fn info(&self, text: &str) {
        self.raise(MessageLevel::Info, text);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

/// Present a session error on the surface it belongs to
///
/// Validation problems are warnings next to the input; server failures are
/// error notices; oversized exports get their own notice with a hint.
pub fn report_error(output: &dyn OutputWriter, error: &SessionError) {
    match error.surface() {
        ErrorSurface::Inline => output.warning(&error.to_string()),
        ErrorSurface::Toast => output.error(&error.to_string()),
        ErrorSurface::OversizedToast => {
            output.error(&error.to_string());
            output.info(OVERSIZED_HINT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::export::{ExportError, ExportKind};

    #[test]
    fn test_toast_writer_messages() {
        let writer = ToastWriter::new();

        writer.success("Results emailed");
        writer.error("Search service error");
        writer.warning("Enter a search term");

        let levels: Vec<_> = writer.recent_messages().into_iter().map(|(l, _)| l).collect();
        assert_eq!(
            levels,
            [MessageLevel::Success, MessageLevel::Error, MessageLevel::Warning]
        );
        assert_eq!(
            writer.recent_messages()[0],
            (MessageLevel::Success, "Results emailed".to_string())
        );
    }

    #[test]
    fn test_toast_writer_clear_and_ttl() {
        let toasts = ToastWriter::with_ttl(Duration::from_millis(40));
        toasts.info("Page 1 of 3");
        toasts.info("Page 2 of 3");
        assert_eq!(toasts.message_count(), 2);
        toasts.clear();
        assert!(toasts.recent_messages().is_empty());

        toasts.info("Page 3 of 3");
        std::thread::sleep(Duration::from_millis(80));
        assert!(toasts.latest_message().is_none());
    }

    #[test]
    fn test_toast_writer_keeps_recent_history() {
        let writer = ToastWriter::new();
        for i in 0..101 {
            writer.write(&i.to_string());
        }
        assert_eq!(writer.message_count(), 51);
        assert_eq!(writer.latest_message().unwrap().1, "100");
    }

    #[test]
    fn test_report_error_routes_by_surface() {
        let toasts = ToastWriter::new();

        report_error(&toasts, &SessionError::EmptyQuery);
        report_error(
            &toasts,
            &SessionError::Network(ClientError::Status {
                endpoint: "SearchAjax".into(),
                status: 500,
            }),
        );
        report_error(
            &toasts,
            &SessionError::Export(ExportError::TooManyResults {
                kind: ExportKind::Email,
                count: 1500,
                ceiling: 1000,
            }),
        );

        let levels: Vec<_> = toasts.recent_messages().into_iter().map(|(l, _)| l).collect();
        assert_eq!(
            levels,
            vec![
                MessageLevel::Warning,
                MessageLevel::Error,
                MessageLevel::Error,
                MessageLevel::Info,
            ]
        );
        assert_eq!(toasts.latest_message().unwrap().1, OVERSIZED_HINT);
    }
}

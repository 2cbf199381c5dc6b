// Upload gatekeeper: rejects unsupported files before they reach the pipeline

use std::sync::Arc;

use tracing::{debug, warn};

use crate::format::classify;
use crate::types::PipelineResult;
use crate::upload::UploadedFile;

/// Receives user-visible warnings from the gate. The upload surface plugs in
/// whatever it uses for blocking notices; the default just logs.
pub trait NoticeSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink: surfaces the notice through the tracing pipeline.
pub struct TracingNotices;

impl NoticeSink for TracingNotices {
    fn warn(&self, message: &str) {
        warn!("{message}");
    }
}

/// Validates candidate files against the classifier. Classification failure
/// is the sole rejection cause. The gate keeps no state of its own: a
/// rejection leaves whatever the caller previously accepted untouched, and
/// clearing downstream state stays the caller's decision.
pub struct UploadGate {
    notices: Arc<dyn NoticeSink>,
}

impl UploadGate {
    pub fn new() -> Self {
        Self::with_notices(Arc::new(TracingNotices))
    }

    pub fn with_notices(notices: Arc<dyn NoticeSink>) -> Self {
        Self { notices }
    }

    /// Accepts the file, forwarding it unchanged, or rejects it. On
    /// rejection the notice sink is told synchronously in addition to the
    /// machine-checkable error.
    pub fn accept<'a>(&self, file: &'a UploadedFile) -> PipelineResult<&'a UploadedFile> {
        match classify(file.name(), file.content_type()) {
            Ok(format) => {
                debug!("accepted {} as {format}", file.name());
                Ok(file)
            }
            Err(err) => {
                self.notices.warn(&err.to_string());
                Err(err)
            }
        }
    }
}

impl Default for UploadGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PipelineError;
    use std::sync::Mutex;

    struct RecordingNotices(Mutex<Vec<String>>);

    impl NoticeSink for RecordingNotices {
        fn warn(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_accept_forwards_file_unchanged() {
        let gate = UploadGate::new();
        let file = UploadedFile::in_memory("data.csv", "text/csv", "a,b\n1,2");
        let accepted = gate.accept(&file).unwrap();
        assert_eq!(accepted.name(), "data.csv");
    }

    #[test]
    fn test_reject_reports_accepted_formats() {
        let notices = Arc::new(RecordingNotices(Mutex::new(Vec::new())));
        let gate = UploadGate::with_notices(notices.clone());
        let file = UploadedFile::in_memory("report.docx", "application/msword", "");

        let err = gate.accept(&file).unwrap_err();
        assert_eq!(err, PipelineError::UnsupportedFormat);

        let recorded = notices.0.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].contains("CSV, XLSX, TXT, or PDF"));
    }

    #[test]
    fn test_reject_does_not_notice_on_accept() {
        let notices = Arc::new(RecordingNotices(Mutex::new(Vec::new())));
        let gate = UploadGate::with_notices(notices.clone());
        let file = UploadedFile::in_memory("notes.txt", "text/plain", "hi");

        gate.accept(&file).unwrap();
        assert!(notices.0.lock().unwrap().is_empty());
    }
}

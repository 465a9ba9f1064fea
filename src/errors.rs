//! Errors raised by the state cache and the texture unit allocator, and the error channel
//! which non-fatal failures are reported through.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Can not reserve more than {} texture units.", max)]
    ResourceLimitExceeded { max: u32 },
    #[fail(display = "Failed to decode or upload texture: {}", _0)]
    DecodeOrUploadFailure(String),
    #[fail(display = "Invalid bind request: {}", _0)]
    InvalidBindRequest(String),
    #[fail(display = "There is no current graphics context on this thread.")]
    ContextNotCurrent,
    #[fail(display = "Device: {}", _0)]
    Device(String),
    #[fail(display = "Settings: {}", _0)]
    Settings(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

/// The category of an `Error`, as it is handed to an `ErrorSink`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ResourceLimitExceeded,
    DecodeOrUploadFailure,
    InvalidBindRequest,
    ContextNotCurrent,
    Device,
    Settings,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::ResourceLimitExceeded { .. } => ErrorKind::ResourceLimitExceeded,
            Error::DecodeOrUploadFailure(_) => ErrorKind::DecodeOrUploadFailure,
            Error::InvalidBindRequest(_) => ErrorKind::InvalidBindRequest,
            Error::ContextNotCurrent => ErrorKind::ContextNotCurrent,
            Error::Device(_) => ErrorKind::Device,
            Error::Settings(_) => ErrorKind::Settings,
        }
    }

    /// Fatal errors can not be recovered locally, the current render path must be
    /// aborted. Everything else leaves prior state untouched and could be skipped.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::ContextNotCurrent
    }
}

/// A structured error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ErrorKind,
    pub message: String,
}

impl<'a> From<&'a Error> for Report {
    fn from(err: &'a Error) -> Self {
        Report {
            kind: err.kind(),
            message: format!("{}", err),
        }
    }
}

/// The sink of error reports. Reporting never terminates the caller.
pub trait ErrorSink {
    fn report(&mut self, report: Report);
}

/// Forwards reports to the `log` facade.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&mut self, report: Report) {
        if report.kind == ErrorKind::ContextNotCurrent {
            error!("[{:?}] {}", report.kind, report.message);
        } else {
            warn!("[{:?}] {}", report.kind, report.message);
        }
    }
}

/// Collects reports into a buffer which could be shared with whoever needs to inspect them.
#[derive(Debug, Default, Clone)]
pub struct ReportLog {
    reports: Rc<RefCell<Vec<Report>>>,
}

impl ReportLog {
    pub fn new() -> Self {
        ReportLog::default()
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }

    /// Returns a snapshot of all the reports received so far.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.borrow().clone()
    }

    /// Counts the reports of `kind`.
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.reports.borrow().iter().filter(|v| v.kind == kind).count()
    }

    pub fn clear(&self) {
        self.reports.borrow_mut().clear();
    }
}

impl ErrorSink for ReportLog {
    fn report(&mut self, report: Report) {
        self.reports.borrow_mut().push(report);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fatality() {
        assert!(Error::ContextNotCurrent.is_fatal());
        assert!(!Error::ResourceLimitExceeded { max: 8 }.is_fatal());
        assert!(!Error::DecodeOrUploadFailure("a.png".into()).is_fatal());
        assert!(!Error::InvalidBindRequest("unit 3".into()).is_fatal());
    }

    #[test]
    fn shared_report_log() {
        let log = ReportLog::new();
        let mut sink = log.clone();

        let err = Error::ResourceLimitExceeded { max: 2 };
        sink.report(Report::from(&err));
        sink.report(Report::from(&Error::InvalidBindRequest("unit 9".into())));

        assert_eq!(log.len(), 2);
        assert_eq!(log.count(ErrorKind::ResourceLimitExceeded), 1);
        assert_eq!(log.reports()[0].message, "Can not reserve more than 2 texture units.");

        log.clear();
        assert!(sink.is_empty());
    }
}

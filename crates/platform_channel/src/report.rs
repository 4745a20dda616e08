use std::fmt;

use tracing::error;

use crate::message::MessageOrigin;

/// Library tag attached to every report.
pub const LIBRARY: &str = "plugin bridge";

/// An out-of-band failure that was recovered locally.
#[derive(Debug)]
pub struct ErrorReport {
    pub error: anyhow::Error,
    pub library: &'static str,
    pub origin: MessageOrigin,
}

impl ErrorReport {
    pub fn new(error: anyhow::Error, origin: MessageOrigin) -> Self {
        Self {
            error,
            library: LIBRARY,
            origin,
        }
    }

    /// Human readable context, e.g. `during a framework-to-plugin message`.
    pub fn context(&self) -> String {
        self.origin.to_string()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.library, self.error, self.origin)
    }
}

/// Process-wide sink for failures that must not reach the caller.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, report: ErrorReport);
}

/// Default reporter: writes the report to the tracing pipeline.
#[derive(Clone, Debug, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, report: ErrorReport) {
        error!(
            library = report.library,
            context = %report.context(),
            backtrace = %report.error.backtrace(),
            "{:#}",
            report.error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn report_carries_library_and_context() {
        let report = ErrorReport::new(anyhow!("boom"), MessageOrigin::FrameworkToPlugin);
        assert_eq!(report.library, LIBRARY);
        assert_eq!(report.context(), "during a framework-to-plugin message");
        assert_eq!(
            report.to_string(),
            "[plugin bridge] boom during a framework-to-plugin message"
        );
    }
}

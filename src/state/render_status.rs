/// Render status definitions
use std::fmt;

/// Outcome of rendering one page through the browser pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStatus {
    /// Markup captured and structurally complete
    Ok,

    /// The wait condition or the page timeout elapsed
    Timeout,

    /// Markup was captured but lacks the root `<html>`/`</html>` tags
    Malformed,

    /// Browser or navigation error, or retries exhausted
    Failed,
}

impl RenderStatus {
    /// Returns true if the markup can be used
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Timeout => "timeout",
            Self::Malformed => "malformed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

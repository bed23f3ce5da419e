use std::fmt;

/// Machine-readable error codes for scripted and agent callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    StoreParseError,
    StoreWriteFailed,
    UserNotFound,
    InvalidStatusTransition,
    InvalidEnumValue,
    TemplateFileMissing,
    TemplateParseError,
    LockContention,
    CollectorUnavailable,
    ExecutorFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::StoreParseError => "E1002",
            Self::StoreWriteFailed => "E1003",
            Self::UserNotFound => "E2001",
            Self::InvalidStatusTransition => "E2002",
            Self::InvalidEnumValue => "E2003",
            Self::TemplateFileMissing => "E3001",
            Self::TemplateParseError => "E3002",
            Self::LockContention => "E5001",
            Self::CollectorUnavailable => "E6001",
            Self::ExecutorFailed => "E6002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::StoreParseError => "Engagement store parse error",
            Self::StoreWriteFailed => "Engagement store write failed",
            Self::UserNotFound => "User not found in store",
            Self::InvalidStatusTransition => "Invalid post status transition",
            Self::InvalidEnumValue => "Invalid category/status value",
            Self::TemplateFileMissing => "Comment template file missing",
            Self::TemplateParseError => "Comment template file parse error",
            Self::LockContention => "Store lock contention",
            Self::CollectorUnavailable => "Notification collector unavailable",
            Self::ExecutorFailed => "Outreach command failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .regard/config.toml and retry."),
            Self::StoreParseError => {
                Some("Move the corrupt .regard/engagement.json aside and run `rgd analyze`.")
            }
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::UserNotFound => Some("Run `rgd list` to see the known user ids."),
            Self::InvalidStatusTransition => {
                Some("Follow valid transitions: unposted -> dispatched -> confirmed.")
            }
            Self::InvalidEnumValue => Some("Use one of the documented category/status values."),
            Self::TemplateFileMissing => {
                Some("Create .regard/templates.json or point [comment].templates elsewhere.")
            }
            Self::TemplateParseError => {
                Some("Templates must be a JSON object of category label to string arrays.")
            }
            Self::LockContention => {
                Some("Retry after the other `rgd` process releases its lock.")
            }
            Self::CollectorUnavailable => {
                Some("Check the notification source is reachable and credentials are valid.")
            }
            Self::ExecutorFailed => Some("Inspect the outreach command's stderr in the logs."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

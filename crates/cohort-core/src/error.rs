use std::fmt;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    RecordsNotFound,
    RecordsMalformed,
    DuplicateUser,
    InvalidRoot,
    InvalidTarget,
    UnreachableTargetComponents,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::RecordsNotFound => "E2001",
            Self::RecordsMalformed => "E2002",
            Self::DuplicateUser => "E2003",
            Self::InvalidRoot => "E3001",
            Self::InvalidTarget => "E3002",
            Self::UnreachableTargetComponents => "E3003",
            Self::OutputWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::RecordsNotFound => "User records file not found",
            Self::RecordsMalformed => "User records are malformed",
            Self::DuplicateUser => "Duplicate user id in records",
            Self::InvalidRoot => "BFS root is not a graph node",
            Self::InvalidTarget => "Invalid target component count",
            Self::UnreachableTargetComponents => "Target component count unreachable",
            Self::OutputWriteFailed => "Output write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in cohort.toml and retry."),
            Self::RecordsNotFound => {
                Some("Pass --users <FILE> or set `users` in cohort.toml.")
            }
            Self::RecordsMalformed => {
                Some("Records must be a JSON array of {id, screen_name?, friends}.")
            }
            Self::DuplicateUser => Some("Merge or remove the repeated user record."),
            Self::InvalidRoot => Some("Use a node id listed by `cohort summary`."),
            Self::InvalidTarget => Some("Request at least one cluster."),
            Self::UnreachableTargetComponents => {
                Some("Request fewer clusters than nodes, or lower --min-common / --min-degree.")
            }
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

use std::fmt;

/// Machine-readable error codes for hosts and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ConfigInvalid,
    InputParseError,
    NodeNotFound,
    InvalidSessionState,
    CycleDetected,
    CommitLengthMismatch,
    CommitUnknownId,
    CommitDuplicateId,
    CommitNotDense,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ConfigInvalid => "E1002",
            Self::InputParseError => "E1003",
            Self::NodeNotFound => "E2001",
            Self::InvalidSessionState => "E2002",
            Self::CycleDetected => "E2003",
            Self::CommitLengthMismatch => "E3001",
            Self::CommitUnknownId => "E3002",
            Self::CommitDuplicateId => "E3003",
            Self::CommitNotDense => "E3004",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigInvalid => "Config value out of range",
            Self::InputParseError => "Input file parse error",
            Self::NodeNotFound => "Node not found",
            Self::InvalidSessionState => "No drag in progress",
            Self::CycleDetected => "Cycle would be created",
            Self::CommitLengthMismatch => "Commit does not cover every node",
            Self::CommitUnknownId => "Commit names an unknown node",
            Self::CommitDuplicateId => "Commit names a node twice",
            Self::CommitNotDense => "Commit sort order has gaps",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::ConfigInvalid => {
                Some("Keep 0 <= nest_zone.start < nest_zone.end <= 1 and edge_threshold >= 0.")
            }
            Self::InputParseError => Some("Input must be a JSON array of nodes with string ids."),
            Self::NodeNotFound => Some("Check the id against the input file."),
            Self::InvalidSessionState => Some("Send a start event before position, move or release."),
            Self::CycleDetected => Some("Pick a target outside the dragged node's subtree."),
            Self::CommitLengthMismatch
            | Self::CommitUnknownId
            | Self::CommitDuplicateId
            | Self::CommitNotDense => Some("Rebuild the payload from the current list and retry."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

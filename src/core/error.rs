use thiserror::Error;

/// Errors that can occur while configuring or running a validation pass.
///
/// Row-level problems never surface here: a malformed row still gets a
/// verdict. These errors are for policy, schema, file handling and
/// inconsistent call arguments.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeducibleError {
    /// The rule policy is inconsistent or incomplete.
    #[error("policy error: {0}")]
    Policy(String),

    /// The sheet layout could not be resolved.
    #[error("schema error: {0}")]
    Schema(String),

    /// The input workbook could not be opened or read.
    #[error("read error: {0}")]
    Read(String),

    /// The augmented workbook could not be written.
    #[error("write error: {0}")]
    Write(String),

    /// Arguments passed together do not agree with each other.
    #[error("argument mismatch: {0}")]
    Mismatch(String),
}

/// A single policy problem with the offending field and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyIssue {
    /// Name of the policy field (e.g. "cash_limit").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for PolicyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl PolicyIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<Vec<PolicyIssue>> for DeducibleError {
    fn from(issues: Vec<PolicyIssue>) -> Self {
        let joined = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        DeducibleError::Policy(joined)
    }
}

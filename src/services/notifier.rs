use std::fmt;

use crate::domain::environment::Environment;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    UpdateStatus,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::UpdateStatus => "update-status",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetching",
            Operation::Create => "creating",
            Operation::UpdateStatus => "updating",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct FailureNotice<'a> {
    pub operation: Operation,
    pub environment: Environment,
    pub error: &'a AppError,
}

impl FailureNotice<'_> {
    /// The sentence shown to the user, e.g. "Error creating prod ticket: ...".
    pub fn message(&self) -> String {
        let noun = match self.operation {
            Operation::Fetch => "tickets",
            Operation::Create | Operation::UpdateStatus => "ticket",
        };
        format!(
            "Error {} {} {noun}: {}",
            self.operation.describe(),
            self.environment,
            self.error
        )
    }
}

pub trait Notifier: Send + Sync {
    fn failure(&self, notice: &FailureNotice<'_>);
    fn prompt(&self, message: &str);
}

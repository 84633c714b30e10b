//! Command execution helpers
//!
//! Provides utilities to reduce boilerplate when implementing commands with
//! timing and logging.

use std::future::Future;
use std::time::Instant;

use idlink_core::{ReportedFailure, SessionOperation};
use idlink_domain::Result as DomainResult;
use serde::Serialize;

use crate::utils::logging::{error_label, log_command_execution};

/// Result of a presentation command
///
/// Failures carry the operation that produced them, in the same shape the
/// session snapshot reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandOutcome<T> {
    /// The command completed.
    Success { data: T },
    /// The command failed; nothing in the session changed.
    Failed { failure: ReportedFailure },
}

impl<T> CommandOutcome<T> {
    /// Tag a failed `result` with `operation`.
    pub fn from_result(operation: SessionOperation, result: DomainResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(error) => Self::Failed { failure: ReportedFailure::new(operation, error) },
        }
    }

    /// Whether the command succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Payload of a successful command.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    /// Reported failure of a failed command.
    pub fn failure(&self) -> Option<&ReportedFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failed { failure } => Some(failure),
        }
    }

    /// Convert back into a plain `Result`.
    pub fn into_result(self) -> DomainResult<T> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failed { failure } => Err(failure.error),
        }
    }
}

/// Execute a command with automatic timing and logging
///
/// # Example
///
/// ```rust,ignore
/// pub async fn submit_metadata(ctx: &SessionContext, text: &str) -> CommandOutcome<MetadataDocument> {
///     execute_command("session::submit_metadata", SessionOperation::SubmitMetadata, || {
///         ctx.view_model.submit_metadata(text)
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(
    command_name: &str,
    operation: SessionOperation,
    command_fn: F,
) -> CommandOutcome<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), error_type);

    CommandOutcome::from_result(operation, result)
}

//! Graceful degradation for the enrichment stages.
//!
//! A failed collaborator call never aborts a run. The failure is logged and
//! the stage continues with a fallback value so the report can still be built.

use crate::{CoreError, ErrorExt, ErrorReporter};
use tracing::{info, warn};

/// Outcome of a stage after recovery has been applied
#[derive(Debug)]
pub enum RecoveryResult<T> {
    /// The collaborator call succeeded
    Completed(T),
    /// The call failed and the fallback value was substituted
    Degraded { value: T, error: CoreError },
}

impl<T> RecoveryResult<T> {
    /// Returns true if the stage ran on real data
    pub fn is_completed(&self) -> bool {
        matches!(self, RecoveryResult::Completed(_))
    }

    /// Returns true if the stage fell back to its default
    pub fn is_degraded(&self) -> bool {
        matches!(self, RecoveryResult::Degraded { .. })
    }

    /// The error that caused degradation, if any
    pub fn error(&self) -> Option<&CoreError> {
        match self {
            RecoveryResult::Completed(_) => None,
            RecoveryResult::Degraded { error, .. } => Some(error),
        }
    }

    /// Returns the stage value, real or fallback
    pub fn into_inner(self) -> T {
        match self {
            RecoveryResult::Completed(value) | RecoveryResult::Degraded { value, .. } => value,
        }
    }
}

pub struct ErrorRecovery;

impl ErrorRecovery {
    /// Substitute `fallback` for a failed stage, logging the failure.
    pub fn degrade<T>(stage: &str, result: Result<T, CoreError>, fallback: T) -> RecoveryResult<T> {
        match result {
            Ok(value) => RecoveryResult::Completed(value),
            Err(error) => {
                ErrorReporter::new().report_error(&error);
                warn!(
                    "{} failed ({}), continuing with empty result",
                    stage,
                    error.error_code()
                );
                RecoveryResult::Degraded {
                    value: fallback,
                    error,
                }
            }
        }
    }

    /// Like [`ErrorRecovery::degrade`] with `T::default()` as the fallback.
    pub fn degrade_to_default<T: Default>(
        stage: &str,
        result: Result<T, CoreError>,
    ) -> RecoveryResult<T> {
        let outcome = Self::degrade(stage, result, T::default());
        if outcome.is_completed() {
            info!("{} completed", stage);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LlmError, SearchApiError};

    #[test]
    fn test_success_passes_through() {
        let result: RecoveryResult<Vec<u32>> =
            ErrorRecovery::degrade_to_default("fetch", Ok(vec![1, 2, 3]));

        assert!(result.is_completed());
        assert!(result.error().is_none());
        assert_eq!(result.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_substitutes_default() {
        let result: RecoveryResult<Vec<u32>> = ErrorRecovery::degrade_to_default(
            "fetch",
            Err(CoreError::SearchApi(SearchApiError::RateLimited)),
        );

        assert!(result.is_degraded());
        assert_eq!(result.error().map(|e| e.error_code()), Some("SEARCH_API"));
        assert!(result.into_inner().is_empty());
    }

    #[test]
    fn test_failure_substitutes_explicit_fallback() {
        let result = ErrorRecovery::degrade(
            "summarize",
            Err(CoreError::Llm(LlmError::RequestTimeout {
                provider: "claude".to_string(),
            })),
            "fallback".to_string(),
        );

        assert!(result.is_degraded());
        assert_eq!(result.into_inner(), "fallback");
    }
}

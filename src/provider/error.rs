//! Per-item failure and exclusion reasons.

use thiserror::Error;

use crate::catalog::HealthStatus;
use crate::constraints::ConstraintError;
use crate::label::DecodeError;

/// Errors that abort one item's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("load-balancer is not defined")]
    LoadBalancerUndefined,

    #[error("port is missing")]
    MissingPort,

    #[error("address is missing")]
    MissingAddress,

    #[error("failed to decode labels: {0}")]
    Decode(#[from] DecodeError),
}

/// Why an item produced no configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("item is disabled")]
    Disabled,

    #[error("error matching constraints expression: {0}")]
    ConstraintError(ConstraintError),

    #[error("pruned by constraint expression")]
    ConstraintMismatch,

    #[error("unhealthy or starting item (status: {0})")]
    Unhealthy(HealthStatus),

    #[error(transparent)]
    Failed(#[from] ProviderError),
}

impl SkipReason {
    /// Short label for metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::ConstraintError(_) => "constraint_error",
            SkipReason::ConstraintMismatch => "constraint_mismatch",
            SkipReason::Unhealthy(_) => "unhealthy",
            SkipReason::Failed(_) => "failed",
        }
    }
}

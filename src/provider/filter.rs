//! Item eligibility.
//!
//! # Responsibilities
//! - Drop items whose enable directive is off
//! - Drop items whose tags fail the constraint expression
//! - Drop items that are neither passing nor warning
//!
//! # Design Decisions
//! - A malformed constraint expression counts as a non-match
//! - Warning instances stay routable

use tracing::{debug, error};

use crate::catalog::RegistryItem;
use crate::constraints::ConstraintMatcher;
use crate::provider::error::SkipReason;

/// Decide whether `item` produces configuration at all.
pub fn keep(item: &RegistryItem, constraints: &dyn ConstraintMatcher) -> Result<(), SkipReason> {
    if !item.extra_conf.enable {
        debug!("Filtering disabled item");
        return Err(SkipReason::Disabled);
    }

    match constraints.matches(&item.tags) {
        Ok(true) => {}
        Ok(false) => {
            debug!(constraints = %constraints.expression(), "Item pruned by constraint expression");
            return Err(SkipReason::ConstraintMismatch);
        }
        Err(e) => {
            error!(error = %e, "Error matching constraints expression");
            return Err(SkipReason::ConstraintError(e));
        }
    }

    if !item.status.is_routable() {
        debug!(status = %item.status, "Filtering unhealthy or starting item");
        return Err(SkipReason::Unhealthy(item.status));
    }

    Ok(())
}

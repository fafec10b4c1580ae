use chrono::{DateTime, Utc};

use crate::product::{ActivationWindow, Promotion};

impl ActivationWindow {
    /// Both bounds are inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if let Some(starts_at) = self.starts_at {
            if at < starts_at {
                return false;
            }
        }

        if let Some(ends_at) = self.ends_at {
            if at > ends_at {
                return false;
            }
        }

        true
    }
}

/// Decide whether a promotion is in effect at `reference_time`.
///
/// A promotion without a kind is never active. The caller supplies the
/// reference time so the verdict only depends on the arguments.
pub fn is_active(promotion: &Promotion, reference_time: DateTime<Utc>) -> bool {
    if promotion.kind.is_none() {
        return false;
    }

    promotion.window.contains(reference_time)
}

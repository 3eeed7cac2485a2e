//! Institutional ownership snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Institutional sponsorship for a symbol at one reporting period.
///
/// `held_percent_institutions` is a fraction in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipSnapshot {
    pub held_percent_institutions: Option<f64>,
    pub num_institutional_holders: Option<u32>,
    pub period: NaiveDate,
}

/// Current snapshot plus the prior quarter's, when the provider has it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipHistory {
    pub current: Option<OwnershipSnapshot>,
    pub previous: Option<OwnershipSnapshot>,
}

impl OwnershipHistory {
    pub fn new(current: OwnershipSnapshot) -> Self {
        Self {
            current: Some(current),
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: OwnershipSnapshot) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Quarter-over-quarter fractional change in holder count.
    pub fn holder_change(&self) -> Option<f64> {
        let now = self.current.as_ref()?.num_institutional_holders?;
        let before = self.previous.as_ref()?.num_institutional_holders?;
        if before == 0 {
            return None;
        }
        Some((now as f64 - before as f64) / before as f64)
    }
}

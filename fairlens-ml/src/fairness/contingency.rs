//! 2x2 contingency counts for privileged/unprivileged vs favorable/unfavorable.

use crate::scenario::LabeledRecord;
use serde::{Deserialize, Serialize};

/// Cell counts of the group-by-outcome table.
///
/// | | favorable | unfavorable |
/// |---|---|---|
/// | privileged | `a` | `b` |
/// | unprivileged | `c` | `d` |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyCounts {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl ContingencyCounts {
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self { a, b, c, d }
    }

    /// Total number of records, N = a + b + c + d.
    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    pub fn privileged_total(&self) -> u64 {
        self.a + self.b
    }

    pub fn unprivileged_total(&self) -> u64 {
        self.c + self.d
    }

    /// Favorable-outcome rate of the privileged group, 0 when the group is empty.
    pub fn privileged_rate(&self) -> f64 {
        rate(self.a, self.privileged_total())
    }

    /// Favorable-outcome rate of the unprivileged group, 0 when the group is empty.
    pub fn unprivileged_rate(&self) -> f64 {
        rate(self.c, self.unprivileged_total())
    }
}

fn rate(favorable: u64, total: u64) -> f64 {
    if total > 0 {
        favorable as f64 / total as f64
    } else {
        0.0
    }
}

/// Partition `records` into privileged and unprivileged groups and count
/// favorable outcomes in each.
///
/// A record is privileged when its `protected_key` value equals
/// `privileged_value` exactly. Every other record is unprivileged, including
/// records carrying a third group value or lacking the key altogether.
/// Favorable means the `outcome_key` value equals `favorable_outcome` exactly.
pub fn compute_contingency(
    records: &[LabeledRecord],
    protected_key: &str,
    privileged_value: &str,
    outcome_key: &str,
    favorable_outcome: &str,
) -> ContingencyCounts {
    let mut counts = ContingencyCounts::default();
    for record in records {
        let privileged = record.value(protected_key) == Some(privileged_value);
        let favorable = record.value(outcome_key) == Some(favorable_outcome);
        match (privileged, favorable) {
            (true, true) => counts.a += 1,
            (true, false) => counts.b += 1,
            (false, true) => counts.c += 1,
            (false, false) => counts.d += 1,
        }
    }
    counts
}

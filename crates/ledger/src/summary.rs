//! Monthly cross-entity aggregates.
//!
//! A [`MonthlySummary`] is derived on demand by
//! [`Ledger::summarize`](crate::Ledger::summarize) and never persisted.

use serde::{Deserialize, Serialize};

use crate::Money;

/// Aggregate totals for one `(month, year)` period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u8,
    pub year: i32,
    /// Credit entries across all cash boxes, dated within the month.
    pub box_credits: Money,
    /// Debit entries across all cash boxes, dated within the month.
    pub box_debits: Money,
    /// `box_credits − box_debits`.
    pub box_balance: Money,
    pub fixed_expenses: Money,
    pub variable_expenses: Money,
    pub paid_expenses: Money,
    /// Pending plus overdue expenses.
    pub pending_expenses: Money,
    pub collected_incomes: Money,
    pub pending_incomes: Money,
    /// `box_credits + collected_incomes − box_debits − paid_expenses`:
    /// only settled legs count.
    pub general_balance: Money,
}

impl MonthlySummary {
    pub(crate) fn empty(month: u8, year: i32) -> Self {
        Self {
            month,
            year,
            ..Self::default()
        }
    }

    /// Recompute the derived totals from the partitioned sums.
    pub(crate) fn finish(mut self) -> Self {
        self.box_balance = self.box_credits - self.box_debits;
        self.general_balance =
            self.box_credits + self.collected_incomes - self.box_debits - self.paid_expenses;
        self
    }
}

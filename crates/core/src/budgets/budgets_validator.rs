//! Pure spend validation - no I/O.
//!
//! Implements the decision ladder for a proposed spend, first match wins:
//! 1. non-positive amount         -> `InvalidAmount`
//! 2. amount > available balance  -> `InsufficientBalance` (blocks)
//! 3. annual allocation depleted  -> allow + `AnnualDepletion` warning
//! 4. balance falls to <= 20% of the quarterly allocation
//!                                -> allow + `BelowReallocationThreshold`
//! 5. otherwise                   -> allow, no warning
//!
//! Only rule 2 blocks; the warnings are soft operational guardrails.

use rust_decimal::Decimal;

use crate::budgets::budgets_errors::BudgetError;
use crate::budgets::budgets_model::{BalanceSnapshot, BudgetAccount, BudgetWarning};
use crate::constants::REALLOCATION_THRESHOLD;
use crate::errors::Result;

/// Outcome of a successful assessment: the warning to surface (if any) and
/// the balances to write.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendAssessment {
    pub warning: Option<BudgetWarning>,
    /// Next balances, clamped at zero. The clamp is redundant when the
    /// compare-and-swap holds, but guards against an over-commit slipping
    /// past validation on a stale read.
    pub next: BalanceSnapshot,
}

/// Assess a proposed spend against the account's current balances.
pub fn assess_spend(account: &BudgetAccount, requested: Decimal) -> Result<SpendAssessment> {
    if requested <= Decimal::ZERO {
        return Err(BudgetError::InvalidAmount(requested).into());
    }

    if requested > account.available_balance {
        return Err(BudgetError::InsufficientBalance {
            requested,
            available: account.available_balance,
        }
        .into());
    }

    let warning = if account.annual_allocation - requested <= Decimal::ZERO {
        Some(BudgetWarning::AnnualDepletion)
    } else if account.available_balance - requested
        <= reallocation_threshold() * account.quarterly_allocation
    {
        Some(BudgetWarning::BelowReallocationThreshold)
    } else {
        None
    };

    Ok(SpendAssessment {
        warning,
        next: BalanceSnapshot {
            available_balance: (account.available_balance - requested).max(Decimal::ZERO),
            annual_allocation: (account.annual_allocation - requested).max(Decimal::ZERO),
        },
    })
}

fn reallocation_threshold() -> Decimal {
    // REALLOCATION_THRESHOLD is a compile-time constant, parse cannot fail.
    REALLOCATION_THRESHOLD.parse().unwrap_or(Decimal::ZERO)
}

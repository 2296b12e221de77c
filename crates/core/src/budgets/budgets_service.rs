//! The single mutation path for budget balances.
//!
//! Protocol per attempt: fetch the account, run the pure validator, then
//! write the new balances with a compare-and-swap keyed on the pre-fetch
//! values. A lost race re-runs the whole protocol from a fresh read, up to
//! `MAX_SWAP_ATTEMPTS` times. Only after a successful swap is the audit
//! entry appended; an append failure never rolls the balance back.

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use rust_decimal::Decimal;

use crate::budgets::budgets_errors::BudgetError;
use crate::budgets::budgets_model::{
    BalanceSnapshot, BudgetAccount, HistoryStatus, MutationOutcome, SpendRequest,
};
use crate::budgets::budgets_traits::{BudgetMutationServiceTrait, BudgetStoreTrait, SwapOutcome};
use crate::budgets::budgets_validator::assess_spend;
use crate::constants::MAX_SWAP_ATTEMPTS;
use crate::errors::Result;
use crate::history::{ChangeType, HistoryLedgerTrait, NewBudgetHistoryEntry};

pub struct BudgetMutationService {
    store: Arc<dyn BudgetStoreTrait>,
    ledger: Arc<dyn HistoryLedgerTrait>,
}

impl BudgetMutationService {
    pub fn new(store: Arc<dyn BudgetStoreTrait>, ledger: Arc<dyn HistoryLedgerTrait>) -> Self {
        BudgetMutationService { store, ledger }
    }

    fn fetch_account(&self, project_id: &str) -> Result<BudgetAccount> {
        self.store
            .fetch(project_id)?
            .ok_or_else(|| BudgetError::AccountNotFound(project_id.to_string()).into())
    }

    /// Append the audit entry for a committed swap, retrying once. The
    /// balance write is authoritative; a second failure is surfaced on the
    /// outcome and logged for manual reconciliation.
    async fn record_history(&self, entry: NewBudgetHistoryEntry) -> HistoryStatus {
        match self.ledger.append(entry.clone()).await {
            Ok(recorded) => HistoryStatus::Recorded(recorded.id),
            Err(first) => {
                warn!(
                    "History append failed for project {}, retrying once: {}",
                    entry.project_id, first
                );
                match self.ledger.append(entry.clone()).await {
                    Ok(recorded) => HistoryStatus::Recorded(recorded.id),
                    Err(second) => {
                        error!(
                            "History append failed twice for project {} ({} -> {}); \
                             balance mutation stands, manual reconciliation required: {}",
                            entry.project_id, entry.previous_amount, entry.new_amount, second
                        );
                        HistoryStatus::Failed
                    }
                }
            }
        }
    }
}

#[async_trait]
impl BudgetMutationServiceTrait for BudgetMutationService {
    async fn apply(&self, request: SpendRequest) -> Result<MutationOutcome> {
        // Reject bad amounts before any I/O.
        if request.amount <= Decimal::ZERO {
            return Err(BudgetError::InvalidAmount(request.amount).into());
        }

        for attempt in 1..=MAX_SWAP_ATTEMPTS {
            let account = self.fetch_account(&request.project_id)?;
            let assessment = assess_spend(&account, request.amount)?;

            let swapped = self
                .store
                .compare_and_swap(
                    &request.project_id,
                    account.snapshot(),
                    assessment.next.clone(),
                )
                .await?;

            match swapped {
                SwapOutcome::Applied => {
                    info!(
                        "Deducted {} from project {} (available {} -> {}, attempt {})",
                        request.amount,
                        request.project_id,
                        account.available_balance,
                        assessment.next.available_balance,
                        attempt
                    );

                    let reason = request.reason.clone().unwrap_or_else(|| {
                        format!(
                            "Document creation{}",
                            request
                                .document_id
                                .as_deref()
                                .map(|d| format!(" ({})", d))
                                .unwrap_or_default()
                        )
                    });

                    let history = self
                        .record_history(NewBudgetHistoryEntry {
                            project_id: request.project_id.clone(),
                            previous_amount: account.available_balance,
                            new_amount: assessment.next.available_balance,
                            change_type: ChangeType::DocumentCreation,
                            change_reason: reason,
                            document_id: request.document_id.clone(),
                            created_by: request.actor_id.clone(),
                            created_at: None,
                        })
                        .await;

                    return Ok(MutationOutcome {
                        project_id: request.project_id,
                        new_available: assessment.next.available_balance,
                        new_annual: assessment.next.annual_allocation,
                        warning: assessment.warning,
                        history,
                    });
                }
                SwapOutcome::Conflict => {
                    warn!(
                        "Lost compare-and-swap race on project {} (attempt {}/{})",
                        request.project_id, attempt, MAX_SWAP_ATTEMPTS
                    );
                }
                SwapOutcome::NotFound => {
                    return Err(BudgetError::AccountNotFound(request.project_id).into());
                }
            }
        }

        Err(BudgetError::ContentionExceeded {
            project_id: request.project_id,
            attempts: MAX_SWAP_ATTEMPTS,
        }
        .into())
    }

    async fn apply_closure(&self, project_id: &str, year: i32) -> Result<MutationOutcome> {
        for attempt in 1..=MAX_SWAP_ATTEMPTS {
            let account = self.fetch_account(project_id)?;

            // The annual allocation is a separate replenishment concern and
            // is not touched by the closure.
            let next = BalanceSnapshot {
                available_balance: Decimal::ZERO,
                annual_allocation: account.annual_allocation,
            };

            match self
                .store
                .compare_and_swap(project_id, account.snapshot(), next.clone())
                .await?
            {
                SwapOutcome::Applied => {
                    info!(
                        "Closed year {} for project {}: archived balance {}",
                        year, project_id, account.available_balance
                    );

                    let history = self
                        .record_history(NewBudgetHistoryEntry {
                            project_id: project_id.to_string(),
                            previous_amount: account.available_balance,
                            new_amount: Decimal::ZERO,
                            change_type: ChangeType::YearEndClosure,
                            change_reason: format!("Year-end closure {}", year),
                            document_id: None,
                            created_by: None,
                            created_at: None,
                        })
                        .await;

                    return Ok(MutationOutcome {
                        project_id: project_id.to_string(),
                        new_available: Decimal::ZERO,
                        new_annual: next.annual_allocation,
                        warning: None,
                        history,
                    });
                }
                SwapOutcome::Conflict => {
                    warn!(
                        "Lost compare-and-swap race closing project {} (attempt {}/{})",
                        project_id, attempt, MAX_SWAP_ATTEMPTS
                    );
                }
                SwapOutcome::NotFound => {
                    return Err(BudgetError::AccountNotFound(project_id.to_string()).into());
                }
            }
        }

        Err(BudgetError::ContentionExceeded {
            project_id: project_id.to_string(),
            attempts: MAX_SWAP_ATTEMPTS,
        }
        .into())
    }
}

//! Tests for the year-end closure job, in particular its idempotency per
//! `(project_id, year)`.

#[cfg(test)]
mod tests {
    use crate::budgets::{
        BalanceSnapshot, BudgetAccount, BudgetMutationService, BudgetStoreTrait, SwapOutcome,
    };
    use crate::closures::{ClosureOutcome, ClosureStoreTrait, NewYearCloseRecord, YearCloseRecord, YearEndClosureService};
    use crate::errors::{DatabaseError, Error, Result};
    use crate::history::{BudgetHistoryEntry, ChangeType, HistoryLedgerTrait, NewBudgetHistoryEntry};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryStore {
        accounts: Arc<Mutex<HashMap<String, BudgetAccount>>>,
    }

    impl InMemoryStore {
        fn insert(&self, project_id: &str, available: Decimal, annual: Decimal) {
            self.accounts.lock().unwrap().insert(
                project_id.to_string(),
                BudgetAccount {
                    project_id: project_id.to_string(),
                    annual_allocation: annual,
                    available_balance: available,
                    quarterly_allocation: dec!(1000),
                    updated_at: Utc::now(),
                },
            );
        }

        fn available(&self, project_id: &str) -> Decimal {
            self.accounts.lock().unwrap()[project_id].available_balance
        }
    }

    #[async_trait]
    impl BudgetStoreTrait for InMemoryStore {
        fn fetch(&self, project_id: &str) -> Result<Option<BudgetAccount>> {
            Ok(self.accounts.lock().unwrap().get(project_id).cloned())
        }

        async fn compare_and_swap(
            &self,
            project_id: &str,
            expected: BalanceSnapshot,
            next: BalanceSnapshot,
        ) -> Result<SwapOutcome> {
            let mut accounts = self.accounts.lock().unwrap();
            match accounts.get_mut(project_id) {
                None => Ok(SwapOutcome::NotFound),
                Some(account) if account.snapshot() != expected => Ok(SwapOutcome::Conflict),
                Some(account) => {
                    account.available_balance = next.available_balance;
                    account.annual_allocation = next.annual_allocation;
                    account.updated_at = Utc::now();
                    Ok(SwapOutcome::Applied)
                }
            }
        }

        fn list(&self) -> Result<Vec<BudgetAccount>> {
            let mut accounts: Vec<_> = self.accounts.lock().unwrap().values().cloned().collect();
            accounts.sort_by(|a, b| a.project_id.cmp(&b.project_id));
            Ok(accounts)
        }
    }

    #[derive(Default)]
    struct InMemoryLedger {
        entries: Arc<Mutex<Vec<BudgetHistoryEntry>>>,
    }

    #[async_trait]
    impl HistoryLedgerTrait for InMemoryLedger {
        async fn append(&self, entry: NewBudgetHistoryEntry) -> Result<BudgetHistoryEntry> {
            let mut entries = self.entries.lock().unwrap();
            let recorded = BudgetHistoryEntry {
                id: entries.len() as i64 + 1,
                project_id: entry.project_id,
                previous_amount: entry.previous_amount,
                new_amount: entry.new_amount,
                change_type: entry.change_type,
                change_reason: entry.change_reason,
                document_id: entry.document_id,
                created_by: entry.created_by,
                created_at: entry.created_at.unwrap_or_else(Utc::now),
            };
            entries.push(recorded.clone());
            Ok(recorded)
        }

        fn list(&self, project_id: &str) -> Result<Vec<BudgetHistoryEntry>> {
            let mut entries: Vec<_> = self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.project_id == project_id)
                .cloned()
                .collect();
            entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(entries)
        }
    }

    #[derive(Default)]
    struct InMemoryClosures {
        records: Arc<Mutex<Vec<YearCloseRecord>>>,
        /// When set, the next insert fails with a unique violation even if
        /// no record is visible, simulating a concurrent trigger.
        force_unique_violation: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl ClosureStoreTrait for InMemoryClosures {
        fn find(&self, project_id: &str, year: i32) -> Result<Option<YearCloseRecord>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.project_id == project_id && r.year == year)
                .cloned())
        }

        async fn insert(&self, record: NewYearCloseRecord) -> Result<YearCloseRecord> {
            let mut records = self.records.lock().unwrap();

            let duplicate = records
                .iter()
                .any(|r| r.project_id == record.project_id && r.year == record.year);
            if duplicate || *self.force_unique_violation.lock().unwrap() {
                return Err(Error::Database(DatabaseError::UniqueViolation(
                    "budget_year_closures.project_id, budget_year_closures.year".to_string(),
                )));
            }

            let stored = YearCloseRecord {
                id: format!("close-{}", records.len() + 1),
                project_id: record.project_id,
                year: record.year,
                archived_amount: record.archived_amount,
                closed_at: Utc::now(),
            };
            records.push(stored.clone());
            Ok(stored)
        }
    }

    fn build(
        store: Arc<InMemoryStore>,
        ledger: Arc<InMemoryLedger>,
        closures: Arc<InMemoryClosures>,
    ) -> YearEndClosureService {
        let mutations = Arc::new(BudgetMutationService::new(store.clone(), ledger));
        YearEndClosureService::new(closures, mutations, store)
    }

    #[tokio::test]
    async fn closes_a_positive_balance() {
        let store = Arc::new(InMemoryStore::default());
        store.insert("5031234", dec!(420), dec!(1000));
        let ledger = Arc::new(InMemoryLedger::default());
        let closures = Arc::new(InMemoryClosures::default());
        let service = build(store.clone(), ledger.clone(), closures.clone());

        let outcome = service.close_project_year("5031234", 2025).await.unwrap();

        match outcome {
            ClosureOutcome::Closed { record, mutation } => {
                assert_eq!(record.archived_amount, dec!(420));
                assert_eq!(record.year, 2025);
                assert_eq!(mutation.new_available, dec!(0));
                assert_eq!(mutation.new_annual, dec!(1000));
            }
            other => panic!("expected Closed, got {other:?}"),
        }

        assert_eq!(store.available("5031234"), dec!(0));
        let entries = ledger.list("5031234").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].change_type, ChangeType::YearEndClosure);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = Arc::new(InMemoryStore::default());
        store.insert("5031234", dec!(420), dec!(1000));
        let ledger = Arc::new(InMemoryLedger::default());
        let closures = Arc::new(InMemoryClosures::default());
        let service = build(store.clone(), ledger.clone(), closures.clone());

        service.close_project_year("5031234", 2025).await.unwrap();
        let second = service.close_project_year("5031234", 2025).await.unwrap();

        assert!(matches!(second, ClosureOutcome::AlreadyClosed));
        // Exactly one close record and one history entry.
        assert_eq!(closures.records.lock().unwrap().len(), 1);
        assert_eq!(ledger.list("5031234").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn next_year_closes_independently() {
        let store = Arc::new(InMemoryStore::default());
        store.insert("5031234", dec!(420), dec!(1000));
        let ledger = Arc::new(InMemoryLedger::default());
        let closures = Arc::new(InMemoryClosures::default());
        let service = build(store.clone(), ledger.clone(), closures.clone());

        service.close_project_year("5031234", 2025).await.unwrap();

        // Balance replenished externally for the new year.
        store.insert("5031234", dec!(900), dec!(1000));
        let outcome = service.close_project_year("5031234", 2026).await.unwrap();

        assert!(matches!(outcome, ClosureOutcome::Closed { .. }));
        assert_eq!(closures.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn zero_balance_is_skipped() {
        let store = Arc::new(InMemoryStore::default());
        store.insert("5031234", dec!(0), dec!(1000));
        let ledger = Arc::new(InMemoryLedger::default());
        let closures = Arc::new(InMemoryClosures::default());
        let service = build(store.clone(), ledger.clone(), closures.clone());

        let outcome = service.close_project_year("5031234", 2025).await.unwrap();

        assert!(matches!(outcome, ClosureOutcome::NothingToArchive));
        assert!(closures.records.lock().unwrap().is_empty());
        assert!(ledger.list("5031234").unwrap().is_empty());
    }

    #[tokio::test]
    async fn lost_insert_race_reports_already_closed() {
        let store = Arc::new(InMemoryStore::default());
        store.insert("5031234", dec!(420), dec!(1000));
        let ledger = Arc::new(InMemoryLedger::default());
        let closures = Arc::new(InMemoryClosures::default());
        *closures.force_unique_violation.lock().unwrap() = true;
        let service = build(store.clone(), ledger.clone(), closures.clone());

        let outcome = service.close_project_year("5031234", 2025).await.unwrap();

        assert!(matches!(outcome, ClosureOutcome::AlreadyClosed));
        // The loser must not zero the balance a second time.
        assert_eq!(store.available("5031234"), dec!(420));
    }

    #[tokio::test]
    async fn sweep_tallies_every_account() {
        let store = Arc::new(InMemoryStore::default());
        store.insert("5031234", dec!(420), dec!(1000));
        store.insert("5039999", dec!(0), dec!(500));
        store.insert("5035555", dec!(75.50), dec!(200));
        let ledger = Arc::new(InMemoryLedger::default());
        let closures = Arc::new(InMemoryClosures::default());
        let service = build(store.clone(), ledger.clone(), closures.clone());

        // Pre-close one account, as a manual admin trigger would.
        service.close_project_year("5035555", 2025).await.unwrap();

        let summary = service.close_year(2025).await.unwrap();

        assert_eq!(summary.closed, 1);
        assert_eq!(summary.already_closed, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(store.available("5031234"), dec!(0));
    }
}

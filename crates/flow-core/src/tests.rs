use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    advice_service::build_prompt,
    storage::{encode_collection, MemoryStorage, TransactionStorage},
    summary_service::SummaryService,
    time::Clock,
    transaction_store::{LoadOutcome, TransactionStore},
    CoreError,
};
use flow_domain::{BreakdownKind, Transaction, TransactionKind, MAX_AMOUNT};

/// Advances one minute per reading so every transaction gets a distinct date.
struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    fn starting_at(start: DateTime<Utc>) -> Box<Self> {
        Box::new(Self {
            next: Mutex::new(start),
        })
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let current = *next;
        *next = current + Duration::minutes(1);
        current
    }
}

/// Lets a test keep inspecting the slot after handing it to a store.
struct SharedSlot(Arc<MemoryStorage>);

impl TransactionStorage for SharedSlot {
    fn read(&self) -> Result<Option<Vec<u8>>, CoreError> {
        self.0.read()
    }

    fn write(&self, payload: &[u8]) -> Result<(), CoreError> {
        self.0.write(payload)
    }
}

fn jan_first() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
}

#[test]
fn salary_rent_groceries_scenario() {
    let mut store = TransactionStore::load(Box::new(MemoryStorage::new()));
    store.add(TransactionKind::Income, 5000.0, "Salary").unwrap();
    store.add(TransactionKind::Expense, 1200.0, "Rent").unwrap();
    store.add(TransactionKind::Expense, 300.0, "Groceries").unwrap();

    let summary = SummaryService::derive(store.all());
    assert_eq!(summary.total_income, Decimal::from(5000));
    assert_eq!(summary.total_expenses, Decimal::from(1500));
    assert_eq!(summary.savings, Decimal::from(3500));
}

#[test]
fn expenses_only_scenario_produces_negative_savings_prompt() {
    let mut store = TransactionStore::load(Box::new(MemoryStorage::new()));
    store.add(TransactionKind::Expense, 200.0, "Phone").unwrap();
    store.add(TransactionKind::Expense, 150.0, "Gas").unwrap();

    let summary = SummaryService::derive(store.all());
    assert_eq!(summary.savings, Decimal::from(-350));

    let prompt = build_prompt(&summary, store.all(), 10);
    assert!(prompt.contains("Total Income: $0.00"));
    assert!(prompt.contains("Total Expenses: $350.00"));
    assert!(prompt.contains("Net Savings: $-350.00"));
}

#[test]
fn persisted_collection_round_trips_through_a_new_store() {
    let slot = Arc::new(MemoryStorage::new());
    let mut store = TransactionStore::load_with_clock(
        Box::new(SharedSlot(slot.clone())),
        SteppingClock::starting_at(jan_first()),
    );
    store.add(TransactionKind::Income, 2500.75, "Consulting").unwrap();
    store.add(TransactionKind::Expense, 19.99, "Streaming").unwrap();
    store.add(TransactionKind::Expense, 0.1, "Gum").unwrap();

    let reloaded = TransactionStore::load(Box::new(SharedSlot(slot)));

    assert_eq!(reloaded.load_outcome(), &LoadOutcome::Restored(3));
    assert_eq!(reloaded.all(), store.all());
}

#[test]
fn valid_adds_produce_one_record_each_with_unique_ids() {
    let mut store = TransactionStore::load(Box::new(MemoryStorage::new()));
    let mut ids = Vec::new();
    for idx in 0..50 {
        let kind = if idx % 2 == 0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };
        ids.push(store.add(kind, 1.0 + idx as f64, "entry").unwrap());
    }

    assert_eq!(store.len(), 50);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn presentation_order_is_date_descending() {
    let mut store = TransactionStore::load_with_clock(
        Box::new(MemoryStorage::new()),
        SteppingClock::starting_at(jan_first()),
    );
    let oldest = store.add(TransactionKind::Income, 1.0, "oldest").unwrap();
    let newest = store.add(TransactionKind::Income, 2.0, "newest").unwrap();

    let ordered = store.by_date_desc();
    assert_eq!(ordered[0].id, newest);
    assert_eq!(ordered[1].id, oldest);
    assert_eq!(ordered[0].date, jan_first() + Duration::minutes(1));
}

#[test]
fn unreadable_storage_falls_back_to_empty() {
    struct Unreadable;

    impl TransactionStorage for Unreadable {
        fn read(&self) -> Result<Option<Vec<u8>>, CoreError> {
            Err(CoreError::Storage("permission denied".into()))
        }

        fn write(&self, _payload: &[u8]) -> Result<(), CoreError> {
            Ok(())
        }
    }

    let mut store = TransactionStore::load(Box::new(Unreadable));
    assert!(store.is_empty());
    assert!(matches!(store.load_outcome(), LoadOutcome::Recovered(_)));

    store.add(TransactionKind::Income, 10.0, "still works").unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn partially_valid_payload_is_discarded_entirely() {
    let payload = r#"[
        {"id": "0b6c1b8e-6f57-4f0c-9d4f-6a8a3b1a2c11", "type": "income", "amount": 10,
         "description": "ok", "date": "2024-05-01T10:30:00.000Z"},
        {"id": "5d1c4c9a-8f6e-4a8b-9c1d-2e3f4a5b6c7d", "type": "expense", "amount": 0,
         "description": "zero", "date": "2024-05-01T10:31:00.000Z"}
    ]"#;
    let store = TransactionStore::load(Box::new(MemoryStorage::with_payload(payload)));
    assert!(store.is_empty());
}

#[test]
fn oversized_adds_are_rejected_and_never_persisted() {
    let slot = Arc::new(MemoryStorage::new());
    let mut store = TransactionStore::load(Box::new(SharedSlot(slot.clone())));

    for amount in [5e28, 1e20, 10_000_000_000_000.5] {
        let err = store.add(TransactionKind::Income, amount, "big").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
    assert!(store.is_empty());
    assert!(slot.contents().is_none());

    store.add(TransactionKind::Income, 1e13, "ceiling").unwrap();
    let reloaded = TransactionStore::load(Box::new(SharedSlot(slot)));
    assert_eq!(reloaded.load_outcome(), &LoadOutcome::Restored(1));
}

#[test]
fn payload_of_maximum_records_loads_and_summarizes() {
    let transactions: Vec<Transaction> = (0..1000)
        .map(|idx| {
            let kind = if idx % 2 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let date = jan_first() + Duration::minutes(idx);
            Transaction::new(Uuid::new_v4(), kind, MAX_AMOUNT, "max", date)
        })
        .collect();
    let payload = encode_collection(&transactions).unwrap();

    let store = TransactionStore::load(Box::new(MemoryStorage::with_payload(payload)));
    assert_eq!(store.load_outcome(), &LoadOutcome::Restored(1000));

    let summary = SummaryService::derive(store.all());
    assert_eq!(summary.total_income, MAX_AMOUNT * Decimal::from(500));
    assert_eq!(summary.savings, Decimal::ZERO);

    let breakdown = SummaryService::breakdown(&summary).unwrap();
    assert_eq!(breakdown.slices.len(), 1);
    assert_eq!(breakdown.slices[0].share, Decimal::ONE_HUNDRED);
}

#[test]
fn payload_above_the_maximum_is_treated_as_corrupt() {
    let payload = r#"[
        {"id": "0b6c1b8e-6f57-4f0c-9d4f-6a8a3b1a2c11", "type": "income", "amount": 5e28,
         "description": "big", "date": "2024-05-01T10:30:00.000Z"},
        {"id": "5d1c4c9a-8f6e-4a8b-9c1d-2e3f4a5b6c7d", "type": "income", "amount": 5e28,
         "description": "bigger", "date": "2024-05-01T10:31:00.000Z"}
    ]"#;
    let store = TransactionStore::load(Box::new(MemoryStorage::with_payload(payload)));

    assert!(store.is_empty());
    assert!(matches!(store.load_outcome(), LoadOutcome::Recovered(_)));
    assert_eq!(SummaryService::derive(store.all()).total_income, Decimal::ZERO);
}

#[test]
fn single_maximum_expense_fills_the_deficit_chart() {
    let mut store = TransactionStore::load(Box::new(MemoryStorage::new()));
    store.add(TransactionKind::Expense, 1e13, "House").unwrap();

    let summary = SummaryService::derive(store.all());
    assert_eq!(summary.savings, -MAX_AMOUNT);

    let breakdown = SummaryService::breakdown(&summary).unwrap();
    assert_eq!(breakdown.kind, BreakdownKind::Deficit);
    assert_eq!(breakdown.slices.len(), 1);
    assert_eq!(breakdown.slices[0].label, "Overspending");
    assert_eq!(breakdown.slices[0].share, Decimal::ONE_HUNDRED);
}

#[test]
fn amounts_near_the_maximum_round_trip_exactly() {
    let slot = Arc::new(MemoryStorage::new());
    let mut store = TransactionStore::load_with_clock(
        Box::new(SharedSlot(slot.clone())),
        SteppingClock::starting_at(jan_first()),
    );
    store.add(TransactionKind::Income, 1e13, "ceiling").unwrap();
    store.add(TransactionKind::Income, 9_999_999_999_999.75, "just under").unwrap();
    store.add(TransactionKind::Expense, 8_796_093_022_208.25, "large").unwrap();

    let reloaded = TransactionStore::load(Box::new(SharedSlot(slot)));

    assert_eq!(reloaded.load_outcome(), &LoadOutcome::Restored(3));
    assert_eq!(reloaded.all(), store.all());
    assert!(reloaded.all().iter().any(|txn| txn.amount == MAX_AMOUNT));
}

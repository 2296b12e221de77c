//! Tests for history domain models.

#[cfg(test)]
mod tests {
    use crate::history::{BudgetHistoryEntry, ChangeType};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_change_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ChangeType::DocumentCreation).unwrap(),
            "\"DOCUMENT_CREATION\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeType::YearEndClosure).unwrap(),
            "\"YEAR_END_CLOSURE\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeType::ManualAdjustment).unwrap(),
            "\"MANUAL_ADJUSTMENT\""
        );
    }

    #[test]
    fn test_change_type_round_trip() {
        for ct in [
            ChangeType::DocumentCreation,
            ChangeType::YearEndClosure,
            ChangeType::ManualAdjustment,
        ] {
            assert_eq!(ChangeType::from_str(ct.as_str()), Some(ct));
        }
        assert_eq!(ChangeType::from_str("RENEWAL"), None);
    }

    #[test]
    fn test_entry_with_dangling_document_serializes() {
        // A deleted document leaves the id in place; the entry must still
        // serialize so consumers can render a placeholder.
        let entry = BudgetHistoryEntry {
            id: 42,
            project_id: "5031234".to_string(),
            previous_amount: dec!(1000),
            new_amount: dec!(150),
            change_type: ChangeType::DocumentCreation,
            change_reason: "Payment document".to_string(),
            document_id: Some("doc-gone".to_string()),
            created_by: Some("user-7".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["documentId"], "doc-gone");
        assert_eq!(json["changeType"], "DOCUMENT_CREATION");
    }
}

// Unit tests for record types, chart aggregation, and row formatting
//
// These verify the pure rendering layer: category totals and their label
// order, goal progress arithmetic (including the zero-target edge), and the
// wire shapes of the server-owned records.

use chrono::{TimeZone, Utc};
use voice_ledger::view::{expense_row, goal_row};
use voice_ledger::{CategoryBreakdown, Expense, Goal, SummaryStats};

fn expense(category: &str, amount: f64) -> Expense {
    Expense {
        amount,
        category: category.to_string(),
        payment_method: "UPI".to_string(),
        timestamp: Utc.with_ymd_and_hms(2025, 11, 2, 9, 30, 0).unwrap(),
    }
}

#[test]
fn test_category_totals_and_label_order() {
    let expenses = vec![
        expense("food", 10.0),
        expense("fuel", 5.0),
        expense("food", 3.0),
    ];

    let breakdown = CategoryBreakdown::from_expenses(&expenses);
    let slices = breakdown.slices();

    assert_eq!(slices.len(), 2);
    // First-seen order decides the labels; amounts sum per category.
    assert_eq!(slices[0].category, "food");
    assert_eq!(slices[0].total, 13.0);
    assert_eq!(slices[1].category, "fuel");
    assert_eq!(slices[1].total, 5.0);
    assert_eq!(breakdown.grand_total(), 18.0);
}

#[test]
fn test_category_totals_are_order_independent() {
    let forward = vec![
        expense("food", 10.0),
        expense("fuel", 5.0),
        expense("food", 3.0),
    ];
    let shuffled = vec![
        expense("food", 3.0),
        expense("food", 10.0),
        expense("fuel", 5.0),
    ];

    let a = CategoryBreakdown::from_expenses(&forward);
    let b = CategoryBreakdown::from_expenses(&shuffled);

    for slice in a.slices() {
        let other = b
            .slices()
            .iter()
            .find(|s| s.category == slice.category)
            .expect("category present in both");
        assert_eq!(slice.total, other.total);
    }
    assert_eq!(a.grand_total(), b.grand_total());
}

#[test]
fn test_empty_expense_list_yields_empty_breakdown() {
    let breakdown = CategoryBreakdown::from_expenses(&[]);
    assert!(breakdown.is_empty());
    assert_eq!(breakdown.grand_total(), 0.0);
}

#[test]
fn test_goal_progress_percentages() {
    let quarter = Goal {
        name: "Laptop".to_string(),
        saved: 50.0,
        target: 200.0,
    };
    assert_eq!(quarter.progress_percent(), 25.0);

    // Overshooting is reported as-is, not clamped.
    let over = Goal {
        name: "Watch".to_string(),
        saved: 250.0,
        target: 200.0,
    };
    assert_eq!(over.progress_percent(), 125.0);
}

#[test]
fn test_zero_target_reads_as_zero_percent() {
    let goal = Goal {
        name: "Unset".to_string(),
        saved: 0.0,
        target: 0.0,
    };
    assert_eq!(goal.progress_percent(), 0.0);

    // Even with savings against a zero target, no NaN/infinity leaks out.
    let odd = Goal {
        name: "Odd".to_string(),
        saved: 100.0,
        target: 0.0,
    };
    assert!(odd.progress_percent().is_finite());
    assert_eq!(odd.progress_percent(), 0.0);
}

#[test]
fn test_goal_row_shows_unclamped_percentage() {
    let over = Goal {
        name: "Watch".to_string(),
        saved: 250.0,
        target: 200.0,
    };
    let row = goal_row(&over);
    assert!(row.contains("Watch"), "row: {}", row);
    assert!(row.contains("125%"), "row: {}", row);
}

#[test]
fn test_expense_row_contains_all_fields() {
    let e = expense("Food", 120.0);
    let row = expense_row(&e);
    assert!(row.contains("120.00"), "row: {}", row);
    assert!(row.contains("Food"), "row: {}", row);
    assert!(row.contains("UPI"), "row: {}", row);
    assert!(row.contains("2025"), "row: {}", row);
}

#[test]
fn test_records_deserialize_from_wire_json() {
    let expense: Expense = serde_json::from_str(
        r#"{
            "amount": 99.5,
            "category": "Bills",
            "payment_method": "Card",
            "timestamp": "2025-11-02T09:30:00Z"
        }"#,
    )
    .unwrap();
    assert_eq!(expense.amount, 99.5);
    assert_eq!(expense.category, "Bills");

    let goal: Goal =
        serde_json::from_str(r#"{ "name": "Trip", "saved": 1200.0, "target": 5000.0 }"#).unwrap();
    assert_eq!(goal.progress_percent(), 24.0);

    let summary: SummaryStats = serde_json::from_str(
        r#"{
            "total_spent": 4200.0,
            "avg_expense": 84.0,
            "total_expenses": 50,
            "total_saved": 6200.0
        }"#,
    )
    .unwrap();
    assert_eq!(summary.total_expenses, 50);
}

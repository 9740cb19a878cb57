#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Transaction ───────────────────────────────────────────────

fn make_txn(amount: Decimal, date: &str) -> Transaction {
    Transaction {
        id: None,
        amount,
        description: "Test".into(),
        category: String::new(),
        date: date.into(),
        latitude: None,
        longitude: None,
        created_at: String::new(),
    }
}

#[test]
fn test_income() {
    let txn = make_txn(dec!(100.00), "2024-01-15");
    assert!(txn.is_income());
    assert!(!txn.is_expense());
}

#[test]
fn test_expense() {
    let txn = make_txn(dec!(-50.00), "2024-01-15");
    assert!(!txn.is_income());
    assert!(txn.is_expense());
}

#[test]
fn test_zero_is_neither() {
    let txn = make_txn(Decimal::ZERO, "2024-01-15");
    assert!(!txn.is_income());
    assert!(!txn.is_expense());
}

#[test]
fn test_abs_amount() {
    assert_eq!(make_txn(dec!(-42.99), "2024-01-15").abs_amount(), dec!(42.99));
    assert_eq!(make_txn(dec!(42.99), "2024-01-15").abs_amount(), dec!(42.99));
    assert_eq!(make_txn(Decimal::ZERO, "2024-01-15").abs_amount(), Decimal::ZERO);
}

#[test]
fn test_new_defaults() {
    let txn = Transaction::new(dec!(-9.50), "Lunch".into(), "2024-03-02".into());
    assert!(txn.id.is_none());
    assert_eq!(txn.description, "Lunch");
    assert!(txn.category.is_empty());
    assert!(txn.latitude.is_none());
    assert!(txn.longitude.is_none());
    assert!(!txn.created_at.is_empty());
}

#[test]
fn test_parsed_date_valid() {
    let txn = make_txn(dec!(1), "2024-02-29");
    let date = txn.parsed_date().unwrap();
    assert_eq!(date.to_string(), "2024-02-29");
}

#[test]
fn test_parsed_date_malformed() {
    assert!(make_txn(dec!(1), "not-a-date").parsed_date().is_none());
    assert!(make_txn(dec!(1), "").parsed_date().is_none());
    assert!(make_txn(dec!(1), "2023-02-29").parsed_date().is_none());
    assert!(make_txn(dec!(1), "2024-13-01").parsed_date().is_none());
}

#[test]
fn test_location_pair() {
    let mut txn = make_txn(dec!(-5), "2024-01-15");
    assert!(!txn.has_location());
    assert!(txn.location_display().is_none());

    txn.latitude = Some(37.7749);
    // Half a pair is not a location
    assert!(!txn.has_location());
    assert!(txn.location_display().is_none());

    txn.longitude = Some(-122.4194);
    assert!(txn.has_location());
    assert_eq!(txn.location_display().unwrap(), "37.7749, -122.4194");
}

// ── Alert ─────────────────────────────────────────────────────

#[test]
fn test_alert_new() {
    let alert = Alert::new("Spending Limit Reached".into(), "Over by $10".into());
    assert!(alert.id.is_none());
    assert_eq!(alert.title, "Spending Limit Reached");
    assert!(!alert.seen);
    assert!(!alert.created_at.is_empty());
}

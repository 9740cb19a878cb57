#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::models::Transaction;

fn txn(amount: Decimal, date: &str) -> Transaction {
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

fn mid_june() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

// ── evaluate ──────────────────────────────────────────────────

#[test]
fn test_evaluate_over() {
    let txns = vec![txn(dec!(-50), "2024-06-01"), txn(dec!(-60), "2024-06-02")];
    let status = evaluate(&txns, Some(dec!(100)), mid_june());
    assert_eq!(status.total, dec!(110));
    assert_eq!(status.limit, Some(dec!(100)));
    assert!(status.over);
}

#[test]
fn test_evaluate_under() {
    let txns = vec![txn(dec!(-50), "2024-06-01")];
    let status = evaluate(&txns, Some(dec!(100)), mid_june());
    assert_eq!(status.total, dec!(50));
    assert!(!status.over);
}

#[test]
fn test_evaluate_no_limit() {
    let txns = vec![txn(dec!(30), "2024-06-08")];
    let status = evaluate(&txns, None, mid_june());
    assert_eq!(status.total, dec!(30));
    assert!(!status.over);
}

#[test]
fn test_evaluate_ignores_other_months() {
    let txns = vec![txn(dec!(-1000), "2024-05-31"), txn(dec!(-10), "2024-06-01")];
    let status = evaluate(&txns, Some(dec!(100)), mid_june());
    assert_eq!(status.total, dec!(10));
    assert!(!status.over);
}

// ── refresh ───────────────────────────────────────────────────

#[test]
fn test_refresh_records_alert_on_breach() {
    let db = Database::open_in_memory().unwrap();
    db.set_spending_limit(dec!(100)).unwrap();
    db.insert_transaction(&txn(dec!(-150), "2024-06-10")).unwrap();

    let (status, alert) = refresh(&db, mid_june()).unwrap();
    assert!(status.over);
    assert!(db.get_over_limit_flag().unwrap());

    let alert = alert.unwrap();
    assert_eq!(alert.title, "Spending Limit Reached");
    assert!(alert.message.contains("$150.00"));
    assert!(alert.message.contains("$100.00"));
    assert_eq!(db.get_alerts().unwrap().len(), 1);
}

#[test]
fn test_refresh_no_alert_while_still_over() {
    let db = Database::open_in_memory().unwrap();
    db.set_spending_limit(dec!(100)).unwrap();
    db.insert_transaction(&txn(dec!(-150), "2024-06-10")).unwrap();

    refresh(&db, mid_june()).unwrap();
    db.insert_transaction(&txn(dec!(-5), "2024-06-11")).unwrap();
    let (status, alert) = refresh(&db, mid_june()).unwrap();

    assert!(status.over);
    assert!(alert.is_none());
    assert_eq!(db.get_alerts().unwrap().len(), 1);
}

#[test]
fn test_refresh_clears_flag_when_back_under() {
    let db = Database::open_in_memory().unwrap();
    db.set_spending_limit(dec!(100)).unwrap();
    let id = db.insert_transaction(&txn(dec!(-150), "2024-06-10")).unwrap();
    refresh(&db, mid_june()).unwrap();
    assert!(db.get_over_limit_flag().unwrap());

    db.delete_transaction(id).unwrap();
    let (status, alert) = refresh(&db, mid_june()).unwrap();

    assert!(!status.over);
    assert!(alert.is_none());
    assert!(!db.get_over_limit_flag().unwrap());
}

#[test]
fn test_refresh_alerts_again_after_recovery() {
    let db = Database::open_in_memory().unwrap();
    db.set_spending_limit(dec!(100)).unwrap();

    let id = db.insert_transaction(&txn(dec!(-150), "2024-06-10")).unwrap();
    refresh(&db, mid_june()).unwrap();

    db.delete_transaction(id).unwrap();
    refresh(&db, mid_june()).unwrap();

    db.insert_transaction(&txn(dec!(-200), "2024-06-12")).unwrap();
    let (_, alert) = refresh(&db, mid_june()).unwrap();

    assert!(alert.is_some());
    assert_eq!(db.get_alerts().unwrap().len(), 2);
}

#[test]
fn test_refresh_without_limit_configured() {
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&txn(dec!(-99999), "2024-06-10")).unwrap();

    let (status, alert) = refresh(&db, mid_june()).unwrap();
    assert!(!status.over);
    assert!(alert.is_none());
    assert!(!db.get_over_limit_flag().unwrap());
    assert!(db.get_alerts().unwrap().is_empty());
}

#[test]
fn test_refresh_at_exact_limit_not_over() {
    let db = Database::open_in_memory().unwrap();
    db.set_spending_limit(dec!(100)).unwrap();
    db.insert_transaction(&txn(dec!(-100), "2024-06-10")).unwrap();

    let (status, alert) = refresh(&db, mid_june()).unwrap();
    assert_eq!(status.total, dec!(100));
    assert!(!status.over);
    assert!(alert.is_none());
}

#[test]
fn test_refresh_clearing_limit_clears_flag() {
    let db = Database::open_in_memory().unwrap();
    db.set_spending_limit(dec!(100)).unwrap();
    db.insert_transaction(&txn(dec!(-150), "2024-06-10")).unwrap();
    refresh(&db, mid_june()).unwrap();

    db.clear_spending_limit().unwrap();
    let (status, alert) = refresh(&db, mid_june()).unwrap();

    assert!(!status.over);
    assert!(alert.is_none());
    assert!(!db.get_over_limit_flag().unwrap());
}

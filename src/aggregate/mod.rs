use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::Transaction;

/// Total magnitude of everything recorded in `now`'s calendar month.
///
/// Sums `abs(amount)` over transactions whose date has the same month and
/// year as `now`. Order and sign do not matter; transactions outside the
/// month, or with dates that fail to parse, contribute nothing.
pub fn monthly_total(transactions: &[Transaction], now: NaiveDate) -> Decimal {
    transactions
        .iter()
        .filter(|t| in_month(t, now))
        .map(Transaction::abs_amount)
        .sum()
}

/// Income and expense totals for `now`'s calendar month.
///
/// Returns `(income, expenses)` where both values are non-negative:
/// positive amounts are summed as income, negative amounts are summed by
/// magnitude as expenses.
pub fn monthly_breakdown(transactions: &[Transaction], now: NaiveDate) -> (Decimal, Decimal) {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for txn in transactions.iter().filter(|t| in_month(t, now)) {
        if txn.is_income() {
            income += txn.amount;
        } else {
            expenses += txn.abs_amount();
        }
    }
    (income, expenses)
}

/// Whether `total` breaches a configured monthly limit.
///
/// `None` or a non-positive limit means no limit is configured and nothing
/// is ever over. Otherwise strictly greater: a total equal to the limit is
/// not over.
pub fn is_over_limit(total: Decimal, limit: Option<Decimal>) -> bool {
    match limit {
        Some(limit) if limit > Decimal::ZERO => total > limit,
        _ => false,
    }
}

fn in_month(txn: &Transaction, now: NaiveDate) -> bool {
    txn.parsed_date()
        .is_some_and(|d| d.month() == now.month() && d.year() == now.year())
}

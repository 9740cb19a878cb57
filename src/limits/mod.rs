use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aggregate;
use crate::db::Database;
use crate::models::{Alert, Transaction};

/// Result of checking the current month against the configured limit.
#[derive(Debug, Clone)]
pub struct LimitStatus {
    pub total: Decimal,
    pub limit: Option<Decimal>,
    pub over: bool,
}

/// Pure evaluation of the over-limit signal for `today`'s month.
pub fn evaluate(
    transactions: &[Transaction],
    limit: Option<Decimal>,
    today: NaiveDate,
) -> LimitStatus {
    let total = aggregate::monthly_total(transactions, today);
    LimitStatus {
        total,
        limit,
        over: aggregate::is_over_limit(total, limit),
    }
}

/// Recomputes the over-limit flag against the full stored transaction set.
///
/// Called after initial load and after every transaction mutation. The
/// previous flag value decides alerting: crossing from under to over
/// records an `Alert` and returns it; staying over stays silent; dropping
/// back under just clears the flag.
pub(crate) fn refresh(db: &Database, today: NaiveDate) -> Result<(LimitStatus, Option<Alert>)> {
    let transactions = db.get_all_transactions()?;
    let limit = db.get_spending_limit()?;
    let status = evaluate(&transactions, limit, today);

    let was_over = db.get_over_limit_flag()?;
    db.set_over_limit_flag(status.over)?;

    if status.over && !was_over {
        let alert = breach_alert(&status);
        db.insert_alert(&alert)?;
        return Ok((status, Some(alert)));
    }

    Ok((status, None))
}

fn breach_alert(status: &LimitStatus) -> Alert {
    let limit = status.limit.unwrap_or_default();
    Alert::new(
        "Spending Limit Reached".into(),
        format!(
            "You've spent ${:.2} this month, over your ${:.2} limit.",
            status.total, limit
        ),
    )
}

#[cfg(test)]
mod tests;

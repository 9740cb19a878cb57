use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A single recorded income or expense event.
///
/// Amounts are signed: negative = expense, positive = income.
/// `date` is stored as "YYYY-MM-DD"; a value that fails to parse is
/// simply never counted toward any month.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: String,
}

impl Transaction {
    pub fn new(amount: Decimal, description: String, date: String) -> Self {
        Self {
            id: None,
            amount,
            description,
            category: String::new(),
            date,
            latitude: None,
            longitude: None,
            created_at: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// The calendar date, or `None` when the stored string is malformed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// "lat, lon" to 4 decimal places, or `None` without a full pair.
    pub fn location_display(&self) -> Option<String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(format!("{lat:.4}, {lon:.4}")),
            _ => None,
        }
    }
}

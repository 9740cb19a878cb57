mod alert;
mod transaction;

pub use alert::Alert;
pub use transaction::Transaction;

#[cfg(test)]
mod tests;

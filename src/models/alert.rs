/// An in-app notification recorded when the spending limit is breached.
#[derive(Debug, Clone)]
pub struct Alert {
    pub id: Option<i64>,
    pub title: String,
    pub message: String,
    pub created_at: String,
    pub seen: bool,
}

impl Alert {
    pub fn new(title: String, message: String) -> Self {
        Self {
            id: None,
            title,
            message,
            created_at: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            seen: false,
        }
    }
}

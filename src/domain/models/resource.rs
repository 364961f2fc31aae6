use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ResourceCategory {
    Indoor,
    Outdoor,
}

/// A bookable court. Immutable once seeded.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub category: ResourceCategory,
    pub price_per_hour: f64,
    pub icon: Option<String>,
}

impl Resource {
    pub fn new(id: &str, name: &str, category: ResourceCategory, price_per_hour: f64, icon: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            price_per_hour,
            icon: icon.map(str::to_string),
        }
    }
}

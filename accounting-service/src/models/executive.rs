use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sales-side roles commission rules can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutiveRole {
    SalesExecutive,
    SalesManager,
    Director,
}

impl ExecutiveRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesExecutive => "sales_executive",
            Self::SalesManager => "sales_manager",
            Self::Director => "director",
        }
    }
}

impl std::fmt::Display for ExecutiveRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Executive {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: ExecutiveRole,
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Executive {
    pub fn new(name: String, phone: String, role: ExecutiveRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            phone,
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

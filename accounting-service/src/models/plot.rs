use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStatus {
    Vacant,
    Booked,
    Sold,
    Hold,
}

impl PlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vacant => "vacant",
            Self::Booked => "booked",
            Self::Sold => "sold",
            Self::Hold => "hold",
        }
    }
}

impl std::fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single plot inside a project. `total_value` is derived from size and
/// rate on every create/update; a plot becomes `sold` exactly once, when a
/// customer is booked against it, and never leaves that status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plot {
    #[serde(rename = "_id")]
    pub id: String,
    pub project_id: String,
    pub plot_number: String,
    pub size_sqft: f64,
    pub rate_per_sqft: f64,
    pub total_value: f64,
    pub status: PlotStatus,
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Plot {
    pub fn new(project_id: String, plot_number: String, size_sqft: f64, rate_per_sqft: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            plot_number,
            size_sqft,
            rate_per_sqft,
            total_value: Self::compute_total(size_sqft, rate_per_sqft),
            status: PlotStatus::Vacant,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn compute_total(size_sqft: f64, rate_per_sqft: f64) -> f64 {
        round2(size_sqft * rate_per_sqft)
    }

    /// Only vacant plots take a booking; booked/hold plots must be released
    /// back to vacant first, and sold is terminal.
    pub fn is_bookable(&self) -> bool {
        self.active && self.status == PlotStatus::Vacant
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One device's current choice for one question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub question_id: String,
    pub option_id: String,
    /// Pseudo-user; at most one vote exists per (question_id, device_id)
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
}

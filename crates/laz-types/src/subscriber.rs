//! Newsletter subscriber types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored newsletter sign-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/subscribe` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

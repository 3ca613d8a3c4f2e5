use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row. `id` is the OAuth provider subject, so it is a string rather
/// than a UUID. The Stripe columns are filled lazily by the payment flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub subscription_status: Option<String>,
    pub subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

//! Webhook event dispatch. Runs only after signature verification; each
//! event type maps to one datastore mutation, everything else is ignored.

use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::premium::FeatureType;
use crate::premium::store;

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: Value,
}

pub async fn process_event(pool: &PgPool, event: &StripeEvent) -> Result<(), AppError> {
    match event.event_type.as_str() {
        "checkout.session.completed" => handle_checkout_completed(pool, &event.data.object).await,
        "customer.subscription.updated" | "customer.subscription.deleted" => {
            handle_subscription_change(pool, &event.event_type, &event.data.object).await
        }
        other => {
            debug!("Ignoring webhook event type {other}");
            Ok(())
        }
    }
}

async fn handle_checkout_completed(pool: &PgPool, object: &Value) -> Result<(), AppError> {
    let (user_id, resume_id) = checkout_metadata(object)?;

    store::grant_entitlement(pool, &user_id, resume_id, FeatureType::Premium).await?;

    info!("Granted premium entitlement for user {user_id}, resume {resume_id}");
    Ok(())
}

/// Pulls the entitlement coordinates out of the session metadata the
/// checkout flow tagged onto the session.
fn checkout_metadata(object: &Value) -> Result<(String, Uuid), AppError> {
    let user_id = object
        .pointer("/metadata/user_id")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::Validation("checkout session missing user_id metadata".to_string())
        })?;

    let resume_id = object
        .pointer("/metadata/resume_id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| {
            AppError::Validation("checkout session missing resume_id metadata".to_string())
        })?;

    Ok((user_id.to_string(), resume_id))
}

async fn handle_subscription_change(
    pool: &PgPool,
    event_type: &str,
    object: &Value,
) -> Result<(), AppError> {
    let customer_id = object
        .get("customer")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Validation("subscription event missing customer".to_string()))?;

    let subscription_id = object.get("id").and_then(Value::as_str);
    let status = subscription_status(event_type, object);

    sqlx::query(
        r#"
        UPDATE users
        SET subscription_status = $2, subscription_id = $3
        WHERE stripe_customer_id = $1
        "#,
    )
    .bind(customer_id)
    .bind(status)
    .bind(subscription_id)
    .execute(pool)
    .await?;

    info!("Subscription {event_type} for customer {customer_id}: status={status}");
    Ok(())
}

fn subscription_status<'a>(event_type: &str, object: &'a Value) -> &'a str {
    if event_type == "customer.subscription.deleted" {
        "canceled"
    } else {
        object
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserializes_from_stripe_shape() {
        let body = r#"{
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_1",
                    "metadata": {
                        "user_id": "u1",
                        "resume_id": "00000000-0000-0000-0000-000000000000",
                        "feature_type": "premium"
                    }
                }
            }
        }"#;
        let event: StripeEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object["id"], "cs_1");
    }

    #[test]
    fn test_checkout_metadata_extraction() {
        let object = json!({
            "metadata": {
                "user_id": "u1",
                "resume_id": "00000000-0000-0000-0000-000000000000"
            }
        });
        let (user_id, resume_id) = checkout_metadata(&object).unwrap();
        assert_eq!(user_id, "u1");
        assert_eq!(resume_id, Uuid::nil());
    }

    #[test]
    fn test_checkout_metadata_missing_user_is_rejected() {
        let object = json!({
            "metadata": { "resume_id": "00000000-0000-0000-0000-000000000000" }
        });
        assert!(matches!(
            checkout_metadata(&object),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_checkout_metadata_bad_resume_uuid_is_rejected() {
        let object = json!({
            "metadata": { "user_id": "u1", "resume_id": "not-a-uuid" }
        });
        assert!(matches!(
            checkout_metadata(&object),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_subscription_status_for_deleted_event() {
        let object = json!({"status": "active"});
        assert_eq!(
            subscription_status("customer.subscription.deleted", &object),
            "canceled"
        );
        assert_eq!(
            subscription_status("customer.subscription.updated", &object),
            "active"
        );
    }
}

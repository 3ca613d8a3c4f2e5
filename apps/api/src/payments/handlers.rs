//! Axum route handlers for the payment flow.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;
use uuid::Uuid;

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::premium::FeatureType;
use crate::models::user::UserRow;
use crate::payments::signature::verify_signature;
use crate::payments::stripe::CheckoutParams;
use crate::payments::webhook::{self, StripeEvent};
use crate::premium::store;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub session_id: String,
    pub url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/stripe/create-checkout
///
/// Creates a hosted checkout session for the premium upgrade of one resume.
/// Conflicts if premium is already active for this (user, resume) pair.
pub async fn handle_create_checkout(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, AppError> {
    let resume_id = request
        .resume_id
        .ok_or_else(|| AppError::Validation("resumeId is required".to_string()))?;

    let existing = store::find_active_entitlement(
        &state.db,
        &session.user_id,
        resume_id,
        FeatureType::Premium,
    )
    .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Premium is already active for this resume".to_string(),
        ));
    }

    let customer_id = get_or_create_customer(&state, &session).await?;

    let base = state.config.app_base_url.trim_end_matches('/');
    let params = CheckoutParams {
        customer_id,
        price_id: state.config.stripe_price_id.clone(),
        success_url: format!("{base}/builder/{resume_id}?checkout=success"),
        cancel_url: format!("{base}/builder/{resume_id}?checkout=cancelled"),
        user_id: session.user_id.clone(),
        resume_id,
        feature_type: FeatureType::Premium.as_str().to_string(),
    };

    let checkout = state.stripe.create_checkout_session(&params).await?;

    Ok(Json(CreateCheckoutResponse {
        session_id: checkout.id,
        url: checkout.url,
    }))
}

/// Reuses the stored payment-provider customer, creating one on first
/// checkout and persisting its id back onto the user row.
async fn get_or_create_customer(state: &AppState, session: &Session) -> Result<String, AppError> {
    let existing: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(&session.user_id)
        .fetch_optional(&state.db)
        .await?;

    if let Some(customer_id) = existing.and_then(|user| user.stripe_customer_id) {
        return Ok(customer_id);
    }

    let customer = state
        .stripe
        .create_customer(&session.user_id, session.email.as_deref())
        .await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, email, stripe_customer_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (id)
        DO UPDATE SET stripe_customer_id = EXCLUDED.stripe_customer_id
        "#,
    )
    .bind(&session.user_id)
    .bind(&session.email)
    .bind(&customer.id)
    .execute(&state.db)
    .await?;

    Ok(customer.id)
}

/// POST /api/stripe/webhook
///
/// Verifies the signature against the exact raw body bytes, then dispatches
/// the event. Every verified event is acknowledged with 200 — including ones
/// whose processing failed — so provider retries are not mistaken for
/// handler bugs. Only a signature failure returns 400.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::SignatureVerification("missing Stripe-Signature header".to_string())
        })?;

    verify_signature(
        &body,
        signature,
        &state.config.stripe_webhook_secret,
        Utc::now().timestamp(),
    )
    .map_err(|e| AppError::SignatureVerification(e.to_string()))?;

    match serde_json::from_slice::<StripeEvent>(&body) {
        Ok(event) => {
            if let Err(e) = webhook::process_event(&state.db, &event).await {
                error!("Webhook {} processing failed: {e}", event.event_type);
            }
        }
        Err(e) => error!("Webhook payload did not parse: {e}"),
    }

    Ok(Json(json!({ "received": true })))
}

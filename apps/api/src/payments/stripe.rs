//! Minimal Stripe REST client — customers and checkout sessions only,
//! form-encoded the way the Stripe API expects.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const STRIPE_API_URL: &str = "https://api.stripe.com/v1";

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: String,
}

/// A payment-provider customer. Only the id is used here; it is persisted
/// on the user row and reused for later checkouts.
#[derive(Debug, Deserialize)]
pub struct Customer {
    pub id: String,
}

/// A hosted checkout session: the id drives the client-side redirect.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Parameters for a one-time-payment checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    pub customer_id: String,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub user_id: String,
    pub resume_id: Uuid,
    pub feature_type: String,
}

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            secret_key,
        }
    }

    pub async fn create_customer(
        &self,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<Customer, StripeError> {
        let form = build_customer_form(user_id, email);
        self.post_form("/customers", &form).await
    }

    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams,
    ) -> Result<CheckoutSession, StripeError> {
        let form = build_session_form(params);
        self.post_form("/checkout/sessions", &form).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, StripeError> {
        let response = self
            .client
            .post(format!("{STRIPE_API_URL}{path}"))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Stripe {path} call succeeded");
        response.json().await.map_err(StripeError::Http)
    }
}

fn build_customer_form(user_id: &str, email: Option<&str>) -> Vec<(String, String)> {
    let mut form = vec![("metadata[user_id]".to_string(), user_id.to_string())];
    if let Some(email) = email {
        form.push(("email".to_string(), email.to_string()));
    }
    form
}

/// One-time payment, single line item, metadata carrying everything the
/// webhook needs to grant the entitlement.
fn build_session_form(params: &CheckoutParams) -> Vec<(String, String)> {
    vec![
        ("mode".to_string(), "payment".to_string()),
        ("customer".to_string(), params.customer_id.clone()),
        ("line_items[0][price]".to_string(), params.price_id.clone()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("success_url".to_string(), params.success_url.clone()),
        ("cancel_url".to_string(), params.cancel_url.clone()),
        ("metadata[user_id]".to_string(), params.user_id.clone()),
        (
            "metadata[resume_id]".to_string(),
            params.resume_id.to_string(),
        ),
        (
            "metadata[feature_type]".to_string(),
            params.feature_type.clone(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CheckoutParams {
        CheckoutParams {
            customer_id: "cus_123".to_string(),
            price_id: "price_abc".to_string(),
            success_url: "https://app.example.com/builder/r1?checkout=success".to_string(),
            cancel_url: "https://app.example.com/builder/r1?checkout=cancelled".to_string(),
            user_id: "u1".to_string(),
            resume_id: Uuid::nil(),
            feature_type: "premium".to_string(),
        }
    }

    fn get<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_session_form_is_one_time_payment() {
        let form = build_session_form(&params());
        assert_eq!(get(&form, "mode"), Some("payment"));
        assert_eq!(get(&form, "line_items[0][price]"), Some("price_abc"));
        assert_eq!(get(&form, "line_items[0][quantity]"), Some("1"));
    }

    #[test]
    fn test_session_form_carries_entitlement_metadata() {
        let form = build_session_form(&params());
        assert_eq!(get(&form, "metadata[user_id]"), Some("u1"));
        assert_eq!(
            get(&form, "metadata[resume_id]"),
            Some(Uuid::nil().to_string().as_str())
        );
        assert_eq!(get(&form, "metadata[feature_type]"), Some("premium"));
    }

    #[test]
    fn test_customer_form_omits_missing_email() {
        let form = build_customer_form("u1", None);
        assert_eq!(form.len(), 1);
        assert_eq!(get(&form, "metadata[user_id]"), Some("u1"));

        let form = build_customer_form("u1", Some("a@x.com"));
        assert_eq!(get(&form, "email"), Some("a@x.com"));
    }
}

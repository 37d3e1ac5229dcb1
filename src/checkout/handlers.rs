use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use super::{
    dto::{CheckoutRequest, CheckoutResponse},
    gateway::{CheckoutLine, CheckoutSessionRequest},
};
use crate::{auth::extractors::AuthUser, error::ApiError, extract::ApiJson, state::AppState};

pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout))
}

#[instrument(skip_all, fields(user_id = %user.id, items = body.items.len()))]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    if body.items.is_empty() {
        warn!("empty cart");
        return Err(ApiError::BadRequest("Cart is empty".into()));
    }
    if body
        .items
        .iter()
        .any(|item| item.quantity == 0 || item.id.trim().is_empty())
    {
        warn!("cart item with zero quantity or blank id");
        return Err(ApiError::BadRequest("Invalid cart item".into()));
    }

    let frontend = &state.config.frontend_url;
    let req = CheckoutSessionRequest {
        lines: body
            .items
            .into_iter()
            .map(|item| CheckoutLine {
                price_id: item.id.trim().to_string(),
                quantity: item.quantity,
            })
            .collect(),
        // Stripe substitutes the session id into this placeholder
        success_url: format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", frontend),
        cancel_url: format!("{}/cancel", frontend),
        customer_email: Some(user.email),
    };

    let session = state.payments.create_checkout_session(&req).await?;

    info!(session_id = %session.id, "checkout session created");
    Ok(Json(CheckoutResponse {
        url: session.url,
        customer_email: session.customer_email,
    }))
}

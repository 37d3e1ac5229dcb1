use serde::{Deserialize, Serialize};

/// Item in checkout request; `id` is the provider price id.
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub customer_email: Option<String>,
}

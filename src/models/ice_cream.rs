use serde::{Deserialize, Serialize};

/// Core inventory entity. The id is generated by the database
/// (`INTEGER PRIMARY KEY AUTOINCREMENT`), so it is never accepted on input.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IceCream {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Price as a plain decimal amount (e.g. 3.5 = $3.50)
    pub price: f64,
    pub quantity: i64,
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateIceCream {
    pub name: String,
    /// Omitted in the request body → empty string
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Omitted in the request body → 0
    #[serde(default)]
    pub quantity: i64,
}

/// Partial update: only fields present in the body are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateIceCream {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

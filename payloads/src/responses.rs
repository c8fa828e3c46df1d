use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{DiseaseSeverity, FarmId, OrderId, OrderStatus, ProductId, ScanId};

/// Bearer token issued on a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    /// Optional display name shown in the header; falls back to username.
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    pub id: FarmId,
    pub name: String,
    pub location: String,
    pub crop: String,
    pub created_at: Timestamp,
}

/// A processed plant scan with the model's diagnosis.
///
/// `disease` is `None` when the model found the plant healthy; in that case
/// `severity` is `None` as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub id: ScanId,
    pub farm_id: FarmId,
    pub image_ref: String,
    pub disease: Option<String>,
    /// Model confidence in the diagnosis, 0.0 to 1.0.
    pub confidence: f64,
    pub severity: Option<DiseaseSeverity>,
    pub scanned_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub unit_price_cents: u32,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub customer_name: String,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

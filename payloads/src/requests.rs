use serde::{Deserialize, Serialize};

use crate::{FarmId, OrderId, OrderStatus, ProductId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFarm {
    pub name: String,
    pub location: String,
    /// Primary crop grown on the farm, e.g. "potato".
    pub crop: String,
}

/// A plant photo uploaded for disease analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScan {
    pub farm_id: FarmId,
    /// Storage reference of the uploaded image; the image bytes themselves
    /// go through a separate upload endpoint.
    pub image_ref: String,
    pub captured_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub sku: String,
    pub unit_price_cents: u32,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub product_id: ProductId,
    pub quantity: u32,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

//! Deterministic sample data served by the mock backend.
//!
//! Fixed IDs and timestamps so tests can assert on exact values. The
//! dataset covers both frontends: farms and scans for the Scan-AI
//! dashboard, products and orders for the ERP.

use jiff::Timestamp;
use payloads::{
    DiseaseSeverity, FarmId, OrderId, OrderStatus, ProductId, ScanId,
    requests, responses,
};
use uuid::Uuid;

pub const ALICE_USERNAME: &str = "alice";
pub const ALICE_PASSWORD: &str = "correct-horse";

pub fn alice_credentials() -> requests::LoginCredentials {
    requests::LoginCredentials {
        username: ALICE_USERNAME.to_string(),
        password: ALICE_PASSWORD.to_string(),
    }
}

pub fn alice_profile() -> responses::UserProfile {
    responses::UserProfile {
        username: ALICE_USERNAME.to_string(),
        display_name: Some("Alice Vega".to_string()),
    }
}

fn base_time() -> Timestamp {
    "2025-03-01T09:00:00Z".parse().unwrap()
}

pub fn potato_farm_id() -> FarmId {
    FarmId(Uuid::from_u128(1))
}

pub fn tomato_farm_id() -> FarmId {
    FarmId(Uuid::from_u128(2))
}

pub fn farms() -> Vec<responses::Farm> {
    vec![
        responses::Farm {
            id: potato_farm_id(),
            name: "Valle Verde".to_string(),
            location: "Boyacá".to_string(),
            crop: "potato".to_string(),
            created_at: base_time(),
        },
        responses::Farm {
            id: tomato_farm_id(),
            name: "La Esperanza".to_string(),
            location: "Cundinamarca".to_string(),
            crop: "tomato".to_string(),
            created_at: base_time(),
        },
    ]
}

pub fn scans() -> Vec<responses::Scan> {
    vec![
        responses::Scan {
            id: ScanId(Uuid::from_u128(10)),
            farm_id: potato_farm_id(),
            image_ref: "scans/2025/03/leaf-0001.jpg".to_string(),
            disease: Some("late blight".to_string()),
            confidence: 0.93,
            severity: Some(DiseaseSeverity::High),
            scanned_at: base_time(),
        },
        responses::Scan {
            id: ScanId(Uuid::from_u128(11)),
            farm_id: potato_farm_id(),
            image_ref: "scans/2025/03/leaf-0002.jpg".to_string(),
            disease: None,
            confidence: 0.98,
            severity: None,
            scanned_at: base_time(),
        },
        responses::Scan {
            id: ScanId(Uuid::from_u128(12)),
            farm_id: tomato_farm_id(),
            image_ref: "scans/2025/03/leaf-0003.jpg".to_string(),
            disease: Some("early blight".to_string()),
            confidence: 0.81,
            severity: Some(DiseaseSeverity::Moderate),
            scanned_at: base_time(),
        },
    ]
}

pub fn scans_for(farm_id: FarmId) -> Vec<responses::Scan> {
    scans()
        .into_iter()
        .filter(|scan| scan.farm_id == farm_id)
        .collect()
}

pub fn fungicide_product_id() -> ProductId {
    ProductId(Uuid::from_u128(20))
}

pub fn products() -> Vec<responses::Product> {
    vec![
        responses::Product {
            id: fungicide_product_id(),
            name: "Copper fungicide 5L".to_string(),
            sku: "FUNG-CU-5L".to_string(),
            unit_price_cents: 4_500,
            stock: 40,
        },
        responses::Product {
            id: ProductId(Uuid::from_u128(21)),
            name: "Drip line 100m".to_string(),
            sku: "IRR-DL-100".to_string(),
            unit_price_cents: 12_000,
            stock: 15,
        },
    ]
}

pub fn orders() -> Vec<responses::Order> {
    vec![responses::Order {
        id: OrderId(Uuid::from_u128(30)),
        product_id: fungicide_product_id(),
        quantity: 2,
        customer_name: "Finca Valle Verde".to_string(),
        status: OrderStatus::Pending,
        created_at: base_time(),
    }]
}

//! In-process stand-in for the backend the frontends talk to.
//!
//! Serves the `mock` dataset wrapped in `Envelope`, enforces the bearer
//! token, and exposes two failure-injection routes: `/api/flaky` fails
//! with 500 a configured number of times before succeeding, `/api/boom`
//! always fails.

use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};

use actix_web::dev::Server;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use payloads::{Envelope, FarmId, OrderId, ProductId, ScanId, requests};
use uuid::Uuid;

use crate::mock;

/// Token issued to alice by the mock login route.
pub const TEST_TOKEN: &str = "test-token-alice";

struct FlakyState {
    remaining_failures: AtomicU32,
}

pub fn build(
    listener: TcpListener,
    flaky_failures: u32,
) -> std::io::Result<Server> {
    let flaky = web::Data::new(FlakyState {
        remaining_failures: AtomicU32::new(flaky_failures),
    });
    let server = HttpServer::new(move || {
        App::new()
            .app_data(flaky.clone())
            .route("/api/health_check", web::get().to(health_check))
            .route("/api/login", web::post().to(login))
            .route("/api/logout", web::post().to(logout))
            .route("/api/user_profile", web::get().to(user_profile))
            .route("/api/farms", web::get().to(list_farms))
            .route("/api/get_farm", web::post().to(get_farm))
            .route("/api/create_farm", web::post().to(create_farm))
            .route("/api/delete_farm", web::delete().to(delete_farm))
            .route("/api/scans", web::post().to(list_scans))
            .route("/api/get_scan", web::post().to(get_scan))
            .route("/api/submit_scan", web::post().to(submit_scan))
            .route("/api/products", web::get().to(list_products))
            .route("/api/create_product", web::post().to(create_product))
            .route("/api/orders", web::get().to(list_orders))
            .route("/api/create_order", web::post().to(create_order))
            .route("/api/order_status", web::put().to(update_order_status))
            .route("/api/flaky", web::get().to(flaky_farms))
            .route("/api/boom", web::get().to(boom))
    })
    .listen(listener)?
    .run();
    Ok(server)
}

fn is_authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Bearer {TEST_TOKEN}"))
}

/// 401 guard shared by every route behind login.
macro_rules! require_auth {
    ($req:expr) => {
        if !is_authorized($req) {
            return HttpResponse::Unauthorized().body("Missing or invalid bearer token");
        }
    };
}

fn ok_enveloped<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope { data })
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn login(body: web::Json<requests::LoginCredentials>) -> HttpResponse {
    if body.username == mock::ALICE_USERNAME
        && body.password == mock::ALICE_PASSWORD
    {
        ok_enveloped(payloads::responses::AuthToken {
            token: TEST_TOKEN.to_string(),
        })
    } else {
        HttpResponse::Unauthorized()
            .body("Authentication failed: Invalid credentials")
    }
}

async fn logout(req: HttpRequest) -> HttpResponse {
    require_auth!(&req);
    HttpResponse::Ok().finish()
}

async fn user_profile(req: HttpRequest) -> HttpResponse {
    require_auth!(&req);
    ok_enveloped(mock::alice_profile())
}

async fn list_farms(req: HttpRequest) -> HttpResponse {
    require_auth!(&req);
    ok_enveloped(mock::farms())
}

async fn get_farm(req: HttpRequest, body: web::Json<FarmId>) -> HttpResponse {
    require_auth!(&req);
    match mock::farms().into_iter().find(|farm| farm.id == *body) {
        Some(farm) => ok_enveloped(farm),
        None => HttpResponse::NotFound().body("No such farm"),
    }
}

async fn create_farm(
    req: HttpRequest,
    _body: web::Json<requests::CreateFarm>,
) -> HttpResponse {
    require_auth!(&req);
    ok_enveloped(FarmId(Uuid::new_v4()))
}

async fn delete_farm(
    req: HttpRequest,
    body: web::Json<FarmId>,
) -> HttpResponse {
    require_auth!(&req);
    if mock::farms().iter().any(|farm| farm.id == *body) {
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::NotFound().body("No such farm")
    }
}

async fn list_scans(req: HttpRequest, body: web::Json<FarmId>) -> HttpResponse {
    require_auth!(&req);
    ok_enveloped(mock::scans_for(*body))
}

async fn get_scan(req: HttpRequest, body: web::Json<ScanId>) -> HttpResponse {
    require_auth!(&req);
    match mock::scans().into_iter().find(|scan| scan.id == *body) {
        Some(scan) => ok_enveloped(scan),
        None => HttpResponse::NotFound().body("No such scan"),
    }
}

async fn submit_scan(
    req: HttpRequest,
    body: web::Json<requests::SubmitScan>,
) -> HttpResponse {
    require_auth!(&req);
    // Echo back an immediately "processed" scan with a fixed diagnosis.
    ok_enveloped(payloads::responses::Scan {
        id: ScanId(Uuid::new_v4()),
        farm_id: body.farm_id,
        image_ref: body.image_ref.clone(),
        disease: Some("late blight".to_string()),
        confidence: 0.9,
        severity: Some(payloads::DiseaseSeverity::High),
        scanned_at: body.captured_at,
    })
}

async fn list_products(req: HttpRequest) -> HttpResponse {
    require_auth!(&req);
    ok_enveloped(mock::products())
}

async fn create_product(
    req: HttpRequest,
    _body: web::Json<requests::CreateProduct>,
) -> HttpResponse {
    require_auth!(&req);
    ok_enveloped(ProductId(Uuid::new_v4()))
}

async fn list_orders(req: HttpRequest) -> HttpResponse {
    require_auth!(&req);
    ok_enveloped(mock::orders())
}

async fn create_order(
    req: HttpRequest,
    body: web::Json<requests::CreateOrder>,
) -> HttpResponse {
    require_auth!(&req);
    if body.quantity == 0 {
        return HttpResponse::UnprocessableEntity()
            .body("Order quantity must be at least 1");
    }
    ok_enveloped(OrderId(Uuid::new_v4()))
}

async fn update_order_status(
    req: HttpRequest,
    body: web::Json<requests::UpdateOrderStatus>,
) -> HttpResponse {
    require_auth!(&req);
    match mock::orders().into_iter().find(|order| order.id == body.order_id)
    {
        Some(mut order) => {
            order.status = body.status;
            ok_enveloped(order)
        }
        None => HttpResponse::NotFound().body("No such order"),
    }
}

async fn flaky_farms(
    req: HttpRequest,
    flaky: web::Data<FlakyState>,
) -> HttpResponse {
    require_auth!(&req);
    let remaining = flaky.remaining_failures.load(Ordering::SeqCst);
    if remaining > 0 {
        flaky.remaining_failures.fetch_sub(1, Ordering::SeqCst);
        return HttpResponse::InternalServerError()
            .body("Temporarily unavailable");
    }
    ok_enveloped(mock::farms())
}

async fn boom(req: HttpRequest) -> HttpResponse {
    require_auth!(&req);
    HttpResponse::InternalServerError().body("boom")
}

//! Client and fetcher behavior against the mock backend over real HTTP.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use fetcher::{ErrorKind, FetchOptions, Fetcher, RetryPolicy};
use payloads::{APIClient, AuthSession, ClientError, FarmId, responses};
use reqwest::StatusCode;
use test_helpers::{
    assert_status_code, mock, spawn_app, spawn_app_with_flaky,
};
use uuid::Uuid;

use crate::support;

#[tokio::test]
async fn login_stores_token_and_authorizes_requests() -> anyhow::Result<()> {
    let app = spawn_app().await;
    assert!(!app.session.is_authenticated());

    app.login_alice().await?;
    assert!(app.session.is_authenticated());

    let profile = app.client.user_profile().await?;
    assert_eq!(profile, mock::alice_profile());

    let farms = app.client.list_farms().await?;
    assert_eq!(farms, mock::farms());

    Ok(())
}

#[tokio::test]
async fn invalid_credentials_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app
        .client
        .login(&payloads::requests::LoginCredentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert!(!app.session.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn a_401_fires_the_logout_observer() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let logouts = Arc::new(AtomicU32::new(0));
    let logouts_for_observer = logouts.clone();
    app.session.on_logout(move || {
        logouts_for_observer.fetch_add(1, Ordering::SeqCst);
    });

    // Corrupt the token: the next request comes back 401.
    app.session.set_token("stale-token");
    let result = app.client.list_farms().await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    assert!(!app.session.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn unknown_farm_is_an_api_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let result = app.client.get_farm(&FarmId(Uuid::new_v4())).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn delete_farm_requires_a_known_farm() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    app.client.delete_farm(&mock::potato_farm_id()).await?;

    let result = app.client.delete_farm(&FarmId(Uuid::new_v4())).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn scans_are_scoped_to_the_requested_farm() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let scans = app.client.list_scans(&mock::potato_farm_id()).await?;
    assert_eq!(scans.len(), 2);
    assert!(scans.iter().all(|scan| scan.farm_id == mock::potato_farm_id()));

    Ok(())
}

#[tokio::test]
async fn order_status_update_round_trips() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let order = mock::orders().remove(0);
    let updated = app
        .client
        .update_order_status(&payloads::requests::UpdateOrderStatus {
            order_id: order.id,
            status: payloads::OrderStatus::Shipped,
        })
        .await?;
    assert_eq!(updated.status, payloads::OrderStatus::Shipped);

    Ok(())
}

#[tokio::test]
async fn zero_quantity_order_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let result = app
        .client
        .create_order(&payloads::requests::CreateOrder {
            product_id: mock::fungicide_product_id(),
            quantity: 0,
            customer_name: "Finca Valle Verde".to_string(),
        })
        .await;
    assert_status_code(result, StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[tokio::test]
async fn fetcher_retries_a_flaky_endpoint() -> anyhow::Result<()> {
    let app = spawn_app_with_flaky(2).await;
    app.login_alice().await?;

    let client = Rc::new(app.client);
    let calls = Rc::new(Cell::new(0u32));
    let calls_for_op = calls.clone();
    let op = move |_: ()| {
        calls_for_op.set(calls_for_op.get() + 1);
        let client = client.clone();
        async move {
            client.get_json::<Vec<responses::Farm>>("flaky").await
        }
    };
    let options = FetchOptions {
        retry: RetryPolicy::new(2, Duration::from_millis(20)),
        ..Default::default()
    };
    let fetcher = Fetcher::new(op, options, support::time_source());

    let farms = fetcher.execute(()).await.expect("retries exhaust failures");
    assert_eq!(farms, mock::farms());
    assert_eq!(calls.get(), 3);
    assert!(fetcher.snapshot().is_success());

    Ok(())
}

#[tokio::test]
async fn http_auth_failure_skips_retries() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.session.set_token("stale-token");

    let client = Rc::new(app.client);
    let calls = Rc::new(Cell::new(0u32));
    let calls_for_op = calls.clone();
    let op = move |_: ()| {
        calls_for_op.set(calls_for_op.get() + 1);
        let client = client.clone();
        async move { client.list_farms().await }
    };
    let options = FetchOptions {
        retry: RetryPolicy::new(3, Duration::from_millis(10)),
        ..Default::default()
    };
    let fetcher = Fetcher::new(op, options, support::time_source());

    let error = fetcher.execute(()).await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::Auth);
    assert_eq!(calls.get(), 1);

    Ok(())
}

#[tokio::test]
async fn connection_failure_classifies_as_network() -> anyhow::Result<()> {
    // Nothing is listening on port 9: connection refused.
    let session = AuthSession::new();
    let client = Rc::new(APIClient::new("http://127.0.0.1:9", session));

    let op = move |_: ()| {
        let client = client.clone();
        async move { client.list_farms().await }
    };
    let fetcher =
        Fetcher::new(op, FetchOptions::default(), support::time_source());

    let error = fetcher.execute(()).await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::Network);
    assert_eq!(error.status, None);

    Ok(())
}

#[tokio::test]
async fn server_error_text_reaches_the_fetch_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let client = Rc::new(app.client);
    let op = move |_: ()| {
        let client = client.clone();
        async move { client.get_json::<Vec<responses::Farm>>("boom").await }
    };
    let fetcher =
        Fetcher::new(op, FetchOptions::default(), support::time_source());

    let error = fetcher.execute(()).await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::Api);
    assert_eq!(error.status, Some(500));
    assert_eq!(error.message, "boom");

    Ok(())
}

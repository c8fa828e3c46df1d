use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{
    Envelope, FarmId, OrderId, ProductId, ScanId, requests, responses,
    session::AuthSession,
};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the backend.
///
/// Constructed once at app start with an [`AuthSession`] and passed by
/// reference to consumers. A bearer token header is attached to every
/// request while the session holds a token.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub session: AuthSession,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>, session: AuthSession) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
            session,
        }
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request =
            self.authorize(self.inner_client.post(self.format_url(path)));
        request.json(body).send().await
    }

    async fn empty_post(&self, path: &str) -> ReqwestResult {
        let request =
            self.authorize(self.inner_client.post(self.format_url(path)));
        request.send().await
    }

    async fn get(&self, path: &str) -> ReqwestResult {
        let request =
            self.authorize(self.inner_client.get(self.format_url(path)));
        request.send().await
    }

    async fn put(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request =
            self.authorize(self.inner_client.put(self.format_url(path)));
        request.json(body).send().await
    }

    async fn delete(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request =
            self.authorize(self.inner_client.delete(self.format_url(path)));
        request.json(body).send().await
    }

    /// Deserialize a successful enveloped response into the payload type,
    /// or return an appropriate error. A 401 drops the session token and
    /// notifies the logout observer before surfacing `Unauthorized`.
    async fn ok_body<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.force_logout();
            return Err(ClientError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ClientError::Api(
                response.status(),
                response.text().await?,
            ));
        }
        Ok(response.json::<Envelope<T>>().await?.data)
    }

    /// Check that an empty response is OK, returning a ClientError if not.
    async fn ok_empty(
        &self,
        response: reqwest::Response,
    ) -> Result<(), ClientError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.force_logout();
            return Err(ClientError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ClientError::Api(
                response.status(),
                response.text().await?,
            ));
        }
        Ok(())
    }

    /// GET `path` and unwrap the enveloped payload. The building block for
    /// the typed methods below; also usable directly for endpoints this
    /// client has no dedicated method for.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let response = self.get(path).await?;
        self.ok_body(response).await
    }

    /// POST `body` to `path` and unwrap the enveloped payload.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let response = self.post(path, body).await?;
        self.ok_body(response).await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.get("health_check").await?;
        self.ok_empty(response).await
    }

    /// Log in and store the issued bearer token in the session.
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<(), ClientError> {
        let response = self.post("login", details).await?;
        let issued: responses::AuthToken = self.ok_body(response).await?;
        self.session.set_token(issued.token);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.empty_post("logout").await?;
        let result = self.ok_empty(response).await;
        self.session.clear_token();
        result
    }

    /// Get the current user's profile information.
    pub async fn user_profile(
        &self,
    ) -> Result<responses::UserProfile, ClientError> {
        self.get_json("user_profile").await
    }

    pub async fn list_farms(&self) -> Result<Vec<responses::Farm>, ClientError> {
        self.get_json("farms").await
    }

    pub async fn get_farm(
        &self,
        farm_id: &FarmId,
    ) -> Result<responses::Farm, ClientError> {
        self.post_json("get_farm", farm_id).await
    }

    pub async fn create_farm(
        &self,
        details: &requests::CreateFarm,
    ) -> Result<FarmId, ClientError> {
        self.post_json("create_farm", details).await
    }

    pub async fn delete_farm(
        &self,
        farm_id: &FarmId,
    ) -> Result<(), ClientError> {
        let response = self.delete("delete_farm", farm_id).await?;
        self.ok_empty(response).await
    }

    /// List processed scans for a farm, newest first.
    pub async fn list_scans(
        &self,
        farm_id: &FarmId,
    ) -> Result<Vec<responses::Scan>, ClientError> {
        self.post_json("scans", farm_id).await
    }

    pub async fn get_scan(
        &self,
        scan_id: &ScanId,
    ) -> Result<responses::Scan, ClientError> {
        self.post_json("get_scan", scan_id).await
    }

    /// Submit an uploaded plant photo for disease analysis.
    pub async fn submit_scan(
        &self,
        details: &requests::SubmitScan,
    ) -> Result<responses::Scan, ClientError> {
        self.post_json("submit_scan", details).await
    }

    pub async fn list_products(
        &self,
    ) -> Result<Vec<responses::Product>, ClientError> {
        self.get_json("products").await
    }

    pub async fn create_product(
        &self,
        details: &requests::CreateProduct,
    ) -> Result<ProductId, ClientError> {
        self.post_json("create_product", details).await
    }

    pub async fn list_orders(
        &self,
    ) -> Result<Vec<responses::Order>, ClientError> {
        self.get_json("orders").await
    }

    pub async fn create_order(
        &self,
        details: &requests::CreateOrder,
    ) -> Result<OrderId, ClientError> {
        self.post_json("create_order", details).await
    }

    pub async fn update_order_status(
        &self,
        details: &requests::UpdateOrderStatus,
    ) -> Result<responses::Order, ClientError> {
        let response = self.put("order_status", details).await?;
        self.ok_body(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    Api(StatusCode, String),
    /// The server rejected the session; the logout observer has fired.
    #[error("Your session has expired. Please log in again.")]
    Unauthorized,
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

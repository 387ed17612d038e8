//! Typed HTTP client for the tourism platform REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, cookie::Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{
    ChartData, Comment, DashboardStats, Destination, DestinationCategory, Package, PackageType, Payment, Provider,
    Record, RecordId, Reservation, Role, Tourist, User,
};
use crate::seed;
use crate::session::{Session, SessionManager, SessionUser};
use crate::store::{Batch, Dataset};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// REST client. Attaches the session's bearer token to every request and
/// drops the session when the server answers 401.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionManager,
    max_retries: u32,
    retry_base: Duration,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionManager) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            max_retries: config.max_retries.max(1),
            retry_base: Duration::from_millis(config.retry_base_ms),
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{base}/{path}", base = self.base_url);
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status,
                message: message.chars().take(200).collect(),
            });
        }
        Ok(response)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.check(builder.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// GET with exponential backoff on transient failures.
    async fn get_with_retry<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let mut attempt = 1;
        loop {
            match self.send(self.request(Method::GET, path).query(params)).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.retry_base * 2u32.saturating_pow(attempt - 1);
                    warn!("GET /{path} failed (attempt {attempt}/{}): {e}, retrying in {delay:?}", self.max_retries);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// `GET /{resource}` with optional query parameters.
    pub async fn list<T: Record + DeserializeOwned>(&self, params: &[(&str, String)]) -> Result<Vec<T>> {
        let records: Vec<T> = self.get_with_retry(T::RESOURCE, params).await?;
        debug!("Fetched {} {}", records.len(), T::RESOURCE);
        Ok(records)
    }

    pub async fn get<T: Record + DeserializeOwned>(&self, id: RecordId) -> Result<T> {
        self.send(self.request(Method::GET, &format!("{}/{id}", T::RESOURCE))).await
    }

    /// `POST /{resource}`; the returned record carries the server-issued id.
    pub async fn create<T: Record + Serialize + DeserializeOwned>(&self, record: &T) -> Result<T> {
        self.send(self.request(Method::POST, T::RESOURCE).json(record)).await
    }

    pub async fn update<T: Record + Serialize + DeserializeOwned>(&self, record: &T) -> Result<T> {
        let path = format!("{}/{}", T::RESOURCE, record.id());
        self.send(self.request(Method::PUT, &path).json(record)).await
    }

    pub async fn delete<T: Record>(&self, id: RecordId) -> Result<()> {
        let path = format!("{}/{id}", T::RESOURCE);
        self.check(self.request(Method::DELETE, &path).send().await?).await?;
        Ok(())
    }

    /// `DELETE` by dataset, for callers that only know the collection.
    pub async fn delete_in(&self, dataset: Dataset, id: RecordId) -> Result<()> {
        match dataset {
            Dataset::Users => self.delete::<User>(id).await,
            Dataset::Tourists => self.delete::<Tourist>(id).await,
            Dataset::Destinations => self.delete::<Destination>(id).await,
            Dataset::Packages => self.delete::<Package>(id).await,
            Dataset::Reservations => self.delete::<Reservation>(id).await,
            Dataset::Payments => self.delete::<Payment>(id).await,
            Dataset::Providers => self.delete::<Provider>(id).await,
            Dataset::Comments => self.delete::<Comment>(id).await,
            Dataset::Roles => self.delete::<Role>(id).await,
            Dataset::Categories | Dataset::PackageTypes | Dataset::Permissions => Err(AppError::validation(
                format!("{} cannot be deleted", dataset.name()),
            )),
        }
    }

    pub async fn categories(&self) -> Result<Vec<DestinationCategory>> {
        self.get_with_retry("categorias-destino", &[]).await
    }

    pub async fn package_types(&self) -> Result<Vec<PackageType>> {
        self.get_with_retry("tipos-paquete", &[]).await
    }

    pub async fn payment_methods(&self) -> Result<Vec<String>> {
        self.get_with_retry("metodos-pago", &[]).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_with_retry("dashboard/stats", &[]).await
    }

    pub async fn dashboard_charts(&self) -> Result<ChartData> {
        self.get_with_retry("dashboard/charts", &[]).await
    }

    /// Sign in and start a session with the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .client
            .post(format!("{base}/auth/login", base = self.base_url))
            .json(&Credentials { email, password })
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }
        let session: Session = serde_json::from_slice(&self.check(response).await?.bytes().await?)?;
        self.session.start(session.clone())?;
        Ok(session)
    }

    /// End the session locally even if the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let result = self.request(Method::POST, "auth/logout").send().await;
        self.session.invalidate();
        self.check(result?).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<SessionUser> {
        self.send(self.request(Method::GET, "auth/me")).await
    }

    /// Load a whole dataset.
    pub async fn fetch(&self, dataset: Dataset) -> Result<Batch> {
        Ok(match dataset {
            Dataset::Users => Batch::Users(self.list::<User>(&[]).await?),
            Dataset::Tourists => Batch::Tourists(self.list::<Tourist>(&[]).await?),
            Dataset::Destinations => Batch::Destinations(self.list::<Destination>(&[]).await?),
            Dataset::Categories => Batch::Categories(self.categories().await?),
            Dataset::Packages => Batch::Packages(self.list::<Package>(&[]).await?),
            Dataset::PackageTypes => Batch::PackageTypes(self.package_types().await?),
            Dataset::Reservations => Batch::Reservations(self.list::<Reservation>(&[]).await?),
            Dataset::Payments => Batch::Payments(self.list::<Payment>(&[]).await?),
            Dataset::Providers => Batch::Providers(self.list::<Provider>(&[]).await?),
            Dataset::Comments => Batch::Comments(self.list::<Comment>(&[]).await?),
            Dataset::Roles => Batch::Roles(self.list::<Role>(&[]).await?),
            // The API exposes no permission catalog; the built-in one is authoritative.
            Dataset::Permissions => Batch::Permissions(seed::permissions()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> ApiConfig {
        ApiConfig {
            base_url: format!("{}/api/", server.uri()),
            timeout_secs: 5,
            max_retries: 3,
            retry_base_ms: 1,
            use_mock: false,
        }
    }

    fn signed_in() -> SessionManager {
        let session = SessionManager::new();
        session
            .start(Session {
                token: "tok-1".to_string(),
                user: SessionUser {
                    id: 1,
                    name: "Juan Pérez".to_string(),
                    email: "juan@ejemplo.com".to_string(),
                    role: "Admin".to_string(),
                },
                expires_at: None,
            })
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_list_sends_bearer_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(header("Authorization", "Bearer tok-1"))
            .and(query_param("status", "Activo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Juan Pérez", "email": "juan@ejemplo.com", "role": "Admin",
                 "status": "Activo", "created_at": "2024-01-15"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), signed_in()).unwrap();
        let users: Vec<User> = client.list(&[("status", "Activo".to_string())]).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Juan Pérez");
    }

    #[tokio::test]
    async fn test_unauthorized_invalidates_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reservas"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let session = signed_in();
        let client = ApiClient::new(&config(&server), session.clone()).unwrap();
        let err = client.list::<Reservation>(&[]).await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_list_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tipos-paquete"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tipos-paquete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "nombre": "Cultural"}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), SessionManager::new()).unwrap();
        let types = client.package_types().await.unwrap();
        assert_eq!(types[0].name, "Cultural");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/destinos"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such resource"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), SessionManager::new()).unwrap();
        match client.list::<Destination>(&[]).await.unwrap_err() {
            AppError::Api { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "no such resource");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_returns_server_record() {
        let server = MockServer::start().await;
        let mut role = seed::roles().remove(1);
        role.id = RecordId(0);
        let mut saved = role.clone();
        saved.id = RecordId(31);

        Mock::given(method("POST"))
            .and(path("/api/roles"))
            .and(body_json(&role))
            .respond_with(ResponseTemplate::new(201).set_body_json(&saved))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), signed_in()).unwrap();
        let created = client.create(&role).await.unwrap();
        assert_eq!(created.id, RecordId(31));
        assert_eq!(created.permissions, role.permissions);
    }

    #[tokio::test]
    async fn test_delete_and_update_paths() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/comentarios/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let provider = seed::providers().remove(0);
        Mock::given(method("PUT"))
            .and(path("/api/proveedores/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&provider))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), signed_in()).unwrap();
        client.delete::<Comment>(RecordId(4)).await.unwrap();
        assert_eq!(client.update(&provider).await.unwrap(), provider);
    }

    #[tokio::test]
    async fn test_delete_in_routes_by_dataset() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/turistas/2"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), signed_in()).unwrap();
        client.delete_in(Dataset::Tourists, RecordId(2)).await.unwrap();
        assert!(matches!(
            client.delete_in(Dataset::Permissions, RecordId(1)).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_starts_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "juan@ejemplo.com", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "fresh",
                "user": {"id": 1, "name": "Juan Pérez", "email": "juan@ejemplo.com", "role": "Admin"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                {"id": 1, "name": "Juan Pérez", "email": "juan@ejemplo.com", "role": "Admin"}
            )))
            .expect(1)
            .mount(&server)
            .await;

        let session = SessionManager::new();
        let client = ApiClient::new(&config(&server), session.clone()).unwrap();
        client.login("juan@ejemplo.com", "secret").await.unwrap();

        assert_eq!(session.token().as_deref(), Some("fresh"));
        assert_eq!(client.me().await.unwrap().name, "Juan Pérez");
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_no_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let session = SessionManager::new();
        let client = ApiClient::new(&config(&server), session.clone()).unwrap();
        assert!(matches!(client.login("x@y.com", "bad").await, Err(AppError::Unauthorized)));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_fetch_dashboard_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalUsers": 1250, "totalTourists": 3420, "totalReservations": 890, "totalRevenue": 125000.0
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), SessionManager::new()).unwrap();
        let stats = client.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_tourists, 3420);
        assert_eq!(stats.total_revenue, 125000.0);
    }
}

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Request, StatusCode};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::{debug, info, instrument, warn};

use super::parse::{self, parse_list};
use super::OrderGateway;
use crate::config::Backend;
use crate::error::{AuthError, GatewayError, GatewayResult};
use crate::model::{MenuItem, Table, Transaction, TransactionRef};
use crate::session::StaffSession;

const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Gateway backed by the real REST API.
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
    bearer: Option<String>,
}

impl fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.bearer.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    pub fn new(backend: &Backend) -> GatewayResult<Self> {
        if backend.accept_invalid_certs {
            warn!("TLS certificate validation is disabled; use only against a development server");
        }
        let mut builder = Client::builder()
            .user_agent(concat!("resto-order/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(backend.connect_timeout())
            .read_timeout(backend.read_timeout())
            .redirect(Policy::none())
            .danger_accept_invalid_certs(backend.accept_invalid_certs);
        if backend.bypass_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: backend.base_url.trim().trim_end_matches('/').to_string(),
            bearer: None,
        })
    }

    /// Copy of this gateway that authenticates as the signed-in staff member.
    /// An empty session yields an unauthenticated gateway.
    pub fn with_session(&self, session: &StaffSession) -> Self {
        Self {
            bearer: session.token().map(str::to_string),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn build_get(&self, path: &str) -> GatewayResult<Request> {
        let mut builder = self
            .http
            .request(Method::GET, self.endpoint(path))
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.bearer {
            builder = builder.bearer_auth(token);
        }
        Ok(builder.build()?)
    }

    pub fn build_post(&self, path: &str, body: &Value) -> GatewayResult<Request> {
        let mut builder = self
            .http
            .request(Method::POST, self.endpoint(path))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, JSON_UTF8)
            .json(body);
        if let Some(token) = &self.bearer {
            builder = builder.bearer_auth(token);
        }
        Ok(builder.build()?)
    }

    /// GET `path` and return the raw body.
    pub async fn get_text(&self, path: &str) -> GatewayResult<String> {
        let request = self.build_get(path)?;
        self.execute(request, None).await
    }

    async fn post(&self, path: &str, body: Value) -> GatewayResult<String> {
        let request = self.build_post(path, &body)?;
        self.execute(request, Some(&body)).await
    }

    async fn execute(&self, request: Request, body: Option<&Value>) -> GatewayResult<String> {
        debug!(method = %request.method(), url = %request.url(), "backend request");
        log_headers(request.headers());
        if let Some(body) = body {
            debug!(%body, "request body");
        }

        let method = request.method().clone();
        let res = self.http.execute(request).await?;
        let status = res.status();
        debug!(%status, "backend response");

        if status.is_redirection() {
            let location = res
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("<none>")
                .to_string();
            warn!(%status, %location, "backend redirected");
            return Err(GatewayError::Redirect { status, location });
        }
        if !is_accepted(&method, status) {
            let mut body = res.text().await.unwrap_or_default();
            if body.trim().is_empty() {
                body = "unknown error".into();
            }
            warn!(%status, %body, "backend error");
            return Err(GatewayError::Api { status, body });
        }

        let text = res.text().await?;
        debug!(body = %text, "response body");
        Ok(text)
    }

    /// Sign a staff member in and return the populated session.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<StaffSession, AuthError> {
        let body = json!({ "username": username, "password": password });
        let request = self.build_post("/Auth/login", &body)?;
        // The password must not reach the log, so the body is not passed along.
        let text = match self.execute(request, None).await {
            Ok(text) => text,
            Err(GatewayError::Api { body, .. }) => return Err(AuthError::Rejected(body)),
            Err(err) => return Err(err.into()),
        };
        let payload = parse::unwrap_object(&text)?;
        let staff = parse::parse_staff(&payload, username);
        info!(role = %staff.role, "staff signed in");
        let mut session = StaffSession::new();
        // The backend issues no separate token; the username is the credential.
        session.sign_in(staff.username.clone(), staff);
        Ok(session)
    }
}

/// GETs succeed only with 200; POSTs with 200 or 201.
fn is_accepted(method: &Method, status: StatusCode) -> bool {
    status == StatusCode::OK || (*method == Method::POST && status == StatusCode::CREATED)
}

fn log_headers(headers: &HeaderMap) {
    for (name, value) in headers {
        if name.as_str().eq_ignore_ascii_case("authorization") {
            debug!("  {}: Bearer [REDACTED]", name);
        } else {
            debug!("  {}: {}", name, value.to_str().unwrap_or("[invalid]"));
        }
    }
}

pub fn dine_in_body(customer_name: &str, table_id: i64) -> Value {
    json!({ "nama_konsumen": customer_name, "id_meja": table_id })
}

pub fn take_away_body(customer_name: &str) -> Value {
    json!({ "nama_konsumen": customer_name })
}

/// `catatan` is left out entirely when there is no note.
pub fn line_item_body(menu_item_id: i64, quantity: u32, note: Option<&str>) -> Value {
    let mut body = Map::new();
    body.insert("id_menu".into(), json!(menu_item_id));
    body.insert("jumlah".into(), json!(quantity));
    if let Some(note) = note.filter(|n| !n.is_empty()) {
        body.insert("catatan".into(), json!(note));
    }
    Value::Object(body)
}

#[async_trait]
impl OrderGateway for HttpGateway {
    #[instrument(skip_all)]
    async fn list_tables(&self) -> GatewayResult<Vec<Table>> {
        let body = self.get_text("/Meja").await?;
        Ok(parse_list(&body, parse::parse_table).unwrap_or_else(|err| {
            warn!(%err, "could not read table list");
            Vec::new()
        }))
    }

    #[instrument(skip_all)]
    async fn list_pending_transactions(&self) -> GatewayResult<Vec<TransactionRef>> {
        let body = self.get_text("/Transaksi/pending").await?;
        parse_list(&body, parse::parse_transaction_ref)
    }

    #[instrument(skip_all)]
    async fn list_transactions(&self) -> GatewayResult<Vec<TransactionRef>> {
        let body = self.get_text("/Transaksi").await?;
        parse_list(&body, parse::parse_transaction_ref)
    }

    #[instrument(skip_all)]
    async fn list_menu(&self) -> GatewayResult<Vec<MenuItem>> {
        let body = self.get_text("/Menu").await?;
        Ok(parse_list(&body, parse::parse_menu_item).unwrap_or_else(|err| {
            warn!(%err, "could not read menu");
            Vec::new()
        }))
    }

    #[instrument(skip_all, fields(table_id = table_id))]
    async fn create_dine_in_transaction(
        &self,
        customer_name: &str,
        table_id: i64,
    ) -> GatewayResult<Transaction> {
        let body = self
            .post("/Transaksi/dine-in", dine_in_body(customer_name, table_id))
            .await?;
        Ok(parse::parse_transaction(&parse::unwrap_object(&body)?))
    }

    #[instrument(skip_all)]
    async fn create_take_away_transaction(
        &self,
        customer_name: &str,
    ) -> GatewayResult<Transaction> {
        let body = self
            .post("/Transaksi/take-away", take_away_body(customer_name))
            .await?;
        Ok(parse::parse_transaction(&parse::unwrap_object(&body)?))
    }

    #[instrument(skip_all, fields(transaction_id = transaction_id, menu_item_id = menu_item_id, quantity = quantity))]
    async fn add_line_item(
        &self,
        transaction_id: i64,
        menu_item_id: i64,
        quantity: u32,
        note: Option<&str>,
    ) -> GatewayResult<String> {
        self.post(
            &format!("/Transaksi/{transaction_id}/items"),
            line_item_body(menu_item_id, quantity, note),
        )
        .await
    }

    #[instrument(skip_all, fields(transaction_id = transaction_id))]
    async fn get_transaction(&self, transaction_id: i64) -> GatewayResult<Transaction> {
        let body = self.get_text(&format!("/Transaksi/{transaction_id}")).await?;
        Ok(parse::parse_transaction(&parse::unwrap_object(&body)?))
    }

    #[instrument(skip_all, fields(transaction_id = transaction_id))]
    async fn cancel_transaction(&self, transaction_id: i64) -> GatewayResult<String> {
        self.post(&format!("/Transaksi/{transaction_id}/cancel"), json!({}))
            .await
    }
}

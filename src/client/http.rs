//! reqwest-backed implementation of the API traits

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{AuthApi, ExportedDocument, SchedulingApi};
use crate::config::ClientConfig;
use crate::core::error::{ApiError, ClientError, ClientResult, TransportError};
use crate::core::filter::DateRange;
use crate::core::session::Session;
use crate::models::{
    AssignRequest, Assignment, AuthToken, BulkCreateResponse, CreateShiftRequest, Credentials,
    Employee, EmployeeId, EmployeeUpdate, NewEmployee, PasswordResetRequest, Registration, Shift,
    ShiftId, UpdateShiftRequest,
};

/// Client for the scheduling API over HTTP
///
/// Every request carries `Authorization: Bearer <token>` while the shared
/// [`Session`] holds a token.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    config: ClientConfig,
    session: Arc<Session>,
}

impl HttpApiClient {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.config.endpoint(path));
        match self.session.bearer() {
            Some(bearer) => builder.header(AUTHORIZATION, bearer),
            None => builder,
        }
    }

    async fn send(&self, operation: &str, builder: RequestBuilder) -> ClientResult<Response> {
        debug!(operation, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let status = response.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), body = %body, "request rejected");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized {
                operation: operation.to_string(),
            }
            .into());
        }

        Err(ApiError::Rejected {
            operation: operation.to_string(),
            status: status.as_u16(),
            message: rejection_message(operation, &body),
        }
        .into())
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(operation, builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| transport_error(operation, e))
    }

    async fn fetch_bytes(&self, operation: &str, builder: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = self.send(operation, builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(operation, e))?;
        Ok(bytes.to_vec())
    }

    async fn execute(&self, operation: &str, builder: RequestBuilder) -> ClientResult<()> {
        self.send(operation, builder).await.map(|_| ())
    }
}

fn transport_error(operation: &str, err: reqwest::Error) -> ClientError {
    TransportError {
        operation: operation.to_string(),
        message: err.to_string(),
    }
    .into()
}

/// The server answers rejections with plain text or `{"message": ...}`
fn rejection_message(operation: &str, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("Failed to {}", operation);
    }

    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl SchedulingApi for HttpApiClient {
    async fn list_employees(&self) -> ClientResult<Vec<Employee>> {
        self.fetch_json("load employees", self.request(Method::GET, "/employees"))
            .await
    }

    async fn bulk_create_employees(
        &self,
        employees: &[NewEmployee],
    ) -> ClientResult<BulkCreateResponse> {
        let builder = self
            .request(Method::POST, "/employees/bulk")
            .json(employees);
        let response = self.send("add employees", builder).await?;

        // A bare 2xx with no body means every row was accepted
        let text = response
            .text()
            .await
            .map_err(|e| transport_error("add employees", e))?;
        if text.trim().is_empty() {
            return Ok(BulkCreateResponse::default());
        }
        serde_json::from_str(&text).map_err(|e| {
            TransportError {
                operation: "add employees".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    async fn update_employee(&self, id: EmployeeId, update: &EmployeeUpdate) -> ClientResult<()> {
        let builder = self
            .request(Method::PUT, &format!("/employees/{}", id))
            .json(update);
        self.execute("update employee", builder).await
    }

    async fn list_shifts(&self) -> ClientResult<Vec<Shift>> {
        self.fetch_json("load shifts", self.request(Method::GET, "/shifts"))
            .await
    }

    async fn create_shifts(&self, request: &CreateShiftRequest) -> ClientResult<()> {
        let builder = self.request(Method::POST, "/shifts").json(request);
        self.execute("create shift", builder).await
    }

    async fn update_shift(&self, id: ShiftId, request: &UpdateShiftRequest) -> ClientResult<()> {
        let builder = self
            .request(Method::PUT, &format!("/shifts/{}", id))
            .json(request);
        self.execute("update shift", builder).await
    }

    async fn delete_shift(&self, id: ShiftId) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, &format!("/shifts/{}", id));
        self.execute("delete shift", builder).await
    }

    async fn confirm_shift(&self, id: ShiftId) -> ClientResult<()> {
        let builder = self.request(Method::PATCH, &format!("/shifts/{}/confirm", id));
        self.execute("confirm shift", builder).await
    }

    async fn assign_employees(
        &self,
        id: ShiftId,
        employee_ids: &[EmployeeId],
    ) -> ClientResult<()> {
        let body = AssignRequest {
            employee_ids: employee_ids.to_vec(),
        };
        let builder = self
            .request(Method::POST, &format!("/shifts/{}/assign", id))
            .json(&body);
        self.execute("assign employees", builder).await
    }

    async fn list_assignments(&self, id: ShiftId) -> ClientResult<Vec<Assignment>> {
        let builder = self.request(Method::GET, &format!("/shifts/{}/assignments", id));
        self.fetch_json("load assignments", builder).await
    }

    async fn export_shift(&self, id: ShiftId) -> ClientResult<ExportedDocument> {
        let builder = self.request(Method::GET, &format!("/shifts/export/{}", id));
        let bytes = self.fetch_bytes("export shift", builder).await?;
        Ok(ExportedDocument::for_shift(id, bytes))
    }

    async fn export_range(&self, range: DateRange) -> ClientResult<ExportedDocument> {
        let path = format!("/shifts/export?from={}&to={}", range.from, range.to);
        let bytes = self
            .fetch_bytes("export shifts", self.request(Method::GET, &path))
            .await?;
        Ok(ExportedDocument::for_range(range, bytes))
    }

    async fn notify_shift(&self, id: ShiftId) -> ClientResult<()> {
        let builder = self.request(Method::POST, &format!("/shifts/{}/notify", id));
        self.execute("send email", builder).await
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthToken> {
        let builder = self.request(Method::POST, "/auth/login").json(credentials);
        self.fetch_json("sign in", builder).await
    }

    async fn register(&self, registration: &Registration) -> ClientResult<()> {
        let builder = self
            .request(Method::POST, "/auth/register")
            .json(registration);
        self.execute("register", builder).await
    }

    async fn request_password_reset(&self, request: &PasswordResetRequest) -> ClientResult<()> {
        let builder = self
            .request(Method::POST, "/auth/forgot-password")
            .json(request);
        self.execute("request password reset", builder).await
    }
}

//! REST backend client.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` so the
//! async runtime never blocks on I/O. Every call races the blocking
//! task against its [`CancelToken`]: when the token wins, the task is
//! left to finish detached and its response is discarded.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use planboard_model::{
    Comment, Credentials, Document, NewComment, NewPlan, NewReport, NewUser, Plan,
    QuarterlyReport, User, UserPatch,
};

use crate::cancel::CancelToken;
use crate::error::ClientError;
use crate::source::RecordSource;

/// Client for the dashboard REST API (`/plans`, `/reports`, `/users`,
/// `/comments`, `/documents`).
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    bearer: Option<String>,
    agent: ureq::Agent,
}

impl HttpSource {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpSource {
            base_url,
            bearer: None,
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    /// Attach a token sent as `Authorization: Bearer <token>` on every
    /// request. The stock backend runs without one; fronting proxies
    /// may require it.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run one blocking HTTP job, racing it against the token.
    async fn run_blocking<T, F>(&self, cancel: &CancelToken, job: F) -> Result<T, ClientError>
    where
        T: Send + 'static,
        F: FnOnce(ureq::Agent, Option<String>) -> Result<T, ClientError> + Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let agent = self.agent.clone();
        let bearer = self.bearer.clone();
        let handle = tokio::task::spawn_blocking(move || job(agent, bearer));
        tokio::select! {
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            joined = handle => joined
                .map_err(|e| ClientError::Transport(format!("task join error: {e}")))?,
        }
    }

    async fn get_json<T>(&self, path: &str, cancel: &CancelToken) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.url(path);
        self.run_blocking(cancel, move |agent, bearer| {
            let mut request = agent.get(&url);
            if let Some(ref token) = bearer {
                request = request.header("Authorization", &format!("Bearer {}", token));
            }
            let response = request.call().map_err(request_failed)?;
            response
                .into_body()
                .read_json::<T>()
                .map_err(|e| ClientError::Decode(e.to_string()))
        })
        .await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        cancel: &CancelToken,
    ) -> Result<T, ClientError>
    where
        B: Serialize + Clone + Send + 'static,
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.url(path);
        let body = body.clone();
        self.run_blocking(cancel, move |agent, bearer| {
            let mut request = match method {
                Method::Post => agent.post(&url),
                Method::Put => agent.put(&url),
                Method::Patch => agent.patch(&url),
            };
            if let Some(ref token) = bearer {
                request = request.header("Authorization", &format!("Bearer {}", token));
            }
            let response = request.send_json(&body).map_err(request_failed)?;
            response
                .into_body()
                .read_json::<T>()
                .map_err(|e| ClientError::Decode(e.to_string()))
        })
        .await
    }

    async fn delete(&self, path: &str, cancel: &CancelToken) -> Result<(), ClientError> {
        let url = self.url(path);
        self.run_blocking(cancel, move |agent, bearer| {
            let mut request = agent.delete(&url);
            if let Some(ref token) = bearer {
                request = request.header("Authorization", &format!("Bearer {}", token));
            }
            request.call().map_err(request_failed)?;
            Ok(())
        })
        .await
    }

    // ──────────────────────────────────────────────
    // Auth
    // ──────────────────────────────────────────────

    /// `POST /users/auth`; the backend answers with the account record.
    pub async fn login(
        &self,
        credentials: &Credentials,
        cancel: &CancelToken,
    ) -> Result<User, ClientError> {
        self.send_json(Method::Post, "/users/auth", credentials, cancel)
            .await
    }

    // ──────────────────────────────────────────────
    // Plans
    // ──────────────────────────────────────────────

    pub async fn create_plan(
        &self,
        plan: &NewPlan,
        cancel: &CancelToken,
    ) -> Result<Plan, ClientError> {
        self.send_json(Method::Post, "/plans", plan, cancel).await
    }

    pub async fn update_plan(
        &self,
        id: i64,
        plan: &NewPlan,
        cancel: &CancelToken,
    ) -> Result<Plan, ClientError> {
        self.send_json(Method::Put, &format!("/plans/{id}"), plan, cancel)
            .await
    }

    pub async fn delete_plan(&self, id: i64, cancel: &CancelToken) -> Result<(), ClientError> {
        self.delete(&format!("/plans/{id}"), cancel).await
    }

    // ──────────────────────────────────────────────
    // Reports
    // ──────────────────────────────────────────────

    pub async fn create_report(
        &self,
        report: &NewReport,
        cancel: &CancelToken,
    ) -> Result<QuarterlyReport, ClientError> {
        self.send_json(Method::Post, "/reports", report, cancel)
            .await
    }

    /// Full update; assessment changes travel through this as well.
    pub async fn update_report(
        &self,
        id: i64,
        report: &NewReport,
        cancel: &CancelToken,
    ) -> Result<QuarterlyReport, ClientError> {
        self.send_json(Method::Put, &format!("/reports/{id}"), report, cancel)
            .await
    }

    pub async fn delete_report(&self, id: i64, cancel: &CancelToken) -> Result<(), ClientError> {
        self.delete(&format!("/reports/{id}"), cancel).await
    }

    // ──────────────────────────────────────────────
    // Users
    // ──────────────────────────────────────────────

    pub async fn create_user(
        &self,
        user: &NewUser,
        cancel: &CancelToken,
    ) -> Result<User, ClientError> {
        self.send_json(Method::Post, "/users", user, cancel).await
    }

    pub async fn patch_user(
        &self,
        id: i64,
        patch: &UserPatch,
        cancel: &CancelToken,
    ) -> Result<User, ClientError> {
        self.send_json(Method::Patch, &format!("/users/{id}"), patch, cancel)
            .await
    }

    pub async fn delete_user(&self, id: i64, cancel: &CancelToken) -> Result<(), ClientError> {
        self.delete(&format!("/users/{id}"), cancel).await
    }

    // ──────────────────────────────────────────────
    // Comments and documents
    // ──────────────────────────────────────────────

    pub async fn list_comments(
        &self,
        report_id: i64,
        cancel: &CancelToken,
    ) -> Result<Vec<Comment>, ClientError> {
        self.get_json(&format!("/comments?reportId={report_id}"), cancel)
            .await
    }

    pub async fn create_comment(
        &self,
        comment: &NewComment,
        cancel: &CancelToken,
    ) -> Result<Comment, ClientError> {
        self.send_json(Method::Post, "/comments", comment, cancel)
            .await
    }

    pub async fn delete_comment(&self, id: i64, cancel: &CancelToken) -> Result<(), ClientError> {
        self.delete(&format!("/comments/{id}"), cancel).await
    }

    /// Attachment metadata only; file bodies stay on the backend.
    pub async fn list_documents(
        &self,
        cancel: &CancelToken,
    ) -> Result<Vec<Document>, ClientError> {
        self.get_json("/documents", cancel).await
    }

    pub async fn delete_document(&self, id: i64, cancel: &CancelToken) -> Result<(), ClientError> {
        self.delete(&format!("/documents/{id}"), cancel).await
    }
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Post,
    Put,
    Patch,
}

fn request_failed(err: ureq::Error) -> ClientError {
    match &err {
        ureq::Error::StatusCode(404) => ClientError::NotFound,
        ureq::Error::StatusCode(code) => ClientError::Http {
            status: *code,
            message: err.to_string(),
        },
        _ => ClientError::Transport(err.to_string()),
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn list_plans(&self, cancel: &CancelToken) -> Result<Vec<Plan>, ClientError> {
        self.get_json("/plans", cancel).await
    }

    async fn list_reports(
        &self,
        cancel: &CancelToken,
    ) -> Result<Vec<QuarterlyReport>, ClientError> {
        self.get_json("/reports", cancel).await
    }

    async fn list_users(&self, cancel: &CancelToken) -> Result<Vec<User>, ClientError> {
        self.get_json("/users", cancel).await
    }

    async fn get_plan(&self, id: i64, cancel: &CancelToken) -> Result<Plan, ClientError> {
        self.get_json(&format!("/plans/{id}"), cancel).await
    }

    async fn get_report(
        &self,
        id: i64,
        cancel: &CancelToken,
    ) -> Result<QuarterlyReport, ClientError> {
        self.get_json(&format!("/reports/{id}"), cancel).await
    }

    async fn get_user(&self, id: i64, cancel: &CancelToken) -> Result<User, ClientError> {
        self.get_json(&format!("/users/{id}"), cancel).await
    }
}

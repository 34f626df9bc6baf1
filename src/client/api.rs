use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::dto::{AuthResponse, MeResponse, PublicUser};
use crate::client::session::SessionStore;
use crate::client::ClientError;
use crate::todos::dto::{CreateTodoRequest, UpdateTodoRequest};
use crate::todos::repo_types::Todo;

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Typed wrapper over the HTTP API. Owns the session store and attaches the
/// bearer token to every protected request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    pub store: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, rb: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.store.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(rb.bearer_auth(token))
    }

    async fn expect_json<T: DeserializeOwned>(
        res: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }
        let message = res
            .json::<MessageBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_else(|_| "Server error".into());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // --- auth ---

    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, ClientError> {
        let res = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = Self::expect_json(res).await?;
        self.store.set_auth(auth.user.clone(), auth.token)?;
        Ok(auth.user)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let res = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = Self::expect_json(res).await?;
        self.store.set_auth(auth.user.clone(), auth.token)?;
        Ok(auth.user)
    }

    /// Purely local: drops the session, no server round trip.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.logout()
    }

    pub async fn me(&self) -> Result<PublicUser, ClientError> {
        let rb = self.authed(self.http.get(self.url("/api/auth/me")))?;
        let res: MeResponse = Self::expect_json(rb.send().await?).await?;
        Ok(res.user)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<String, ClientError> {
        let res = self
            .http
            .post(self.url("/api/auth/forgot-password"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        let body: MessageBody = Self::expect_json(res).await?;
        Ok(body.message)
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, ClientError> {
        let res = self
            .http
            .post(self.url(&format!("/api/auth/reset-password/{token}")))
            .json(&json!({ "password": password }))
            .send()
            .await?;
        let body: MessageBody = Self::expect_json(res).await?;
        Ok(body.message)
    }

    // --- todos ---

    pub async fn create_todo(&self, req: &CreateTodoRequest) -> Result<Todo, ClientError> {
        let rb = self.authed(self.http.post(self.url("/api/todos")))?;
        Self::expect_json(rb.json(req).send().await?).await
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let rb = self.authed(self.http.get(self.url("/api/todos")))?;
        Self::expect_json(rb.send().await?).await
    }

    pub async fn update_todo(
        &self,
        id: Uuid,
        req: &UpdateTodoRequest,
    ) -> Result<Todo, ClientError> {
        let rb = self.authed(self.http.put(self.url(&format!("/api/todos/{id}"))))?;
        Self::expect_json(rb.json(req).send().await?).await
    }

    pub async fn toggle_todo(&self, id: Uuid) -> Result<Todo, ClientError> {
        let rb = self.authed(
            self.http
                .patch(self.url(&format!("/api/todos/{id}/toggle"))),
        )?;
        Self::expect_json(rb.send().await?).await
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<String, ClientError> {
        let rb = self.authed(self.http.delete(self.url(&format!("/api/todos/{id}"))))?;
        let body: MessageBody = Self::expect_json(rb.send().await?).await?;
        Ok(body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_calls_require_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new("http://localhost:8080", SessionStore::load(dir.path()));
        let err = client
            .authed(client.http.get(client.url("/api/todos")))
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }

    #[test]
    fn urls_join_base_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new("http://localhost:8080", SessionStore::load(dir.path()));
        assert_eq!(
            client.url("/api/auth/login"),
            "http://localhost:8080/api/auth/login"
        );
    }
}

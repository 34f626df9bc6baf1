use uuid::Uuid;

use crate::client::api::ApiClient;
use crate::client::ClientError;
use crate::todos::dto::{CreateTodoRequest, UpdateTodoRequest};
use crate::todos::repo_types::Todo;

/// Fetch-then-cache access to the todo list. Every mutation invalidates the
/// cache and refetches instead of merging locally, so the cache always
/// reflects a full server response.
#[derive(Default)]
pub struct TodoStore {
    cache: Option<Vec<Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current todos, fetching only when the cache is cold.
    pub async fn all(&mut self, api: &ApiClient) -> Result<&[Todo], ClientError> {
        if self.cache.is_none() {
            self.cache = Some(api.list_todos().await?);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    async fn refresh(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        self.invalidate();
        self.cache = Some(api.list_todos().await?);
        Ok(())
    }

    pub async fn create(
        &mut self,
        api: &ApiClient,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, ClientError> {
        let todo = api
            .create_todo(&CreateTodoRequest {
                title: title.into(),
                description: description.map(Into::into),
                completed: false,
            })
            .await?;
        self.refresh(api).await?;
        Ok(todo)
    }

    pub async fn update(
        &mut self,
        api: &ApiClient,
        id: Uuid,
        changes: UpdateTodoRequest,
    ) -> Result<Todo, ClientError> {
        let todo = api.update_todo(id, &changes).await?;
        self.refresh(api).await?;
        Ok(todo)
    }

    pub async fn toggle(&mut self, api: &ApiClient, id: Uuid) -> Result<Todo, ClientError> {
        let todo = api.toggle_todo(id).await?;
        self.refresh(api).await?;
        Ok(todo)
    }

    pub async fn delete(&mut self, api: &ApiClient, id: Uuid) -> Result<(), ClientError> {
        api.delete_todo(id).await?;
        self.refresh(api).await?;
        Ok(())
    }
}

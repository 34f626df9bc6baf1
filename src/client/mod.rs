//! Programmatic client for the todozen API: a durable session store and a
//! thin typed wrapper over the HTTP surface with fetch-then-cache todo
//! access.

pub mod api;
pub mod session;
pub mod todos;

pub use api::ApiClient;
pub use session::{Session, SessionStore};
pub use todos::TodoStore;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not logged in")]
    NotAuthenticated,
    /// The server answered with an error body; `message` is its
    /// human-readable `message` field.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

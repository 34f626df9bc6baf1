use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        Ok(())
    }
}

/// Partial update: absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Title must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_completed_to_false() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert!(!req.completed);
        assert!(req.description.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_rejects_blank_title() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title":"   "}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_accepts_any_subset_of_fields() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(req.title.is_none());
        assert!(req.description.is_none());
        assert_eq!(req.completed, Some(true));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_rejects_blank_title() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let req = UpdateTodoRequest {
            title: Some("New title".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"title":"New title"}"#);
    }
}

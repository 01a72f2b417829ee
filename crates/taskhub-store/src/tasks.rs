use serde::{Deserialize, Serialize};

use crate::client::upstream;
use crate::{Store, StoreError};

/// Task workflow state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A task row as stored upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating a task; `user_id` is supplied by the server, never
/// by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    /// Whether the patch changes anything at all
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }
}

impl Store {
    /// List a user's tasks, newest first
    ///
    /// # Errors
    ///
    /// `Upstream` or `Transport` when the row API call fails
    pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        let url = self.endpoint("/rest/v1/tasks")?;
        let user_filter = format!("eq.{user_id}");
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("order", "created_at.desc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch one task owned by the user
    ///
    /// # Errors
    ///
    /// `NotFound` when no row matches; `Upstream`/`Transport` otherwise
    pub async fn get_task(&self, task_id: &str, user_id: &str) -> Result<Task, StoreError> {
        let url = self.endpoint("/rest/v1/tasks")?;
        let id_filter = format!("eq.{task_id}");
        let user_filter = format!("eq.{user_id}");
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&[
                ("select", "*"),
                ("id", id_filter.as_str()),
                ("user_id", user_filter.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        let mut rows: Vec<Task> = response.json().await?;
        rows.pop().ok_or(StoreError::NotFound { resource: "Task" })
    }

    /// Insert a task for the user and return the stored row
    ///
    /// # Errors
    ///
    /// `Upstream` or `Transport` when the row API call fails
    pub async fn create_task(&self, new: &NewTask, user_id: &str) -> Result<Task, StoreError> {
        let url = self.endpoint("/rest/v1/tasks")?;

        let mut body = serde_json::to_value(new).unwrap_or_default();
        if let Some(object) = body.as_object_mut() {
            object.insert("user_id".to_owned(), serde_json::Value::String(user_id.to_owned()));
        }

        let response = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        let mut rows: Vec<Task> = response.json().await?;
        rows.pop().ok_or(StoreError::Upstream {
            status: 0,
            message: "insert returned no row".to_owned(),
        })
    }

    /// Apply a partial update to a task owned by the user
    ///
    /// # Errors
    ///
    /// `NotFound` when no row matches; `Upstream`/`Transport` otherwise
    pub async fn update_task(&self, task_id: &str, user_id: &str, patch: &TaskPatch) -> Result<Task, StoreError> {
        let url = self.endpoint("/rest/v1/tasks")?;
        let id_filter = format!("eq.{task_id}");
        let user_filter = format!("eq.{user_id}");
        let response = self
            .request(reqwest::Method::PATCH, url)
            .query(&[("id", id_filter.as_str()), ("user_id", user_filter.as_str())])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        let mut rows: Vec<Task> = response.json().await?;
        rows.pop().ok_or(StoreError::NotFound { resource: "Task" })
    }

    /// Delete a task owned by the user
    ///
    /// Deleting an already-absent task is not an error.
    ///
    /// # Errors
    ///
    /// `Upstream` or `Transport` when the row API call fails
    pub async fn delete_task(&self, task_id: &str, user_id: &str) -> Result<(), StoreError> {
        let url = self.endpoint("/rest/v1/tasks")?;
        let id_filter = format!("eq.{task_id}");
        let user_filter = format!("eq.{user_id}");
        let response = self
            .request(reqwest::Method::DELETE, url)
            .query(&[("id", id_filter.as_str()), ("user_id", user_filter.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        Ok(())
    }
}

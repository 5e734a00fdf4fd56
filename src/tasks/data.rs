use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::data::UserID;

pub type TaskID = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskID,
    pub user_id: UserID,
    pub date: NaiveDate,
    pub description: String,
    pub completed: bool,
}

/// `completed` may be sent by older clients; new tasks always start open.
#[derive(Deserialize, Debug)]
pub struct AddTaskRequest {
    pub date: String,
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct UpdateTaskRequest {
    pub completed: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteTaskResponse {
    pub message: String,
}

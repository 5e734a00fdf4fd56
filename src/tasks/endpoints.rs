use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{self, Json};
use rocket::{delete, get, post, put, State};

use super::data::*;
use super::helpers::*;
use crate::api_error::{ApiError, ApiResult};
use crate::auth::guard::AuthenticatedUser;
use crate::data::DBConnection;

#[get("/tasks?<date>")]
pub fn get_tasks(
    caller: Result<AuthenticatedUser, ApiError>,
    date: Option<&str>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<Vec<Task>>> {
    let caller = caller?;
    let date = date.map(parse_date).transpose()?;

    let db_connection = db_connection.lock()?;
    let tasks = list_tasks(caller.user_id, date, &db_connection)?;

    Ok(Json(tasks))
}

#[post("/tasks", format = "json", data = "<add_task_request>")]
pub fn post_task(
    caller: Result<AuthenticatedUser, ApiError>,
    add_task_request: Result<Json<AddTaskRequest>, json::Error<'_>>,
    db_connection: &State<DBConnection>,
) -> ApiResult<status::Custom<Json<Task>>> {
    let caller = caller?;
    let add_task_request = add_task_request?;
    let db_connection = db_connection.lock()?;

    let task = add_task(
        caller.user_id,
        &add_task_request.date,
        &add_task_request.description,
        &db_connection,
    )?;
    tracing::info!(user_id = caller.user_id, task_id = task.id, date = %task.date, "created task");

    Ok(status::Custom(Status::Created, Json(task)))
}

/// An empty body flips the task's completion; a body with `completed` sets it.
#[put("/tasks/<task_id>", data = "<update_task_request>")]
pub fn put_task(
    caller: Result<AuthenticatedUser, ApiError>,
    task_id: TaskID,
    update_task_request: Result<Json<UpdateTaskRequest>, json::Error<'_>>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<Task>> {
    let caller = caller?;
    let completed = match update_task_request {
        Ok(request) => request.completed,
        Err(json::Error::Parse(body, _)) if body.trim().is_empty() => None,
        Err(e) => return Err(e.into()),
    };

    let db_connection = db_connection.lock()?;
    let task = update_task(caller.user_id, task_id, completed, &db_connection)?;
    tracing::info!(user_id = caller.user_id, task_id, completed = task.completed, "updated task");

    Ok(Json(task))
}

#[delete("/tasks/<task_id>")]
pub fn remove_task(
    caller: Result<AuthenticatedUser, ApiError>,
    task_id: TaskID,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let caller = caller?;
    let db_connection = db_connection.lock()?;

    delete_task_from_db(caller.user_id, task_id, &db_connection)?;
    tracing::info!(user_id = caller.user_id, task_id, "deleted task");

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

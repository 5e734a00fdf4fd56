use chrono::{NaiveDate, Utc};
use rocket::serde::json::Json;
use rocket::{get, State};

use super::data::*;
use super::streak::{compute_streak, garden_for, group_by_date};
use crate::api_error::{ApiError, ApiResult};
use crate::auth::guard::AuthenticatedUser;
use crate::data::DBConnection;
use crate::tasks::helpers::{get_tasks_for_date_from_db, get_tasks_from_db, parse_date};

fn date_or_today(date: Option<&str>) -> ApiResult<NaiveDate> {
    match date {
        Some(date) => parse_date(date),
        None => Ok(Utc::now().date_naive()),
    }
}

#[get("/streak?<today>")]
pub fn get_streak(
    caller: Result<AuthenticatedUser, ApiError>,
    today: Option<&str>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<Streak>> {
    let caller = caller?;
    let today = date_or_today(today)?;

    let tasks = {
        let db_connection = db_connection.lock()?;
        get_tasks_from_db(caller.user_id, &db_connection)?
    };

    Ok(Json(compute_streak(&group_by_date(tasks), today)))
}

#[get("/garden?<date>")]
pub fn get_garden(
    caller: Result<AuthenticatedUser, ApiError>,
    date: Option<&str>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<Garden>> {
    let caller = caller?;
    let date = date_or_today(date)?;

    let tasks = {
        let db_connection = db_connection.lock()?;
        get_tasks_for_date_from_db(caller.user_id, date, &db_connection)?
    };

    Ok(Json(garden_for(&group_by_date(tasks), date)))
}

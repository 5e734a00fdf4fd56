use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data::*;
use crate::api_error::{ApiError, ApiResult};
use crate::auth::data::UserID;

pub fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

pub fn get_task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        completed: row.get(4)?,
    })
}

pub fn add_task_to_db(
    owner_id: UserID,
    date: NaiveDate,
    description: &str,
    db_connection: &Connection,
) -> ApiResult<Task> {
    db_connection.execute(
        "INSERT INTO tasks (owner_id, date, description, completed) VALUES (?1, ?2, ?3, 0)",
        params![owner_id, date, description],
    )?;

    Ok(Task {
        id: db_connection.last_insert_rowid(),
        user_id: owner_id,
        date,
        description: description.to_string(),
        completed: false,
    })
}

pub fn get_tasks_from_db(owner_id: UserID, db_connection: &Connection) -> ApiResult<Vec<Task>> {
    let mut statement = db_connection.prepare(
        "SELECT id, owner_id, date, description, completed FROM tasks
         WHERE owner_id = (?1) ORDER BY date, id",
    )?;

    let tasks = statement
        .query_map(params![owner_id], get_task_from_row)?
        .collect::<rusqlite::Result<Vec<Task>>>()?;

    Ok(tasks)
}

pub fn get_tasks_for_date_from_db(
    owner_id: UserID,
    date: NaiveDate,
    db_connection: &Connection,
) -> ApiResult<Vec<Task>> {
    let mut statement = db_connection.prepare(
        "SELECT id, owner_id, date, description, completed FROM tasks
         WHERE owner_id = (?1) AND date = (?2) ORDER BY id",
    )?;

    let tasks = statement
        .query_map(params![owner_id, date], get_task_from_row)?
        .collect::<rusqlite::Result<Vec<Task>>>()?;

    Ok(tasks)
}

pub fn toggle_task_in_db(
    owner_id: UserID,
    task_id: TaskID,
    db_connection: &Connection,
) -> ApiResult<Task> {
    db_connection
        .query_row(
            "UPDATE tasks SET completed = NOT completed
             WHERE id = (?1) AND owner_id = (?2)
             RETURNING id, owner_id, date, description, completed",
            params![task_id, owner_id],
            get_task_from_row,
        )
        .optional()?
        .ok_or(ApiError::NotFound)
}

pub fn set_task_completed_in_db(
    owner_id: UserID,
    task_id: TaskID,
    completed: bool,
    db_connection: &Connection,
) -> ApiResult<Task> {
    db_connection
        .query_row(
            "UPDATE tasks SET completed = (?3)
             WHERE id = (?1) AND owner_id = (?2)
             RETURNING id, owner_id, date, description, completed",
            params![task_id, owner_id, completed],
            get_task_from_row,
        )
        .optional()?
        .ok_or(ApiError::NotFound)
}

pub fn delete_task_from_db(
    owner_id: UserID,
    task_id: TaskID,
    db_connection: &Connection,
) -> ApiResult<()> {
    let deleted = db_connection.execute(
        "DELETE FROM tasks WHERE id = (?1) AND owner_id = (?2)",
        params![task_id, owner_id],
    )?;

    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(())
}

pub fn add_task(
    owner_id: UserID,
    date: &str,
    description: &str,
    db_connection: &Connection,
) -> ApiResult<Task> {
    let date = parse_date(date)?;
    let description = description.trim();
    if description.is_empty() {
        return Err(ApiError::Validation(
            "Description cannot be empty".to_string(),
        ));
    }

    add_task_to_db(owner_id, date, description, db_connection)
}

pub fn list_tasks(
    owner_id: UserID,
    date: Option<NaiveDate>,
    db_connection: &Connection,
) -> ApiResult<Vec<Task>> {
    match date {
        Some(date) => get_tasks_for_date_from_db(owner_id, date, db_connection),
        None => get_tasks_from_db(owner_id, db_connection),
    }
}

/// Sets `completed` when the caller names a value, otherwise flips it.
pub fn update_task(
    owner_id: UserID,
    task_id: TaskID,
    completed: Option<bool>,
    db_connection: &Connection,
) -> ApiResult<Task> {
    match completed {
        Some(completed) => set_task_completed_in_db(owner_id, task_id, completed, db_connection),
        None => toggle_task_in_db(owner_id, task_id, db_connection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::helpers::add_user_to_db;
    use crate::data::open_test_database;

    fn date(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn user(name: &str, db: &Connection) -> UserID {
        add_user_to_db(name, "$argon2id$placeholder", None, db).unwrap()
    }

    #[test]
    fn added_task_is_listed_for_its_date_as_not_completed() {
        let db = open_test_database();
        let alice = user("alice", &db);

        let task = add_task(alice, "2024-01-03", "water the plants", &db).unwrap();
        let listed = list_tasks(alice, Some(date("2024-01-03")), &db).unwrap();

        assert_eq!(listed, vec![task.clone()]);
        assert!(!listed[0].completed);
        assert_eq!(listed[0].description, "water the plants");
    }

    #[test]
    fn listing_groups_by_date_then_insertion_order() {
        let db = open_test_database();
        let alice = user("alice", &db);

        let late = add_task(alice, "2024-01-05", "b", &db).unwrap();
        let early_first = add_task(alice, "2024-01-01", "a1", &db).unwrap();
        let early_second = add_task(alice, "2024-01-01", "a2", &db).unwrap();

        let ids: Vec<TaskID> = list_tasks(alice, None, &db)
            .unwrap()
            .iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec![early_first.id, early_second.id, late.id]);
    }

    #[test]
    fn empty_description_and_bad_date_are_rejected() {
        let db = open_test_database();
        let alice = user("alice", &db);

        assert!(matches!(
            add_task(alice, "2024-01-01", "   ", &db),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            add_task(alice, "01/02/2024", "x", &db),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            add_task(alice, "2024-02-30", "x", &db),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn toggling_twice_restores_the_original_state() {
        let db = open_test_database();
        let alice = user("alice", &db);
        let task = add_task(alice, "2024-01-01", "stretch", &db).unwrap();

        let once = toggle_task_in_db(alice, task.id, &db).unwrap();
        assert!(once.completed);

        let twice = toggle_task_in_db(alice, task.id, &db).unwrap();
        assert!(!twice.completed);
        assert_eq!(twice, task);
    }

    #[test]
    fn explicit_completed_value_is_applied() {
        let db = open_test_database();
        let alice = user("alice", &db);
        let task = add_task(alice, "2024-01-01", "stretch", &db).unwrap();

        assert!(update_task(alice, task.id, Some(true), &db).unwrap().completed);
        assert!(update_task(alice, task.id, Some(true), &db).unwrap().completed);
        assert!(!update_task(alice, task.id, None, &db).unwrap().completed);
    }

    #[test]
    fn toggle_after_delete_is_not_found() {
        let db = open_test_database();
        let alice = user("alice", &db);
        let task = add_task(alice, "2024-01-01", "stretch", &db).unwrap();

        delete_task_from_db(alice, task.id, &db).unwrap();

        assert!(matches!(
            toggle_task_in_db(alice, task.id, &db),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            delete_task_from_db(alice, task.id, &db),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let db = open_test_database();
        let alice = user("alice", &db);
        let first = add_task(alice, "2024-01-01", "one", &db).unwrap();

        delete_task_from_db(alice, first.id, &db).unwrap();
        let second = add_task(alice, "2024-01-01", "two", &db).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn users_cannot_touch_each_others_tasks() {
        let db = open_test_database();
        let alice = user("alice", &db);
        let bob = user("bob", &db);
        let task = add_task(alice, "2024-01-01", "private", &db).unwrap();

        assert!(list_tasks(bob, None, &db).unwrap().is_empty());
        assert!(matches!(
            toggle_task_in_db(bob, task.id, &db),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            set_task_completed_in_db(bob, task.id, true, &db),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            delete_task_from_db(bob, task.id, &db),
            Err(ApiError::NotFound)
        ));

        let untouched = list_tasks(alice, None, &db).unwrap();
        assert_eq!(untouched, vec![task]);
    }
}

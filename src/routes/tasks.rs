use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{CreateTaskRequest, Task, TaskPriority, UpdateTaskRequest},
    validation,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;

const TASK_COLUMNS: &str =
    "id, title, description, completed, due_date, priority, created_at, updated_at, user_id";

/// Lists the authenticated user's tasks, newest first. An empty list is a
/// normal 200, never an error.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
        TASK_COLUMNS
    ))
    .bind(user.0.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// New tasks always start open: there is no `completed` field on the create
/// payload, and the insert stores `false` unconditionally.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let data = data.into_inner();

    let title = data.title.as_deref().unwrap_or("");
    if !validation::is_valid_task_title(title) {
        return Err(AppError::Validation("Title is required".into()));
    }

    let description = data
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    let due_date = parse_due_date_value(data.due_date.as_deref())?;
    let priority = parse_priority_value(data.priority.as_deref())?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, completed, due_date, priority, user_id) \
         VALUES ($1, $2, FALSE, $3, $4, $5) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(title.trim())
    .bind(description)
    .bind(due_date)
    .bind(priority)
    .bind(user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Applies a partial update to a task owned by the authenticated user.
///
/// Absent fields are left unchanged; an explicit `null` (or blank string)
/// for `dueDate`/`priority` clears the field; `updated_at` is always
/// refreshed by the UPDATE itself.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    task_id: web::Path<i32>,
    data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let data = data.into_inner();
    let mut task = load_task_for_owner(pool.get_ref(), user.0.id, task_id.into_inner()).await?;

    if let Some(title) = data.title {
        task.title = title;
    }
    if let Some(description) = data.description {
        task.description = description;
    }
    if let Some(completed) = data.completed {
        task.completed = completed;
    }
    if let Some(due_date) = data.due_date {
        task.due_date = parse_due_date_value(due_date.as_deref())?;
    }
    if let Some(priority) = data.priority {
        task.priority = parse_priority_value(priority.as_deref())?;
    }

    let updated = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET title = $1, description = $2, completed = $3, due_date = $4, priority = $5, \
             updated_at = NOW() \
         WHERE id = $6 AND user_id = $7 \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.completed)
    .bind(task.due_date)
    .bind(task.priority)
    .bind(task.id)
    .bind(user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task owned by the authenticated user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id.into_inner())
        .bind(user.0.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

/// Loads a task by id for one owner, or fails with the same 404 whether the
/// id is absent or belongs to someone else. Every mutating route goes
/// through this rule so the two cases can never diverge and leak foreign
/// task ids.
async fn load_task_for_owner(pool: &PgPool, user_id: i32, task_id: i32) -> Result<Task, AppError> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Due date as received on the wire: blank means "none", anything else must
/// be a real `YYYY-MM-DD` calendar date.
fn parse_due_date_value(input: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match input {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => validation::parse_due_date(value)
            .map(Some)
            .ok_or_else(|| AppError::Validation("Invalid due date format".into())),
    }
}

/// Priority as received on the wire: blank means "none", anything else must
/// match high/medium/low case-insensitively.
fn parse_priority_value(input: Option<&str>) -> Result<Option<TaskPriority>, AppError> {
    match input {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => TaskPriority::parse(value).map(Some).ok_or_else(|| {
            AppError::Validation("Invalid priority. Must be high, medium, or low".into())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_due_date_value() {
        assert_eq!(parse_due_date_value(None).unwrap(), None);
        assert_eq!(parse_due_date_value(Some("")).unwrap(), None);
        assert_eq!(parse_due_date_value(Some("   ")).unwrap(), None);
        assert_eq!(
            parse_due_date_value(Some("2026-03-14")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 14)
        );
        assert!(matches!(
            parse_due_date_value(Some("tomorrow")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_priority_value() {
        assert_eq!(parse_priority_value(None).unwrap(), None);
        assert_eq!(parse_priority_value(Some("")).unwrap(), None);
        assert_eq!(
            parse_priority_value(Some("HIGH")).unwrap(),
            Some(TaskPriority::High)
        );
        match parse_priority_value(Some("urgent")) {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Invalid priority. Must be high, medium, or low")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

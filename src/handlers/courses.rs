use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{require_admin, CurrentUser};
use crate::models::{Course, Lesson};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct NewCourseRequest {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewLessonBatch {
    pub lessons: Vec<NewLessonRequest>,
}

#[derive(Debug, Deserialize)]
pub struct NewLessonRequest {
    pub title: String,
    pub content: String,
}

#[derive(Serialize)]
struct CourseDetailPayload {
    course: Course,
    lessons: Vec<Lesson>,
}

pub async fn list_courses(State(state): State<AppState>) -> Result<Response, AppError> {
    let courses = store::courses::list(&state.db).await?;
    Ok(success(courses, "Courses fetched successfully").into_response())
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let course = store::courses::find(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let lessons = store::courses::lessons_for(&state.db, course_id).await?;

    Ok(success(
        CourseDetailPayload { course, lessons },
        "Course fetched successfully",
    )
    .into_response())
}

pub async fn create_course(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<NewCourseRequest>,
) -> Result<Response, AppError> {
    require_admin(&current_user)?;

    if request.title.trim().is_empty() || request.description.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Course title and description are required".to_string(),
        ));
    }

    let course = store::courses::insert(
        &state.db,
        request.title.trim(),
        request.description.trim(),
        request.image_url.as_deref(),
    )
    .await?;

    tracing::info!(course_id = %course.id, "Course created");
    Ok(created(course, "Course created successfully").into_response())
}

pub async fn create_lessons(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(course_id): Path<Uuid>,
    Json(request): Json<NewLessonBatch>,
) -> Result<Response, AppError> {
    require_admin(&current_user)?;
    validate_lesson_batch(&request)?;

    store::courses::find(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let pairs: Vec<(String, String)> = request
        .lessons
        .into_iter()
        .map(|lesson| (lesson.title, lesson.content))
        .collect();

    let lessons = store::courses::insert_lessons(&state.db, course_id, &pairs).await?;

    tracing::info!(course_id = %course_id, lessons = lessons.len(), "Lessons added");
    Ok(created(lessons, "Lessons created successfully").into_response())
}

fn validate_lesson_batch(request: &NewLessonBatch) -> Result<(), AppError> {
    if request.lessons.is_empty() {
        return Err(AppError::ValidationError(
            "At least one lesson is required".to_string(),
        ));
    }
    for lesson in &request.lessons {
        if lesson.title.trim().is_empty() || lesson.content.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Every lesson needs a title and content".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(lessons: Vec<(&str, &str)>) -> NewLessonBatch {
        NewLessonBatch {
            lessons: lessons
                .into_iter()
                .map(|(title, content)| NewLessonRequest {
                    title: title.to_string(),
                    content: content.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn non_empty_batch_passes() {
        assert!(validate_lesson_batch(&batch(vec![("Intro", "Welcome.")])).is_ok());
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(validate_lesson_batch(&batch(vec![])).is_err());
    }

    #[test]
    fn untitled_lesson_is_rejected() {
        assert!(validate_lesson_batch(&batch(vec![("", "content")])).is_err());
        assert!(validate_lesson_batch(&batch(vec![("title", "  ")])).is_err());
    }
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Course, Lesson};
use crate::utils::error::AppError;

pub async fn list(pool: &PgPool) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        "SELECT id, title, description, image_url, link, created_at \
         FROM courses ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(courses)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Course>, AppError> {
    let course = sqlx::query_as::<_, Course>(
        "SELECT id, title, description, image_url, link, created_at \
         FROM courses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(course)
}

pub async fn lessons_for(pool: &PgPool, course_id: Uuid) -> Result<Vec<Lesson>, AppError> {
    let lessons = sqlx::query_as::<_, Lesson>(
        "SELECT id, course_id, title, content FROM lessons WHERE course_id = $1",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;
    Ok(lessons)
}

pub async fn insert(
    pool: &PgPool,
    title: &str,
    description: &str,
    image_url: Option<&str>,
) -> Result<Course, AppError> {
    let id = Uuid::new_v4();
    // The browse link is derived from the id so the frontend can route
    // straight to the detail page.
    let link = format!("/courses/{id}");

    let course = sqlx::query_as::<_, Course>(
        "INSERT INTO courses (id, title, description, image_url, link) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, title, description, image_url, link, created_at",
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(image_url)
    .bind(link)
    .fetch_one(pool)
    .await?;
    Ok(course)
}

/// Insert a batch of lessons for one course. All-or-nothing: a failure on
/// any row rolls back the whole batch.
pub async fn insert_lessons(
    pool: &PgPool,
    course_id: Uuid,
    lessons: &[(String, String)],
) -> Result<Vec<Lesson>, AppError> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(lessons.len());

    for (title, content) in lessons {
        let lesson = sqlx::query_as::<_, Lesson>(
            "INSERT INTO lessons (id, course_id, title, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, course_id, title, content",
        )
        .bind(Uuid::new_v4())
        .bind(course_id)
        .bind(title)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;
        created.push(lesson);
    }

    tx.commit().await?;
    Ok(created)
}

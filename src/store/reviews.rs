/// Review records, keyed to their book by explicit `book_id`.

use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub content: String,
    pub book_id: i64,
}

pub async fn create(pool: &PgPool, book_id: i64, content: &str) -> Result<Review, AppError> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (content, book_id)
        VALUES ($1, $2)
        RETURNING id, content, book_id
        "#,
    )
    .bind(content)
    .bind(book_id)
    .fetch_one(pool)
    .await?;

    Ok(review)
}

/// All reviews for one book, oldest first.
pub async fn list_for_book(pool: &PgPool, book_id: i64) -> Result<Vec<Review>, AppError> {
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT id, content, book_id FROM reviews WHERE book_id = $1 ORDER BY id",
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

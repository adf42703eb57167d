/// Book records

use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, DatabaseError};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
}

pub async fn create(pool: &PgPool, title: &str, author: &str) -> Result<Book, AppError> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (title, author)
        VALUES ($1, $2)
        RETURNING id, title, author
        "#,
    )
    .bind(title)
    .bind(author)
    .fetch_one(pool)
    .await?;

    Ok(book)
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Book>, AppError> {
    let book = sqlx::query_as::<_, Book>("SELECT id, title, author FROM books WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(book)
}

/// List books with offset/limit paging, oldest first.
pub async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Book>, AppError> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, title, author FROM books ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

/// Update title and author of an existing book.
pub async fn update(
    pool: &PgPool,
    id: i64,
    title: &str,
    author: &str,
) -> Result<Option<Book>, AppError> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        UPDATE books SET title = $2, author = $3
        WHERE id = $1
        RETURNING id, title, author
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(author)
    .fetch_optional(pool)
    .await?;

    Ok(book)
}

/// Delete a book and its reviews. Returns false when no such book existed.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let mut transaction = pool.begin().await?;

    sqlx::query("DELETE FROM reviews WHERE book_id = $1")
        .bind(id)
        .execute(&mut transaction)
        .await?;

    let result = sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(&mut transaction)
        .await?;

    transaction.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Case-insensitive substring search over title and/or author.
pub async fn search(
    pool: &PgPool,
    title: Option<&str>,
    author: Option<&str>,
) -> Result<Vec<Book>, AppError> {
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT id, title, author FROM books
        WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR author ILIKE '%' || $2 || '%')
        ORDER BY id
        "#,
    )
    .bind(title)
    .bind(author)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

/// Fetch a book or fail with a 404-mapped error.
pub async fn get_or_not_found(pool: &PgPool, id: i64) -> Result<Book, AppError> {
    get(pool, id)
        .await?
        .ok_or_else(|| AppError::Database(DatabaseError::NotFound("Book not found".to_string())))
}

/// Book Routes
///
/// CRUD and search over books. Every handler here sits behind the bearer
/// guard; the authenticated user arrives via request extensions.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, DatabaseError};
use crate::store::books;
use crate::store::users::User;
use crate::validators::{is_valid_author, is_valid_title};

#[derive(Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub author: Option<String>,
}

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 500;

/// POST /books/
pub async fn create_book(
    form: web::Json<BookRequest>,
    pool: web::Data<PgPool>,
    user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let title = is_valid_title(&form.title)?;
    let author = is_valid_author(&form.author)?;

    let book = books::create(pool.get_ref(), &title, &author).await?;

    tracing::info!(user_id = user.id, book_id = book.id, "Book created");

    Ok(HttpResponse::Created().json(book))
}

/// GET /books/?skip=&limit=
pub async fn list_books(
    params: web::Query<ListParams>,
    pool: web::Data<PgPool>,
    _user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let skip = params.skip.unwrap_or(0).max(0);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(0, MAX_LIST_LIMIT);

    let book_list = books::list(pool.get_ref(), skip, limit).await?;

    Ok(HttpResponse::Ok().json(book_list))
}

/// GET /books/{book_id}
pub async fn get_book(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    _user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let book = books::get_or_not_found(pool.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(book))
}

/// PUT /books/{book_id}
pub async fn update_book(
    path: web::Path<i64>,
    form: web::Json<BookRequest>,
    pool: web::Data<PgPool>,
    user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let title = is_valid_title(&form.title)?;
    let author = is_valid_author(&form.author)?;
    let book_id = path.into_inner();

    let book = books::update(pool.get_ref(), book_id, &title, &author)
        .await?
        .ok_or_else(|| AppError::Database(DatabaseError::NotFound("Book not found".to_string())))?;

    tracing::info!(user_id = user.id, book_id = book.id, "Book updated");

    Ok(HttpResponse::Ok().json(book))
}

/// DELETE /books/{book_id}
pub async fn delete_book(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let book_id = path.into_inner();

    let deleted = books::delete(pool.get_ref(), book_id).await?;
    if !deleted {
        return Err(AppError::Database(DatabaseError::NotFound(
            "Book not found".to_string(),
        )));
    }

    tracing::info!(user_id = user.id, book_id = book_id, "Book deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// GET /books/search/?title=&author=
///
/// Case-insensitive substring match on either or both fields. An empty
/// result is a 404, matching the collection endpoints' contract.
pub async fn search_books(
    params: web::Query<SearchParams>,
    pool: web::Data<PgPool>,
    _user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let results = books::search(
        pool.get_ref(),
        params.title.as_deref(),
        params.author.as_deref(),
    )
    .await?;

    if results.is_empty() {
        return Err(AppError::Database(DatabaseError::NotFound(
            "No books found matching the criteria".to_string(),
        )));
    }

    Ok(HttpResponse::Ok().json(results))
}

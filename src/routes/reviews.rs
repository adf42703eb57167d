/// Review Routes
///
/// Reviews hang off a book by explicit id; both endpoints 404 on an unknown
/// book, and listing 404s when a book has no reviews yet.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, DatabaseError};
use crate::store::users::User;
use crate::store::{books, reviews};
use crate::validators::is_valid_content;

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub content: String,
}

/// POST /books/{book_id}/reviews/
pub async fn create_review(
    path: web::Path<i64>,
    form: web::Json<ReviewRequest>,
    pool: web::Data<PgPool>,
    user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let content = is_valid_content(&form.content)?;
    let book = books::get_or_not_found(pool.get_ref(), path.into_inner()).await?;

    let review = reviews::create(pool.get_ref(), book.id, &content).await?;

    tracing::info!(
        user_id = user.id,
        book_id = book.id,
        review_id = review.id,
        "Review created"
    );

    Ok(HttpResponse::Created().json(review))
}

/// GET /books/{book_id}/reviews/
pub async fn list_reviews(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    _user: web::ReqData<User>,
) -> Result<HttpResponse, AppError> {
    let book_id = path.into_inner();

    let review_list = reviews::list_for_book(pool.get_ref(), book_id).await?;
    if review_list.is_empty() {
        return Err(AppError::Database(DatabaseError::NotFound(
            "No reviews found for this book".to_string(),
        )));
    }

    Ok(HttpResponse::Ok().json(review_list))
}

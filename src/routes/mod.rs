mod auth;
mod books;
mod health_check;
mod reviews;

pub use auth::create_user;
pub use auth::issue_access_token;
pub use books::{create_book, delete_book, get_book, list_books, search_books, update_book};
pub use health_check::health_check;
pub use reviews::{create_review, list_reviews};

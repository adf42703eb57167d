use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::auth::SessionConfig;
use crate::middleware::BearerAuth;
use crate::routes::{
    create_book, create_review, create_user, delete_book, get_book, health_check,
    issue_access_token, list_books, list_reviews, search_books, update_book,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    session_config: SessionConfig,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let session_config_data = web::Data::new(session_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())

            // Shared state
            .app_data(connection.clone())
            .app_data(session_config_data.clone())

            // Public routes (no authentication required)
            .route("/health_check", web::get().to(health_check))
            .route("/users/", web::post().to(create_user))
            .route("/token/", web::post().to(issue_access_token))

            // Protected routes (require a bearer token).
            // "/search/" is registered before "/{book_id}" so it is not
            // swallowed by the id matcher.
            .service(
                web::scope("/books")
                    .wrap(BearerAuth::new(session_config.clone()))
                    .route("/", web::post().to(create_book))
                    .route("/", web::get().to(list_books))
                    .route("/search/", web::get().to(search_books))
                    .route("/{book_id}", web::get().to(get_book))
                    .route("/{book_id}", web::put().to(update_book))
                    .route("/{book_id}", web::delete().to(delete_book))
                    .route("/{book_id}/reviews/", web::post().to(create_review))
                    .route("/{book_id}/reviews/", web::get().to(list_reviews)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}

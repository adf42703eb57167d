/// Middleware module

mod bearer;

pub use bearer::BearerAuth;

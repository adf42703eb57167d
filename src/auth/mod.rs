/// Authentication module
///
/// Password hashing, session token issuance/validation, and the session
/// authenticator that ties them to the user store.

mod claims;
mod password;
mod session;
mod token;

pub use claims::Claims;
pub use password::hash_password;
pub use password::verify_password;
pub use session::authenticate_request;
pub use session::login;
pub use session::register;
pub use session::SessionConfig;
pub use token::decode_token;
pub use token::issue_token;

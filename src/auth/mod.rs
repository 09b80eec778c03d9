pub mod cookies;
pub mod password;
pub mod tokens;

pub use tokens::{AuthError, Claims, TokenService};

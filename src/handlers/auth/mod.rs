pub mod refresh;
pub mod user;

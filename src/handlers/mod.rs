pub mod auth;
pub mod configs;
pub mod feed;

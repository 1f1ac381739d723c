//! HTTP request handlers.

pub mod health_handler;
pub mod home_handler;
pub mod user_handler;

pub use health_handler::health_routes;
pub use home_handler::home_routes;
pub use user_handler::user_routes;

pub mod analytics;
pub mod auth;
pub mod category;
pub mod comment;
pub mod health;
pub mod project;
pub mod todo;

pub mod category;
pub mod project;
pub mod user;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod analytics_repo;
pub mod category_repo;
pub mod project_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use category_repo::CategoryRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;

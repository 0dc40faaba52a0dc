pub mod sqlite_user_repo;
pub mod sqlite_category_repo;
pub mod sqlite_event_repo;
pub mod sqlite_request_repo;
pub mod sqlite_compilation_repo;
pub mod sqlite_comment_repo;

pub mod postgres_user_repo;
pub mod postgres_category_repo;
pub mod postgres_event_repo;
pub mod postgres_request_repo;
pub mod postgres_compilation_repo;
pub mod postgres_comment_repo;

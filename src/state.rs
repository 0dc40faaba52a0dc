use std::sync::Arc;
use crate::domain::ports::{
    CategoryRepository, CommentRepository, CompilationRepository,
    EventRepository, RequestRepository, UserRepository,
};
use crate::domain::services::stats::StatsService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub request_repo: Arc<dyn RequestRepository>,
    pub compilation_repo: Arc<dyn CompilationRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub stats: Arc<StatsService>,
}

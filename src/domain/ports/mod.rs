use crate::domain::models::{
    category::Category,
    comment::{Comment, CommentStatus},
    compilation::Compilation,
    event::{AdminEventFilter, Event, NewEvent, PublicEventFilter},
    request::{ParticipationRequest, RequestStatus, RequestStatusUpdateResult},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, name: &str, email: &str) -> Result<User, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self, ids: Option<&[i64]>, from: i64, size: i64) -> Result<Vec<User>, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Category, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;
    async fn update(&self, category: &Category) -> Result<Category, AppError>;
    async fn list(&self, from: i64, size: i64) -> Result<Vec<Category>, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// Event persistence. `update` never touches `confirmed_requests`; that
/// column belongs to the request repository's transactions.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;
    async fn find_by_id_and_initiator(&self, id: i64, initiator_id: i64) -> Result<Option<Event>, AppError>;
    async fn find_published(&self, id: i64) -> Result<Option<Event>, AppError>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Event>, AppError>;
    async fn list_by_initiator(&self, initiator_id: i64, from: i64, size: i64) -> Result<Vec<Event>, AppError>;
    async fn search_admin(&self, filter: &AdminEventFilter) -> Result<Vec<Event>, AppError>;
    async fn search_public(&self, filter: &PublicEventFilter) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn exists_with_category(&self, category_id: i64) -> Result<bool, AppError>;
}

/// Participation-request persistence. The three mutating operations are each
/// a single store transaction that keeps the owning event's
/// `confirmed_requests` in step with the request rows.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Inserts a request with the given initial status. A `Confirmed` insert
    /// also increments the event counter, guarded against the participant
    /// limit; a full event fails with `Conflict`.
    async fn create(&self, event_id: i64, requester_id: i64, status: RequestStatus)
        -> Result<ParticipationRequest, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<ParticipationRequest>, AppError>;
    /// Looks up the requester's live (non-canceled) request for an event;
    /// canceled requests do not block a fresh application.
    async fn find_active_by_requester_and_event(&self, requester_id: i64, event_id: i64)
        -> Result<Option<ParticipationRequest>, AppError>;
    async fn list_by_requester(&self, requester_id: i64) -> Result<Vec<ParticipationRequest>, AppError>;
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<ParticipationRequest>, AppError>;
    async fn count_by_event_and_status(&self, event_id: i64, status: RequestStatus) -> Result<i64, AppError>;
    /// Flips the request to `Canceled`. Decrements the event counter exactly
    /// when the status read inside the transaction was `Confirmed`.
    async fn cancel(&self, request_id: i64) -> Result<ParticipationRequest, AppError>;
    /// Bulk moderation: requires every named request to be `Pending`, then
    /// confirms in the supplied order while capacity remains and rejects the
    /// rest (target `Confirmed`), or rejects all of them (target `Rejected`).
    async fn update_statuses(&self, event_id: i64, request_ids: &[i64], target: RequestStatus)
        -> Result<RequestStatusUpdateResult, AppError>;
}

#[async_trait]
pub trait CompilationRepository: Send + Sync {
    async fn create(&self, title: &str, pinned: bool, event_ids: &[i64]) -> Result<Compilation, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Compilation>, AppError>;
    async fn list(&self, pinned: Option<bool>, from: i64, size: i64) -> Result<Vec<Compilation>, AppError>;
    async fn event_ids(&self, compilation_id: i64) -> Result<Vec<i64>, AppError>;
    async fn update(&self, compilation: &Compilation, event_ids: Option<&[i64]>) -> Result<Compilation, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, text: &str, author_id: i64, event_id: i64) -> Result<Comment, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;
    async fn find_by_id_and_author(&self, id: i64, author_id: i64) -> Result<Option<Comment>, AppError>;
    async fn exists_by_author_and_event(&self, author_id: i64, event_id: i64) -> Result<bool, AppError>;
    async fn list_by_event_and_status(&self, event_id: i64, status: CommentStatus, from: i64, size: i64)
        -> Result<Vec<Comment>, AppError>;
    async fn list_by_author(&self, author_id: i64, from: i64, size: i64) -> Result<Vec<Comment>, AppError>;
    async fn search_admin(&self, event_ids: Option<&[i64]>, statuses: Option<&[CommentStatus]>, from: i64, size: i64)
        -> Result<Vec<Comment>, AppError>;
    async fn update_text(&self, id: i64, text: &str) -> Result<Comment, AppError>;
    async fn update_status(&self, id: i64, status: CommentStatus) -> Result<Comment, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointHit {
    pub app: String,
    pub uri: String,
    pub ip: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewStats {
    pub app: String,
    pub uri: String,
    pub hits: i64,
}

/// Outbound interface of the hit-counting microservice.
#[async_trait]
pub trait StatsClient: Send + Sync {
    async fn save_hit(&self, hit: &EndpointHit) -> Result<(), AppError>;
    async fn get_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        uris: &[String],
        unique: bool,
    ) -> Result<Vec<ViewStats>, AppError>;
}

use crate::domain::models::event::{AdminEventFilter, Event, EventState, NewEvent, PublicEventFilter};
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (title, annotation, description, category_id, initiator_id, event_date, paid,
                                 participant_limit, request_moderation, state, confirmed_requests, created_on)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
             RETURNING *"
        )
            .bind(&event.title).bind(&event.annotation).bind(&event.description)
            .bind(event.category_id).bind(event.initiator_id).bind(event.event_date)
            .bind(event.paid).bind(event.participant_limit).bind(event.request_moderation)
            .bind(EventState::Pending).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id_and_initiator(&self, id: i64, initiator_id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ? AND initiator_id = ?")
            .bind(id).bind(initiator_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_published(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ? AND state = 'PUBLISHED'")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Event>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM events WHERE id IN ({}) ORDER BY id", placeholders);
        let mut query = sqlx::query_as::<_, Event>(&sql);
        for id in ids {
            query = query.bind(*id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_initiator(&self, initiator_id: i64, from: i64, size: i64) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE initiator_id = ? ORDER BY id LIMIT ? OFFSET ?")
            .bind(initiator_id).bind(size).bind(from).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn search_admin(&self, filter: &AdminEventFilter) -> Result<Vec<Event>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM events WHERE 1 = 1");

        if let Some(users) = filter.users.as_deref().filter(|u| !u.is_empty()) {
            qb.push(" AND initiator_id IN (");
            let mut sep = qb.separated(", ");
            for user_id in users {
                sep.push_bind(*user_id);
            }
            qb.push(")");
        }
        if let Some(states) = filter.states.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND state IN (");
            let mut sep = qb.separated(", ");
            for state in states {
                sep.push_bind(*state);
            }
            qb.push(")");
        }
        if let Some(categories) = filter.categories.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND category_id IN (");
            let mut sep = qb.separated(", ");
            for category_id in categories {
                sep.push_bind(*category_id);
            }
            qb.push(")");
        }
        if let Some(start) = filter.range_start {
            qb.push(" AND event_date >= ");
            qb.push_bind(start);
        }
        if let Some(end) = filter.range_end {
            qb.push(" AND event_date <= ");
            qb.push_bind(end);
        }

        qb.push(" ORDER BY id LIMIT ");
        qb.push_bind(filter.size);
        qb.push(" OFFSET ");
        qb.push_bind(filter.from);

        qb.build_query_as::<Event>().fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn search_public(&self, filter: &PublicEventFilter) -> Result<Vec<Event>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM events WHERE state = 'PUBLISHED'");

        if let Some(text) = filter.text.as_deref().filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", text.to_lowercase());
            qb.push(" AND (LOWER(annotation) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(description) LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        if let Some(categories) = filter.categories.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND category_id IN (");
            let mut sep = qb.separated(", ");
            for category_id in categories {
                sep.push_bind(*category_id);
            }
            qb.push(")");
        }
        if let Some(paid) = filter.paid {
            qb.push(" AND paid = ");
            qb.push_bind(paid);
        }
        if let Some(start) = filter.range_start {
            qb.push(" AND event_date >= ");
            qb.push_bind(start);
        }
        if let Some(end) = filter.range_end {
            qb.push(" AND event_date <= ");
            qb.push_bind(end);
        }
        if filter.only_available {
            qb.push(" AND (participant_limit = 0 OR confirmed_requests < participant_limit)");
        }

        if filter.sort.as_deref() == Some("EVENT_DATE") {
            qb.push(" ORDER BY event_date LIMIT ");
        } else {
            qb.push(" ORDER BY id LIMIT ");
        }
        qb.push_bind(filter.size);
        qb.push(" OFFSET ");
        qb.push_bind(filter.from);

        qb.build_query_as::<Event>().fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        // confirmed_requests is deliberately absent: only the request
        // repository's transactions may move it.
        sqlx::query_as::<_, Event>(
            "UPDATE events SET title = ?, annotation = ?, description = ?, category_id = ?, event_date = ?,
                               paid = ?, participant_limit = ?, request_moderation = ?, state = ?, published_on = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(&event.title).bind(&event.annotation).bind(&event.description)
            .bind(event.category_id).bind(event.event_date).bind(event.paid)
            .bind(event.participant_limit).bind(event.request_moderation)
            .bind(event.state).bind(event.published_on)
            .bind(event.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn exists_with_category(&self, category_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM events WHERE category_id = ?")
            .bind(category_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count") > 0)
    }
}

use crate::domain::models::event::Event;
use crate::domain::models::request::{ParticipationRequest, RequestStatus, RequestStatusUpdateResult};
use crate::domain::ports::RequestRepository;
use crate::domain::services::admission;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction};

pub struct PostgresRequestRepo {
    pool: PgPool,
}

impl PostgresRequestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn set_status(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    status: RequestStatus,
) -> Result<ParticipationRequest, AppError> {
    sqlx::query_as::<_, ParticipationRequest>("UPDATE requests SET status = $1 WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(id)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::Database)
}

#[async_trait]
impl RequestRepository for PostgresRequestRepo {
    async fn create(&self, event_id: i64, requester_id: i64, status: RequestStatus) -> Result<ParticipationRequest, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, ParticipationRequest>(
            "INSERT INTO requests (event_id, requester_id, status, created) VALUES ($1, $2, $3, $4) RETURNING *"
        )
            .bind(event_id)
            .bind(requester_id)
            .bind(status)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if status == RequestStatus::Confirmed {
            // The guard re-checks capacity against the stored row; an event
            // filled by a concurrent writer yields zero affected rows.
            let result = sqlx::query(
                "UPDATE events SET confirmed_requests = confirmed_requests + 1
                 WHERE id = $1 AND (participant_limit = 0 OR confirmed_requests < participant_limit)"
            )
                .bind(event_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if result.rows_affected() == 0 {
                return Err(AppError::Conflict("The participant limit has been reached".to_string()));
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ParticipationRequest>, AppError> {
        sqlx::query_as::<_, ParticipationRequest>("SELECT * FROM requests WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_active_by_requester_and_event(&self, requester_id: i64, event_id: i64) -> Result<Option<ParticipationRequest>, AppError> {
        sqlx::query_as::<_, ParticipationRequest>(
            "SELECT * FROM requests WHERE requester_id = $1 AND event_id = $2 AND status != 'CANCELED'"
        )
            .bind(requester_id).bind(event_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_requester(&self, requester_id: i64) -> Result<Vec<ParticipationRequest>, AppError> {
        sqlx::query_as::<_, ParticipationRequest>("SELECT * FROM requests WHERE requester_id = $1 ORDER BY id")
            .bind(requester_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: i64) -> Result<Vec<ParticipationRequest>, AppError> {
        sqlx::query_as::<_, ParticipationRequest>("SELECT * FROM requests WHERE event_id = $1 ORDER BY id")
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_by_event_and_status(&self, event_id: i64, status: RequestStatus) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM requests WHERE event_id = $1 AND status = $2")
            .bind(event_id).bind(status).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }

    async fn cancel(&self, request_id: i64) -> Result<ParticipationRequest, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Snapshot the status before flipping it; the decrement below must
        // key off the pre-cancellation value.
        let existing = sqlx::query_as::<_, ParticipationRequest>("SELECT * FROM requests WHERE id = $1 FOR UPDATE")
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Request not found".to_string()))?;
        let prior_status = existing.status;

        let canceled = sqlx::query_as::<_, ParticipationRequest>(
            "UPDATE requests SET status = 'CANCELED' WHERE id = $1 RETURNING *"
        )
            .bind(request_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if prior_status == RequestStatus::Confirmed {
            sqlx::query("UPDATE events SET confirmed_requests = confirmed_requests - 1 WHERE id = $1")
                .bind(existing.event_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(canceled)
    }

    async fn update_statuses(&self, event_id: i64, request_ids: &[i64], target: RequestStatus) -> Result<RequestStatusUpdateResult, AppError> {
        if request_ids.is_empty() {
            return Ok(RequestStatusUpdateResult::default());
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Lock the event row so concurrent admissions serialize on it.
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".to_string()))?;

        let loaded = sqlx::query_as::<_, ParticipationRequest>(
            "SELECT * FROM requests WHERE event_id = $1 AND id = ANY($2)"
        )
            .bind(event_id)
            .bind(request_ids.to_vec())
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if loaded.iter().any(|r| r.status != RequestStatus::Pending) {
            return Err(AppError::Conflict("Request must have status PENDING".to_string()));
        }

        let ordered = admission::order_as_requested(loaded, request_ids);
        let mut result = RequestStatusUpdateResult::default();

        match target {
            RequestStatus::Rejected => {
                for request in ordered {
                    result.rejected_requests.push(set_status(&mut tx, request.id, RequestStatus::Rejected).await?);
                }
            }
            RequestStatus::Confirmed => {
                let available_slots = event.participant_limit as i64 - event.confirmed_requests;
                if available_slots <= 0 {
                    return Err(AppError::Conflict("The participant limit has been reached".to_string()));
                }

                let (to_confirm, to_reject) = admission::partition_by_capacity(ordered, available_slots);
                let confirmed_count = to_confirm.len() as i64;

                for request in to_confirm {
                    result.confirmed_requests.push(set_status(&mut tx, request.id, RequestStatus::Confirmed).await?);
                }
                for request in to_reject {
                    result.rejected_requests.push(set_status(&mut tx, request.id, RequestStatus::Rejected).await?);
                }

                sqlx::query("UPDATE events SET confirmed_requests = confirmed_requests + $1 WHERE id = $2")
                    .bind(confirmed_count)
                    .bind(event_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::Database)?;
            }
            _ => return Err(AppError::Validation("Target status must be CONFIRMED or REJECTED".to_string())),
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(result)
    }
}

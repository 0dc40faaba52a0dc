use crate::domain::models::comment::{Comment, CommentStatus};
use crate::domain::ports::CommentRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

pub struct PostgresCommentRepo {
    pool: PgPool,
}

impl PostgresCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepo {
    async fn create(&self, text: &str, author_id: i64, event_id: i64) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (text, author_id, event_id, status, created_on) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(text).bind(author_id).bind(event_id)
            .bind(CommentStatus::Pending).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id_and_author(&self, id: i64, author_id: i64) -> Result<Option<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1 AND author_id = $2")
            .bind(id).bind(author_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn exists_by_author_and_event(&self, author_id: i64, event_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM comments WHERE author_id = $1 AND event_id = $2")
            .bind(author_id).bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count") > 0)
    }

    async fn list_by_event_and_status(&self, event_id: i64, status: CommentStatus, from: i64, size: i64) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE event_id = $1 AND status = $2 ORDER BY created_on DESC LIMIT $3 OFFSET $4"
        )
            .bind(event_id).bind(status).bind(size).bind(from)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_author(&self, author_id: i64, from: i64, size: i64) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE author_id = $1 ORDER BY created_on DESC LIMIT $2 OFFSET $3"
        )
            .bind(author_id).bind(size).bind(from)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn search_admin(&self, event_ids: Option<&[i64]>, statuses: Option<&[CommentStatus]>, from: i64, size: i64) -> Result<Vec<Comment>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM comments WHERE 1 = 1");

        if let Some(event_ids) = event_ids.filter(|ids| !ids.is_empty()) {
            qb.push(" AND event_id IN (");
            let mut sep = qb.separated(", ");
            for event_id in event_ids {
                sep.push_bind(*event_id);
            }
            qb.push(")");
        }
        if let Some(statuses) = statuses.filter(|s| !s.is_empty()) {
            qb.push(" AND status IN (");
            let mut sep = qb.separated(", ");
            for status in statuses {
                sep.push_bind(*status);
            }
            qb.push(")");
        }

        qb.push(" ORDER BY created_on DESC LIMIT ");
        qb.push_bind(size);
        qb.push(" OFFSET ");
        qb.push_bind(from);

        qb.build_query_as::<Comment>().fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_text(&self, id: i64, text: &str) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>("UPDATE comments SET text = $1 WHERE id = $2 RETURNING *")
            .bind(text).bind(id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: i64, status: CommentStatus) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>("UPDATE comments SET status = $1 WHERE id = $2 RETURNING *")
            .bind(status).bind(id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }
        Ok(())
    }
}

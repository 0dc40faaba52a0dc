use crate::domain::models::comment::{Comment, CommentStatus};
use crate::domain::ports::CommentRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

pub struct SqliteCommentRepo {
    pool: SqlitePool,
}

impl SqliteCommentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepo {
    async fn create(&self, text: &str, author_id: i64, event_id: i64) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (text, author_id, event_id, status, created_on) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(text).bind(author_id).bind(event_id)
            .bind(CommentStatus::Pending).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id_and_author(&self, id: i64, author_id: i64) -> Result<Option<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ? AND author_id = ?")
            .bind(id).bind(author_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn exists_by_author_and_event(&self, author_id: i64, event_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM comments WHERE author_id = ? AND event_id = ?")
            .bind(author_id).bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count") > 0)
    }

    async fn list_by_event_and_status(&self, event_id: i64, status: CommentStatus, from: i64, size: i64) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE event_id = ? AND status = ? ORDER BY created_on DESC LIMIT ? OFFSET ?"
        )
            .bind(event_id).bind(status).bind(size).bind(from)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_author(&self, author_id: i64, from: i64, size: i64) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE author_id = ? ORDER BY created_on DESC LIMIT ? OFFSET ?"
        )
            .bind(author_id).bind(size).bind(from)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn search_admin(&self, event_ids: Option<&[i64]>, statuses: Option<&[CommentStatus]>, from: i64, size: i64) -> Result<Vec<Comment>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM comments WHERE 1 = 1");

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
        sqlx::query_as::<_, Comment>("UPDATE comments SET text = ? WHERE id = ? RETURNING *")
            .bind(text).bind(id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: i64, status: CommentStatus) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>("UPDATE comments SET status = ? WHERE id = ? RETURNING *")
            .bind(status).bind(id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }
        Ok(())
    }
}

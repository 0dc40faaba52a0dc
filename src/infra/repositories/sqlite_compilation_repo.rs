use crate::domain::models::compilation::Compilation;
use crate::domain::ports::CompilationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

pub struct SqliteCompilationRepo {
    pool: SqlitePool,
}

impl SqliteCompilationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn replace_links(
    tx: &mut Transaction<'_, Sqlite>,
    compilation_id: i64,
    event_ids: &[i64],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM compilation_events WHERE compilation_id = ?")
        .bind(compilation_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    for event_id in event_ids {
        sqlx::query("INSERT INTO compilation_events (compilation_id, event_id) VALUES (?, ?)")
            .bind(compilation_id)
            .bind(*event_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::Database)?;
    }
    Ok(())
}

#[async_trait]
impl CompilationRepository for SqliteCompilationRepo {
    async fn create(&self, title: &str, pinned: bool, event_ids: &[i64]) -> Result<Compilation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Compilation>(
            "INSERT INTO compilations (title, pinned) VALUES (?, ?) RETURNING *"
        )
            .bind(title).bind(pinned)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        replace_links(&mut tx, created.id, event_ids).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Compilation>, AppError> {
        sqlx::query_as::<_, Compilation>("SELECT * FROM compilations WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, pinned: Option<bool>, from: i64, size: i64) -> Result<Vec<Compilation>, AppError> {
        match pinned {
            Some(pinned) => {
                sqlx::query_as::<_, Compilation>("SELECT * FROM compilations WHERE pinned = ? ORDER BY id LIMIT ? OFFSET ?")
                    .bind(pinned).bind(size).bind(from).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Compilation>("SELECT * FROM compilations ORDER BY id LIMIT ? OFFSET ?")
                    .bind(size).bind(from).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn event_ids(&self, compilation_id: i64) -> Result<Vec<i64>, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT event_id FROM compilation_events WHERE compilation_id = ? ORDER BY event_id")
            .bind(compilation_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, compilation: &Compilation, event_ids: Option<&[i64]>) -> Result<Compilation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, Compilation>(
            "UPDATE compilations SET title = ?, pinned = ? WHERE id = ? RETURNING *"
        )
            .bind(&compilation.title).bind(compilation.pinned).bind(compilation.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if let Some(event_ids) = event_ids {
            replace_links(&mut tx, updated.id, event_ids).await?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM compilations WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Compilation not found".to_string()));
        }
        Ok(())
    }
}

use crate::domain::models::user::User;
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, name: &str, email: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>("INSERT INTO users (name, email) VALUES (?, ?) RETURNING *")
            .bind(name).bind(email).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, ids: Option<&[i64]>, from: i64, size: i64) -> Result<Vec<User>, AppError> {
        match ids.filter(|ids| !ids.is_empty()) {
            Some(ids) => {
                let placeholders = vec!["?"; ids.len()].join(", ");
                let sql = format!("SELECT * FROM users WHERE id IN ({}) ORDER BY id LIMIT ? OFFSET ?", placeholders);
                let mut query = sqlx::query_as::<_, User>(&sql);
                for id in ids {
                    query = query.bind(*id);
                }
                query.bind(size).bind(from).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id LIMIT ? OFFSET ?")
                    .bind(size).bind(from).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}

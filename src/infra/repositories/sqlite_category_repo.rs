use crate::domain::models::category::Category;
use crate::domain::ports::CategoryRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCategoryRepo {
    pool: SqlitePool,
}

impl SqliteCategoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepo {
    async fn create(&self, name: &str) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES (?) RETURNING *")
            .bind(name).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = ?")
            .bind(name).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>("UPDATE categories SET name = ? WHERE id = ? RETURNING *")
            .bind(&category.name).bind(category.id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, from: i64, size: i64) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id LIMIT ? OFFSET ?")
            .bind(size).bind(from).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }
}

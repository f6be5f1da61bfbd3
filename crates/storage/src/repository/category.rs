use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::category::CreateCategoryRequest;
use crate::error::{Result, StorageError};
use crate::models::Category;

/// Repository for Category database operations
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT pk_id, id, nome
            FROM categorias
            ORDER BY nome
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT pk_id, id, nome
            FROM categorias
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(category)
    }

    /// Look up a category by its unique name
    pub async fn find_by_nome(&self, nome: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT pk_id, id, nome
            FROM categorias
            WHERE nome = $1
            "#,
        )
        .bind(nome)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    pub async fn create(&self, req: &CreateCategoryRequest) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categorias (id, nome)
            VALUES ($1, $2)
            RETURNING pk_id, id, nome
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.nome)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e)
                .on_unique_violation(|| format!("A category named {} already exists", req.nome))
        })?;

        Ok(category)
    }
}

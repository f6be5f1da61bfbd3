use sqlx::PgPool;
use storage::{
    dto::category::CreateCategoryRequest, error::StorageError, models::Category,
    repository::category::CategoryRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

pub async fn list_categories(pool: &PgPool) -> WebResult<Vec<Category>> {
    let repo = CategoryRepository::new(pool);
    Ok(repo.list().await?)
}

pub async fn get_category(pool: &PgPool, id: Uuid) -> WebResult<Category> {
    let repo = CategoryRepository::new(pool);
    repo.find_by_id(id).await.map_err(|error| match error {
        StorageError::NotFound => WebError::NotFound(format!("Category not found with id: {}", id)),
        other => WebError::from(other),
    })
}

pub async fn create_category(pool: &PgPool, request: &CreateCategoryRequest) -> WebResult<Category> {
    let repo = CategoryRepository::new(pool);
    let category = repo.create(request).await?;

    tracing::info!(category_id = %category.id, nome = %category.nome, "Category created");

    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(nome: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            nome: nome.to_string(),
        }
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_duplicate_name_is_conflict(pool: PgPool) {
        create_category(&pool, &request("Scale")).await.unwrap();

        let error = create_category(&pool, &request("Scale")).await.unwrap_err();

        assert!(matches!(error, WebError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_get_by_id(pool: PgPool) {
        let created = create_category(&pool, &request("RX")).await.unwrap();

        let found = get_category(&pool, created.id).await.unwrap();
        assert_eq!(found.nome, "RX");

        let missing = get_category(&pool, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(missing, WebError::NotFound(_)));
    }
}

use sqlx::PgPool;
use storage::{
    dto::training_center::CreateTrainingCenterRequest, error::StorageError,
    models::TrainingCenter, repository::training_center::TrainingCenterRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

pub async fn list_training_centers(pool: &PgPool) -> WebResult<Vec<TrainingCenter>> {
    let repo = TrainingCenterRepository::new(pool);
    Ok(repo.list().await?)
}

pub async fn get_training_center(pool: &PgPool, id: Uuid) -> WebResult<TrainingCenter> {
    let repo = TrainingCenterRepository::new(pool);
    repo.find_by_id(id).await.map_err(|error| match error {
        StorageError::NotFound => {
            WebError::NotFound(format!("Training center not found with id: {}", id))
        }
        other => WebError::from(other),
    })
}

pub async fn create_training_center(
    pool: &PgPool,
    request: &CreateTrainingCenterRequest,
) -> WebResult<TrainingCenter> {
    let repo = TrainingCenterRepository::new(pool);
    let center = repo.create(request).await?;

    tracing::info!(training_center_id = %center.id, nome = %center.nome, "Training center created");

    Ok(center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(nome: &str) -> CreateTrainingCenterRequest {
        CreateTrainingCenterRequest {
            nome: nome.to_string(),
            endereco: "Rua dos Marombas, 157".to_string(),
            proprietario: "Hércules".to_string(),
        }
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_duplicate_name_is_conflict(pool: PgPool) {
        create_training_center(&pool, &request("CT King")).await.unwrap();

        let error = create_training_center(&pool, &request("CT King"))
            .await
            .unwrap_err();

        assert!(matches!(error, WebError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_list_is_ordered_by_name(pool: PgPool) {
        create_training_center(&pool, &request("Zeus Gym")).await.unwrap();
        create_training_center(&pool, &request("Atlas")).await.unwrap();

        let centers = list_training_centers(&pool).await.unwrap();

        let names: Vec<&str> = centers.iter().map(|c| c.nome.as_str()).collect();
        assert_eq!(names, ["Atlas", "Zeus Gym"]);
    }
}

use sqlx::PgPool;
use storage::{
    dto::athlete::{AthleteFilter, CreateAthleteRequest, NewAthlete, UpdateAthleteRequest},
    error::StorageError,
    models::{Athlete, AthleteSummary},
    repository::{
        athlete::AthleteRepository, category::CategoryRepository,
        training_center::TrainingCenterRepository,
    },
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

fn athlete_not_found(id: Uuid) -> impl FnOnce(StorageError) -> WebError {
    move |error| match error {
        StorageError::NotFound => WebError::NotFound(format!("Athlete not found with id: {}", id)),
        other => WebError::from(other),
    }
}

/// List one page of athletes matching the filter, with the total match count
pub async fn list_athletes(pool: &PgPool, filter: &AthleteFilter) -> WebResult<(Vec<Athlete>, i64)> {
    let repo = AthleteRepository::new(pool);
    Ok(repo.list(filter).await?)
}

/// List every athlete with the names of its category and training center
pub async fn list_formatted_athletes(pool: &PgPool) -> WebResult<Vec<AthleteSummary>> {
    let repo = AthleteRepository::new(pool);
    Ok(repo.list_summaries().await?)
}

pub async fn get_athlete(pool: &PgPool, id: Uuid) -> WebResult<Athlete> {
    let repo = AthleteRepository::new(pool);
    repo.find_by_id(id).await.map_err(athlete_not_found(id))
}

/// Create an athlete, resolving its category and then its training center by name
pub async fn create_athlete(pool: &PgPool, request: &CreateAthleteRequest) -> WebResult<Athlete> {
    let category_name = &request.categoria.nome;
    let category = CategoryRepository::new(pool)
        .find_by_nome(category_name)
        .await?
        .ok_or_else(|| WebError::BadRequest(format!("Category {} not found", category_name)))?;

    let center_name = &request.centro_treinamento.nome;
    let center = TrainingCenterRepository::new(pool)
        .find_by_nome(center_name)
        .await?
        .ok_or_else(|| {
            WebError::BadRequest(format!("Training center {} not found", center_name))
        })?;

    let new_athlete = NewAthlete::new(request, &category, &center);
    let athlete = AthleteRepository::new(pool).create(&new_athlete).await?;

    tracing::info!(athlete_id = %athlete.id, "Athlete created");

    Ok(athlete)
}

/// Apply the fields present in the request to an existing athlete
pub async fn update_athlete(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateAthleteRequest,
) -> WebResult<Athlete> {
    let repo = AthleteRepository::new(pool);

    let existing = repo.find_by_id(id).await.map_err(athlete_not_found(id))?;
    if request.is_empty() {
        return Ok(existing);
    }

    let changes = request.apply_to(&existing);
    let updated = repo
        .update(id, &changes)
        .await
        .map_err(athlete_not_found(id))?;

    tracing::info!(athlete_id = %id, "Athlete updated");

    Ok(updated)
}

pub async fn delete_athlete(pool: &PgPool, id: Uuid) -> WebResult<()> {
    let repo = AthleteRepository::new(pool);
    repo.delete(id).await.map_err(athlete_not_found(id))?;

    tracing::info!(athlete_id = %id, "Athlete deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use storage::dto::{
        athlete::{CategoryName, TrainingCenterName},
        category::CreateCategoryRequest,
        training_center::CreateTrainingCenterRequest,
    };

    async fn seed_references(pool: &PgPool) {
        CategoryRepository::new(pool)
            .create(&CreateCategoryRequest {
                nome: "Scale".to_string(),
            })
            .await
            .unwrap();
        TrainingCenterRepository::new(pool)
            .create(&CreateTrainingCenterRequest {
                nome: "CT King".to_string(),
                endereco: "Rua dos Marombas, 157".to_string(),
                proprietario: "Hércules".to_string(),
            })
            .await
            .unwrap();
    }

    fn athlete_request(nome: &str, cpf: &str) -> CreateAthleteRequest {
        CreateAthleteRequest {
            nome: nome.to_string(),
            cpf: cpf.to_string(),
            idade: 30,
            peso: Decimal::new(805, 1),
            altura: Decimal::new(178, 2),
            sexo: "M".to_string(),
            categoria: CategoryName {
                nome: "Scale".to_string(),
            },
            centro_treinamento: TrainingCenterName {
                nome: "CT King".to_string(),
            },
        }
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_create_assigns_id_and_timestamp(pool: PgPool) {
        seed_references(&pool).await;

        let athlete = create_athlete(&pool, &athlete_request("Joao", "11111111111"))
            .await
            .unwrap();

        assert_eq!(athlete.nome, "Joao");
        assert_eq!(athlete.categoria_nome, "Scale");
        assert_eq!(athlete.centro_treinamento_nome, "CT King");
        let fetched = get_athlete(&pool, athlete.id).await.unwrap();
        assert_eq!(fetched.created_at, athlete.created_at);
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_category_is_checked_before_training_center(pool: PgPool) {
        let error = create_athlete(&pool, &athlete_request("Joao", "11111111111"))
            .await
            .unwrap_err();

        match error {
            WebError::BadRequest(msg) => assert_eq!(msg, "Category Scale not found"),
            unexpected => panic!("unexpected error: {unexpected}"),
        }
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_missing_training_center_is_reported(pool: PgPool) {
        CategoryRepository::new(&pool)
            .create(&CreateCategoryRequest {
                nome: "Scale".to_string(),
            })
            .await
            .unwrap();

        let error = create_athlete(&pool, &athlete_request("Joao", "11111111111"))
            .await
            .unwrap_err();

        match error {
            WebError::BadRequest(msg) => assert_eq!(msg, "Training center CT King not found"),
            unexpected => panic!("unexpected error: {unexpected}"),
        }
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_duplicate_cpf_is_conflict_and_keeps_first(pool: PgPool) {
        seed_references(&pool).await;
        let first = create_athlete(&pool, &athlete_request("Joao", "11111111111"))
            .await
            .unwrap();

        let error = create_athlete(&pool, &athlete_request("Maria", "11111111111"))
            .await
            .unwrap_err();

        match error {
            WebError::Conflict(msg) => assert!(msg.contains("11111111111")),
            unexpected => panic!("unexpected error: {unexpected}"),
        }
        let kept = get_athlete(&pool, first.id).await.unwrap();
        assert_eq!(kept.nome, "Joao");
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_list_filters_and_paginates(pool: PgPool) {
        seed_references(&pool).await;
        for (nome, cpf) in [("Ana", "1"), ("Bruno", "2"), ("Ana", "3"), ("Carla", "4")] {
            create_athlete(&pool, &athlete_request(nome, cpf)).await.unwrap();
        }

        let by_name = AthleteFilter {
            nome: Some("Ana".to_string()),
            limit: 10,
            ..AthleteFilter::default()
        };
        let (items, total) = list_athletes(&pool, &by_name).await.unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().all(|a| a.nome == "Ana"));

        let (page, total) = list_athletes(&pool, &AthleteFilter::default()).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(total, 4);

        let both = AthleteFilter {
            nome: Some("Ana".to_string()),
            cpf: Some("3".to_string()),
            ..AthleteFilter::default()
        };
        let (items, total) = list_athletes(&pool, &both).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].cpf, "3");
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_formatted_listing_resolves_names(pool: PgPool) {
        seed_references(&pool).await;
        create_athlete(&pool, &athlete_request("Joao", "11111111111"))
            .await
            .unwrap();

        let formatted = list_formatted_athletes(&pool).await.unwrap();

        assert_eq!(formatted.len(), 1);
        assert_eq!(formatted[0].categoria_nome, "Scale");
        assert_eq!(formatted[0].centro_treinamento_nome, "CT King");
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_unknown_id_is_not_found_everywhere(pool: PgPool) {
        let id = Uuid::new_v4();

        let get = get_athlete(&pool, id).await.unwrap_err();
        let update = update_athlete(&pool, id, &UpdateAthleteRequest::default())
            .await
            .unwrap_err();
        let delete = delete_athlete(&pool, id).await.unwrap_err();

        for error in [get, update, delete] {
            match error {
                WebError::NotFound(msg) => assert!(msg.contains(&id.to_string())),
                unexpected => panic!("unexpected error: {unexpected}"),
            }
        }
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_update_changes_only_supplied_fields(pool: PgPool) {
        seed_references(&pool).await;
        let created = create_athlete(&pool, &athlete_request("Joao", "11111111111"))
            .await
            .unwrap();

        let patch = UpdateAthleteRequest {
            peso: Some(Decimal::new(820, 1)),
            ..UpdateAthleteRequest::default()
        };
        let updated = update_athlete(&pool, created.id, &patch).await.unwrap();

        assert_eq!(updated.peso, Decimal::new(820, 1));
        assert_eq!(updated.nome, created.nome);
        assert_eq!(updated.cpf, created.cpf);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_deleted_athlete_is_gone(pool: PgPool) {
        seed_references(&pool).await;
        let created = create_athlete(&pool, &athlete_request("Joao", "11111111111"))
            .await
            .unwrap();

        delete_athlete(&pool, created.id).await.unwrap();

        let error = get_athlete(&pool, created.id).await.unwrap_err();
        assert!(matches!(error, WebError::NotFound(_)));
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_measurements_are_stored_without_rounding_or_overflow(pool: PgPool) {
        seed_references(&pool).await;
        let mut request = athlete_request("Joao", "11111111111");
        request.peso = Decimal::new(61555, 3);
        request.altura = Decimal::new(170, 0);

        let created = create_athlete(&pool, &request).await.unwrap();

        assert_eq!(created.peso.to_string(), "61.555");
        assert_eq!(created.altura, Decimal::new(170, 0));

        let patch = UpdateAthleteRequest {
            peso: Some(Decimal::new(123456789, 2)),
            ..UpdateAthleteRequest::default()
        };
        let updated = update_athlete(&pool, created.id, &patch).await.unwrap();
        assert_eq!(updated.peso.to_string(), "1234567.89");
    }

    #[sqlx::test(migrations = "../storage/migrations")]
    #[ignore = "requires a PostgreSQL instance reachable through DATABASE_URL"]
    async fn test_update_duplicate_cpf_is_conflict(pool: PgPool) {
        seed_references(&pool).await;
        create_athlete(&pool, &athlete_request("Ana", "1")).await.unwrap();
        let other = create_athlete(&pool, &athlete_request("Bruno", "2"))
            .await
            .unwrap();

        let patch = UpdateAthleteRequest {
            cpf: Some("1".to_string()),
            ..UpdateAthleteRequest::default()
        };
        let error = update_athlete(&pool, other.id, &patch).await.unwrap_err();

        match error {
            WebError::Conflict(msg) => assert_eq!(msg, "An athlete with CPF 1 already exists"),
            unexpected => panic!("unexpected error: {unexpected}"),
        }
        let kept = get_athlete(&pool, other.id).await.unwrap();
        assert_eq!(kept.cpf, "2");
    }
}

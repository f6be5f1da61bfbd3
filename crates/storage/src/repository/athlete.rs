use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::athlete::{AthleteChanges, AthleteFilter, NewAthlete};
use crate::error::{Result, StorageError};
use crate::models::{Athlete, AthleteSummary};

/// Columns of an athlete row plus the joined relation names. `source` is the
/// relation aliased as `a`: the table itself or a data-modifying CTE.
fn select_from(source: &str) -> String {
    format!(
        r#"
        SELECT a.pk_id, a.id, a.nome, a.cpf, a.idade, a.peso, a.altura, a.sexo,
               a.created_at, a.categoria_id, a.centro_treinamento_id,
               c.nome AS categoria_nome,
               ct.nome AS centro_treinamento_nome
        FROM {source} a
        INNER JOIN categorias c ON c.pk_id = a.categoria_id
        INNER JOIN centros_treinamento ct ON ct.pk_id = a.centro_treinamento_id
        "#
    )
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &AthleteFilter) {
    if let Some(nome) = filter.nome() {
        query.push(" AND a.nome = ");
        query.push_bind(nome.to_string());
    }

    if let Some(cpf) = filter.cpf() {
        query.push(" AND a.cpf = ");
        query.push_bind(cpf.to_string());
    }
}

pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List athletes matching the filter, returning one page and the total match count
    pub async fn list(&self, filter: &AthleteFilter) -> Result<(Vec<Athlete>, i64)> {
        let total_items = self.count(filter).await?;

        let mut query = QueryBuilder::new(select_from("atletas"));
        query.push(" WHERE 1=1");
        push_filters(&mut query, filter);
        query.push(" ORDER BY a.created_at, a.pk_id LIMIT ");
        query.push_bind(i64::from(filter.limit));
        query.push(" OFFSET ");
        query.push_bind(i64::from(filter.offset));

        let athletes = query
            .build_query_as::<Athlete>()
            .fetch_all(self.pool)
            .await?;

        Ok((athletes, total_items))
    }

    async fn count(&self, filter: &AthleteFilter) -> Result<i64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM atletas a WHERE 1=1");
        push_filters(&mut query, filter);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Every athlete with only the names of its relations
    pub async fn list_summaries(&self) -> Result<Vec<AthleteSummary>> {
        let summaries = sqlx::query_as::<_, AthleteSummary>(
            r#"
            SELECT a.nome,
                   ct.nome AS centro_treinamento_nome,
                   c.nome AS categoria_nome
            FROM atletas a
            INNER JOIN categorias c ON c.pk_id = a.categoria_id
            INNER JOIN centros_treinamento ct ON ct.pk_id = a.centro_treinamento_id
            ORDER BY a.created_at, a.pk_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }

    /// Find athlete by its public id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Athlete> {
        let sql = format!("{} WHERE a.id = $1", select_from("atletas"));

        let athlete = sqlx::query_as::<_, Athlete>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(athlete)
    }

    /// Insert a new athlete. CPF uniqueness is left to the table constraint.
    pub async fn create(&self, athlete: &NewAthlete) -> Result<Athlete> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO atletas (id, nome, cpf, idade, peso, altura, sexo,
                                     created_at, categoria_id, centro_treinamento_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            {}
            "#,
            select_from("inserted")
        );

        let created = sqlx::query_as::<_, Athlete>(&sql)
            .bind(athlete.id)
            .bind(&athlete.nome)
            .bind(&athlete.cpf)
            .bind(athlete.idade)
            .bind(athlete.peso)
            .bind(athlete.altura)
            .bind(&athlete.sexo)
            .bind(athlete.created_at)
            .bind(athlete.categoria_id)
            .bind(athlete.centro_treinamento_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e)
                    .on_unique_violation(|| {
                        format!("An athlete with CPF {} already exists", athlete.cpf)
                    })
                    .on_foreign_key_violation(|| {
                        "The category or training center no longer exists".to_string()
                    })
            })?;

        Ok(created)
    }

    /// Overwrite the mutable columns of an existing athlete
    pub async fn update(&self, id: Uuid, changes: &AthleteChanges) -> Result<Athlete> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE atletas
                SET nome = $2,
                    cpf = $3,
                    idade = $4,
                    peso = $5,
                    altura = $6,
                    sexo = $7
                WHERE id = $1
                RETURNING *
            )
            {}
            "#,
            select_from("updated")
        );

        let athlete = sqlx::query_as::<_, Athlete>(&sql)
            .bind(id)
            .bind(&changes.nome)
            .bind(&changes.cpf)
            .bind(changes.idade)
            .bind(changes.peso)
            .bind(changes.altura)
            .bind(&changes.sexo)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e).on_unique_violation(|| {
                    format!("An athlete with CPF {} already exists", changes.cpf)
                })
            })?
            .ok_or(StorageError::NotFound)?;

        Ok(athlete)
    }

    /// Delete an athlete by its public id
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM atletas WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

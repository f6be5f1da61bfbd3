use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Row from `atletas` joined with the names of its category and training center.
#[derive(Debug, Clone, FromRow)]
pub struct Athlete {
    pub pk_id: i32,
    pub id: Uuid,
    pub nome: String,
    pub cpf: String,
    pub idade: i32,
    pub peso: Decimal,
    pub altura: Decimal,
    pub sexo: String,
    pub created_at: NaiveDateTime,
    pub categoria_id: i32,
    pub centro_treinamento_id: i32,
    pub categoria_nome: String,
    pub centro_treinamento_nome: String,
}

/// Name-only projection used by the formatted listing.
#[derive(Debug, Clone, FromRow)]
pub struct AthleteSummary {
    pub nome: String,
    pub centro_treinamento_nome: String,
    pub categoria_nome: String,
}

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginationParams, default_limit};
use crate::models::{Athlete, AthleteSummary, Category, TrainingCenter};

/// Category embedded in athlete payloads, referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryName {
    #[validate(length(min = 1, max = 10, message = "Category name must be between 1 and 10 characters"))]
    #[schema(example = "Scale")]
    pub nome: String,
}

/// Training center embedded in athlete payloads, referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct TrainingCenterName {
    #[validate(length(min = 1, max = 20, message = "Training center name must be between 1 and 20 characters"))]
    #[schema(example = "CT King")]
    pub nome: String,
}

/// Full athlete representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AthleteResponse {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub nome: String,
    pub cpf: String,
    pub idade: i32,
    pub peso: Decimal,
    pub altura: Decimal,
    pub sexo: String,
    pub categoria: CategoryName,
    pub centro_treinamento: TrainingCenterName,
}

/// Display projection: athlete name plus the names of its relations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormattedAthleteResponse {
    pub nome: String,
    pub centro_treinamento: TrainingCenterName,
    pub categoria: CategoryName,
}

/// Request payload for creating a new athlete
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAthleteRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name must be between 1 and 50 characters"
    ))]
    #[schema(example = "Joao")]
    pub nome: String,

    #[validate(length(
        min = 1,
        max = 11,
        message = "CPF must be between 1 and 11 characters"
    ))]
    #[schema(example = "12345678900")]
    pub cpf: String,

    #[validate(range(min = 0, message = "Age must not be negative"))]
    #[schema(example = 25)]
    pub idade: i32,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 75.5)]
    pub peso: Decimal,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 1.70)]
    pub altura: Decimal,

    #[validate(custom(function = "validate_sexo"))]
    #[schema(example = "M")]
    pub sexo: String,

    #[validate(nested)]
    pub categoria: CategoryName,

    #[validate(nested)]
    pub centro_treinamento: TrainingCenterName,
}

/// Request payload for a partial athlete update.
///
/// Only fields present in the body are applied. Identity fields and
/// relations are not part of the payload, and `null` is rejected rather than
/// being read as "not supplied".
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAthleteRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, max = 50))]
    pub nome: Option<String>,

    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, max = 11))]
    pub cpf: Option<String>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0))]
    pub idade: Option<i32>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = Option<f64>)]
    pub peso: Option<Decimal>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = Option<f64>)]
    pub altura: Option<Decimal>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "validate_sexo"))]
    pub sexo: Option<String>,
}

/// Query parameters for the paginated athlete listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AthleteFilter {
    /// Exact match on the athlete name
    pub nome: Option<String>,
    /// Exact match on the CPF
    pub cpf: Option<String>,
    /// Maximum number of items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items to skip
    #[serde(default)]
    pub offset: u32,
}

impl Default for AthleteFilter {
    fn default() -> Self {
        let pagination = PaginationParams::default();
        Self {
            nome: None,
            cpf: None,
            limit: pagination.limit,
            offset: pagination.offset,
        }
    }
}

impl AthleteFilter {
    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Name filter, with empty strings treated as absent
    pub fn nome(&self) -> Option<&str> {
        self.nome.as_deref().filter(|s| !s.is_empty())
    }

    /// CPF filter, with empty strings treated as absent
    pub fn cpf(&self) -> Option<&str> {
        self.cpf.as_deref().filter(|s| !s.is_empty())
    }
}

/// A fully-resolved athlete ready to be inserted
#[derive(Debug, Clone)]
pub struct NewAthlete {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub nome: String,
    pub cpf: String,
    pub idade: i32,
    pub peso: Decimal,
    pub altura: Decimal,
    pub sexo: String,
    pub categoria_id: i32,
    pub centro_treinamento_id: i32,
}

impl NewAthlete {
    /// Assigns a fresh id and the current UTC time to a validated request.
    pub fn new(req: &CreateAthleteRequest, category: &Category, center: &TrainingCenter) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now().naive_utc(),
            nome: req.nome.clone(),
            cpf: req.cpf.clone(),
            idade: req.idade,
            peso: req.peso,
            altura: req.altura,
            sexo: req.sexo.clone(),
            categoria_id: category.pk_id,
            centro_treinamento_id: center.pk_id,
        }
    }
}

/// The mutable columns of an athlete after a patch has been applied
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteChanges {
    pub nome: String,
    pub cpf: String,
    pub idade: i32,
    pub peso: Decimal,
    pub altura: Decimal,
    pub sexo: String,
}

impl UpdateAthleteRequest {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.cpf.is_none()
            && self.idade.is_none()
            && self.peso.is_none()
            && self.altura.is_none()
            && self.sexo.is_none()
    }

    pub fn apply_to(&self, existing: &Athlete) -> AthleteChanges {
        AthleteChanges {
            nome: self.nome.clone().unwrap_or_else(|| existing.nome.clone()),
            cpf: self.cpf.clone().unwrap_or_else(|| existing.cpf.clone()),
            idade: self.idade.unwrap_or(existing.idade),
            peso: self.peso.unwrap_or(existing.peso),
            altura: self.altura.unwrap_or(existing.altura),
            sexo: self.sexo.clone().unwrap_or_else(|| existing.sexo.clone()),
        }
    }
}

// A field that is present must carry a value; absence is handled by `default`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// Validation helpers
fn validate_sexo(sexo: &str) -> Result<(), validator::ValidationError> {
    const VALID_SEXO: &[&str] = &["M", "F"];

    if VALID_SEXO.contains(&sexo) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_sexo"))
    }
}

fn validate_positive(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("must_be_positive"))
    }
}

impl From<Athlete> for AthleteResponse {
    fn from(athlete: Athlete) -> Self {
        Self {
            id: athlete.id,
            created_at: athlete.created_at,
            nome: athlete.nome,
            cpf: athlete.cpf,
            idade: athlete.idade,
            peso: athlete.peso,
            altura: athlete.altura,
            sexo: athlete.sexo,
            categoria: CategoryName {
                nome: athlete.categoria_nome,
            },
            centro_treinamento: TrainingCenterName {
                nome: athlete.centro_treinamento_nome,
            },
        }
    }
}

impl From<AthleteSummary> for FormattedAthleteResponse {
    fn from(summary: AthleteSummary) -> Self {
        Self {
            nome: summary.nome,
            centro_treinamento: TrainingCenterName {
                nome: summary.centro_treinamento_nome,
            },
            categoria: CategoryName {
                nome: summary.categoria_nome,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request() -> CreateAthleteRequest {
        serde_json::from_value(json!({
            "nome": "Ana",
            "cpf": "12345678900",
            "idade": 28,
            "peso": 61.5,
            "altura": 1.68,
            "sexo": "F",
            "categoria": { "nome": "Scale" },
            "centro_treinamento": { "nome": "CT King" }
        }))
        .unwrap()
    }

    fn existing_athlete() -> Athlete {
        Athlete {
            pk_id: 1,
            id: Uuid::new_v4(),
            nome: "Ana".to_string(),
            cpf: "12345678900".to_string(),
            idade: 28,
            peso: Decimal::new(615, 1),
            altura: Decimal::new(168, 2),
            sexo: "F".to_string(),
            created_at: Utc::now().naive_utc(),
            categoria_id: 3,
            centro_treinamento_id: 7,
            categoria_nome: "Scale".to_string(),
            centro_treinamento_nome: "CT King".to_string(),
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_invalid_sexo_rejected() {
        let mut req = create_request();
        req.sexo = "X".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sexo"));
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let mut req = create_request();
        req.peso = Decimal::ZERO;
        req.altura = Decimal::new(-170, 2);
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("peso"));
        assert!(fields.contains_key("altura"));
    }

    #[test]
    fn test_nested_reference_names_are_validated() {
        let mut req = create_request();
        req.categoria.nome = "Intermediario".to_string();
        req.centro_treinamento.nome = String::new();
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("categoria"));
        assert!(errors.errors().contains_key("centro_treinamento"));
    }

    #[test]
    fn test_new_athlete_links_resolved_references() {
        let category = Category {
            pk_id: 3,
            id: Uuid::new_v4(),
            nome: "Scale".to_string(),
        };
        let center = TrainingCenter {
            pk_id: 7,
            id: Uuid::new_v4(),
            nome: "CT King".to_string(),
            endereco: "Rua dos Marombas, 157".to_string(),
            proprietario: "Hércules".to_string(),
        };
        let req = create_request();

        let first = NewAthlete::new(&req, &category, &center);
        let second = NewAthlete::new(&req, &category, &center);

        assert_eq!(first.categoria_id, 3);
        assert_eq!(first.centro_treinamento_id, 7);
        assert_eq!(first.cpf, "12345678900");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let existing = existing_athlete();
        let patch: UpdateAthleteRequest = serde_json::from_value(json!({ "peso": 63.2 })).unwrap();

        let changes = patch.apply_to(&existing);

        assert_eq!(changes.peso, Decimal::new(632, 1));
        assert_eq!(changes.nome, existing.nome);
        assert_eq!(changes.cpf, existing.cpf);
        assert_eq!(changes.idade, existing.idade);
        assert_eq!(changes.altura, existing.altura);
        assert_eq!(changes.sexo, existing.sexo);
    }

    #[test]
    fn test_update_absent_fields_are_none() {
        let patch: UpdateAthleteRequest = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_explicit_null() {
        let result = serde_json::from_value::<UpdateAthleteRequest>(json!({ "nome": null }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_rejects_identity_fields() {
        let id = serde_json::from_value::<UpdateAthleteRequest>(json!({ "id": Uuid::new_v4() }));
        let created_at = serde_json::from_value::<UpdateAthleteRequest>(
            json!({ "created_at": "2024-01-01T00:00:00" }),
        );
        let categoria =
            serde_json::from_value::<UpdateAthleteRequest>(json!({ "categoria": { "nome": "RX" } }));
        assert!(id.is_err());
        assert!(created_at.is_err());
        assert!(categoria.is_err());
    }

    #[test]
    fn test_filter_treats_empty_strings_as_absent() {
        let filter = AthleteFilter {
            nome: Some(String::new()),
            cpf: Some("12345678900".to_string()),
            ..AthleteFilter::default()
        };
        assert_eq!(filter.nome(), None);
        assert_eq!(filter.cpf(), Some("12345678900"));
        assert_eq!(filter.limit, 2);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn test_response_nests_relation_names() {
        let response = AthleteResponse::from(existing_athlete());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["categoria"]["nome"], "Scale");
        assert_eq!(json["centro_treinamento"]["nome"], "CT King");
        assert!(json.get("pk_id").is_none());
    }
}

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        athlete::{
            AthleteFilter, AthleteResponse, CreateAthleteRequest, FormattedAthleteResponse,
            UpdateAthleteRequest,
        },
        common::PaginatedResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{AppJson, AppPath, AppQuery};

use super::services;

#[utoipa::path(
    get,
    path = "/api/atletas",
    params(AthleteFilter),
    responses(
        (status = 200, description = "Page of athletes matching the filters", body = PaginatedResponse<AthleteResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "atletas"
)]
pub async fn list_athletes(
    State(db): State<Database>,
    AppQuery(filter): AppQuery<AthleteFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let (athletes, total_items) = services::list_athletes(db.pool(), &filter).await?;

    let items: Vec<AthleteResponse> = athletes.into_iter().map(AthleteResponse::from).collect();
    let response = PaginatedResponse::new(items, filter.pagination(), total_items);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/atletas/formatted",
    responses(
        (status = 200, description = "Every athlete with its category and training center names", body = Vec<FormattedAthleteResponse>)
    ),
    tag = "atletas"
)]
pub async fn list_formatted_athletes(State(db): State<Database>) -> Result<Response, WebError> {
    let summaries = services::list_formatted_athletes(db.pool()).await?;

    let response: Vec<FormattedAthleteResponse> = summaries
        .into_iter()
        .map(FormattedAthleteResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/atletas/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    responses(
        (status = 200, description = "Athlete found", body = AthleteResponse),
        (status = 404, description = "Athlete not found")
    ),
    tag = "atletas"
)]
pub async fn get_athlete(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    let athlete = services::get_athlete(db.pool(), id).await?;

    Ok(Json(AthleteResponse::from(athlete)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/atletas",
    request_body = CreateAthleteRequest,
    responses(
        (status = 201, description = "Athlete created successfully", body = AthleteResponse),
        (status = 400, description = "Validation error or unknown category / training center"),
        (status = 409, description = "An athlete with this CPF already exists")
    ),
    tag = "atletas"
)]
pub async fn create_athlete(
    State(db): State<Database>,
    AppJson(req): AppJson<CreateAthleteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let athlete = services::create_athlete(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(AthleteResponse::from(athlete))).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/atletas/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    request_body = UpdateAthleteRequest,
    responses(
        (status = 200, description = "Athlete updated successfully", body = AthleteResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Athlete not found"),
        (status = 409, description = "An athlete with this CPF already exists"),
        (status = 422, description = "Null value or unknown field in the body")
    ),
    tag = "atletas"
)]
pub async fn update_athlete(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update_req): AppJson<UpdateAthleteRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_athlete(db.pool(), id, &update_req).await?;

    Ok(Json(AthleteResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/atletas/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    responses(
        (status = 204, description = "Athlete deleted successfully"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "atletas"
)]
pub async fn delete_athlete(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_athlete(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

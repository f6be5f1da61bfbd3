use axum::Router;
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::ApiDoc;
use crate::features::{athletes, categories, training_centers};

fn api_routes() -> Router<Database> {
    Router::new()
        .nest("/atletas", athletes::routes::routes())
        .nest("/categorias", categories::routes::routes())
        .nest("/centros_treinamento", training_centers::routes::routes())
}

pub fn router(db: Database) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .with_state(db)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/documents", document_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/uploads", upload_routes())
        .merge(taxonomy_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::auth::me))
}

fn document_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::document::list_documents,
            handlers::document::create_document
        ))
        .routes(routes!(handlers::document::delete_document))
}

fn taxonomy_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::taxonomy::list_categories))
        .routes(routes!(handlers::taxonomy::list_tags))
}

fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::dashboard::summary))
        .routes(routes!(handlers::dashboard::expiring_soon))
        .routes(routes!(handlers::dashboard::recent))
}

fn upload_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::upload::issue_upload_token))
        .routes(routes!(handlers::upload::complete_upload))
}

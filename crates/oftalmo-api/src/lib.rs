//! oftalmo-api
//!
//! HTTP surface of the ophthalmology records system: REST resources for
//! patients, collaborators, clinics and evaluations, plus RPC-style
//! procedures for the multi-step evaluation form.

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod repo;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/patients",
            get(routes::patients::list_patients).post(routes::patients::create_patient),
        )
        .route(
            "/patients/{id}",
            get(routes::patients::get_patient)
                .put(routes::patients::update_patient)
                .delete(routes::patients::delete_patient),
        )
        .route(
            "/patients/{id}/evaluations",
            get(routes::evaluations::list_patient_evaluations)
                .post(routes::evaluations::create_evaluation),
        )
        .route(
            "/collaborators",
            get(routes::collaborators::list_collaborators)
                .post(routes::collaborators::create_collaborator),
        )
        .route(
            "/collaborators/{id}",
            get(routes::collaborators::get_collaborator)
                .put(routes::collaborators::update_collaborator)
                .delete(routes::collaborators::delete_collaborator),
        )
        .route(
            "/clinics",
            get(routes::clinics::list_clinics).post(routes::clinics::create_clinic),
        )
        .route(
            "/clinics/{id}",
            get(routes::clinics::get_clinic)
                .put(routes::clinics::update_clinic)
                .delete(routes::clinics::delete_clinic),
        )
        .route(
            "/clinics/{id}/collaborators",
            get(routes::clinics::list_clinic_collaborators),
        )
        .route(
            "/evaluations/{id}",
            get(routes::evaluations::get_evaluation).delete(routes::evaluations::delete_evaluation),
        )
        .route(
            "/evaluations/{id}/summary",
            get(routes::summary::summary_text),
        )
        .route(
            "/evaluations/{id}/summary.docx",
            get(routes::summary::summary_docx),
        )
        .route(
            "/evaluations/{id}/best-refraction",
            get(routes::evaluations::best_refraction),
        )
        .route("/breadcrumbs", get(routes::breadcrumbs::breadcrumbs))
        .route(
            "/session/collaborator",
            get(routes::session::get_selected)
                .put(routes::session::select)
                .delete(routes::session::clear),
        )
        // RPC-style procedures
        .route("/rpc/evaluation.update", post(routes::rpc::evaluation::update))
        .route("/rpc/evaluation.finalize", post(routes::rpc::evaluation::finalize))
        .route("/rpc/evaluation.reopen", post(routes::rpc::evaluation::reopen))
        .route(
            "/rpc/evaluation.addRefraction",
            post(routes::rpc::evaluation::add_refraction),
        )
        .route(
            "/rpc/evaluation.removeRefraction",
            post(routes::rpc::evaluation::remove_refraction),
        )
        .route(
            "/rpc/evaluation.addSurgery",
            post(routes::rpc::evaluation::add_surgery),
        )
        .route(
            "/rpc/evaluation.removeSurgery",
            post(routes::rpc::evaluation::remove_surgery),
        )
        .route(
            "/rpc/clinic.addCollaborator",
            post(routes::rpc::clinic::add_collaborator),
        )
        .route(
            "/rpc/clinic.removeCollaborator",
            post(routes::rpc::clinic::remove_collaborator),
        )
        .route(
            "/rpc/attachment.requestUpload",
            post(routes::rpc::attachment::request_upload),
        )
        .route(
            "/rpc/attachment.confirmUpload",
            post(routes::rpc::attachment::confirm_upload),
        )
        .route(
            "/rpc/attachment.requestDownload",
            post(routes::rpc::attachment::request_download),
        )
        .route("/rpc/attachment.remove", post(routes::rpc::attachment::remove))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}

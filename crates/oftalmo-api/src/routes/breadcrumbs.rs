use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use oftalmo_core::breadcrumbs::{self, Breadcrumb};

#[derive(Deserialize)]
pub struct BreadcrumbQuery {
    #[serde(default)]
    path: String,
}

pub async fn breadcrumbs(Query(query): Query<BreadcrumbQuery>) -> Json<Vec<Breadcrumb>> {
    Json(breadcrumbs::breadcrumbs(&query.path))
}

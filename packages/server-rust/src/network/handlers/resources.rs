//! Generic CRUD handlers, instantiated once per resource type when the
//! router is built.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dmx_gatekeeper_core::Resource;
use uuid::Uuid;

use super::ApiError;
use crate::service::ResourceService;

type Service<R> = State<Arc<dyn ResourceService<R>>>;

/// `POST /api/{collection}` -- 201 with the created resource.
pub async fn post_resource<R: Resource>(
    State(service): Service<R>,
    Json(resource): Json<R>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let created = service.add(resource).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/{collection}`
pub async fn get_all_resources<R: Resource>(
    State(service): Service<R>,
) -> Result<Json<Vec<R>>, ApiError> {
    Ok(Json(service.retrieve_all().await?))
}

/// `GET /api/{collection}/{id}`
pub async fn get_resource<R: Resource>(
    State(service): Service<R>,
    Path(id): Path<Uuid>,
) -> Result<Json<R>, ApiError> {
    Ok(Json(service.retrieve_by_id(id).await?))
}

/// `PUT /api/{collection}` -- the identifier travels in the body.
pub async fn put_resource<R: Resource>(
    State(service): Service<R>,
    Json(resource): Json<R>,
) -> Result<Json<R>, ApiError> {
    Ok(Json(service.modify(resource).await?))
}

/// `DELETE /api/{collection}/{id}` -- 200 with the removed resource.
pub async fn delete_resource<R: Resource>(
    State(service): Service<R>,
    Path(id): Path<Uuid>,
) -> Result<Json<R>, ApiError> {
    Ok(Json(service.remove(id).await?))
}

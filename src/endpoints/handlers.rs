use crate::endpoints::map::render_index;
use crate::endpoints::server::AppState;
use crate::errors::SearchError;
use crate::geometry::bounds::to_geojson_feature;
use crate::models::{GeoExtent, Viewport};
use crate::pipeline::{lock, search_shared};
use crate::traits::ViewportStore;
use crate::viewport::{RouteParams, ViewportSync};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type SharedSync = Mutex<ViewportSync<Box<dyn ViewportStore>>>;

fn sync_lock(sync: &SharedSync) -> MutexGuard<'_, ViewportSync<Box<dyn ViewportStore>>> {
    sync.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default, Deserialize)]
pub struct RouteChange {
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub zoom: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub zoom: f64,
    pub bounds: GeoExtent,
}

#[derive(Serialize)]
struct MoveEndResponse {
    route: Option<String>,
}

#[derive(Serialize)]
struct JumpResponse {
    jump: Option<Viewport>,
}

/// Send a bare visit to the stored viewport, or the default one.
pub async fn root_handler(State(state): State<Arc<AppState>>) -> Redirect {
    let (viewport, _) = sync_lock(&state.sync).landing();
    Redirect::temporary(&viewport.route_path())
}

pub async fn webmap_handler(
    Path((latitude, longitude, zoom)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let init = sync_lock(&state.sync).load(Some(RouteParams {
        latitude: &latitude,
        longitude: &longitude,
        zoom: &zoom,
    }));
    tracing::debug!("Map loaded at {} from {:?}", init.route_path, init.source);
    Html(render_index(
        &init.viewport,
        &init.route_path,
        &state.profile.label,
        state.min_zoom,
    ))
}

/// The display settled at `viewport`; answers with the route to show.
pub async fn move_end_handler(
    State(state): State<Arc<AppState>>,
    Json(viewport): Json<Viewport>,
) -> Response {
    let route = sync_lock(&state.sync).on_move_end(viewport);
    Json(MoveEndResponse { route }).into_response()
}

/// The route changed under the display; answers with where to jump, if anywhere.
pub async fn route_change_handler(
    State(state): State<Arc<AppState>>,
    Json(change): Json<RouteChange>,
) -> Response {
    let jump = sync_lock(&state.sync).on_route_change(RouteParams {
        latitude: &change.latitude,
        longitude: &change.longitude,
        zoom: &change.zoom,
    });
    Json(JumpResponse { jump }).into_response()
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Response {
    let outcome = search_shared(
        state.session.clone(),
        state.source.clone(),
        request.zoom,
        request.bounds,
    )
    .await;

    match outcome {
        Ok(area) => {
            tracing::info!(
                "{}: {:.2} ac of {:.2} ac in {}",
                state.profile.label,
                area.feature_area,
                area.window_area,
                request.bounds
            );
            (StatusCode::OK, Json(lock(&state.session).snapshot())).into_response()
        }
        Err(e) => {
            let (status, code) = match &e {
                SearchError::InsufficientZoom { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "zoom"),
                SearchError::Busy => (StatusCode::CONFLICT, "busy"),
                SearchError::Superseded => (StatusCode::CONFLICT, "superseded"),
                SearchError::InvalidBounds => (StatusCode::BAD_REQUEST, "bounds"),
                SearchError::Fetch(_) => (StatusCode::BAD_GATEWAY, "load"),
            };
            if status == StatusCode::BAD_GATEWAY {
                tracing::warn!("{}", e);
            }
            (status, Json(json!({"error": code, "message": e.to_string()}))).into_response()
        }
    }
}

/// Current features as a GeoJSON download.
pub async fn export_handler(State(state): State<Arc<AppState>>) -> Response {
    let body = match lock(&state.session).export_json() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to serialize export: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.profile.export_file_name
    );
    (
        [
            (header::CONTENT_TYPE, "application/geo+json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Outline of the last attempted search.
pub async fn bounds_handler(State(state): State<Arc<AppState>>) -> Response {
    match lock(&state.session).saved_bounds() {
        Some(extent) => Json(to_geojson_feature(extent)).into_response(),
        None => (StatusCode::NOT_FOUND, "No search yet").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::FetchError;
    use crate::models::overpass::{Element, LatLon, OverpassResponse, WayElement};
    use crate::traits::FeatureSource;
    use crate::viewport::MemoryStore;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use serde_json::Value;

    struct FakeSource {
        fail: bool,
    }

    #[async_trait]
    impl FeatureSource for FakeSource {
        async fn fetch(&self, _query: &str) -> Result<OverpassResponse, FetchError> {
            if self.fail {
                return Err(FetchError::Status { status: 504 });
            }
            Ok(OverpassResponse {
                elements: vec![Element::Way(WayElement {
                    id: 1,
                    geometry: vec![
                        LatLon { lat: 32.96, lon: -96.82 },
                        LatLon { lat: 32.96, lon: -96.819 },
                    ],
                    ..Default::default()
                })],
                ..Default::default()
            })
        }
    }

    fn state(fail: bool) -> Arc<AppState> {
        Arc::new(AppState::new(
            &Config::default(),
            Box::new(MemoryStore::default()),
            Arc::new(FakeSource { fail }),
        ))
    }

    fn request(zoom: f64) -> SearchRequest {
        SearchRequest {
            zoom,
            bounds: GeoExtent::new(32.95, -96.83, 32.97, -96.81),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_default_viewport() {
        let response = root_handler(State(state(false))).await.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/32.9610115/-96.8251181/16.00"
        );
    }

    #[tokio::test]
    async fn map_page_then_move_end_updates_route() {
        let state = state(false);
        let Html(page) = webmap_handler(
            Path(("40".to_string(), "-75".to_string(), "14".to_string())),
            State(state.clone()),
        )
        .await;
        assert!(page.contains("\"route\":\"/40.0000000/-75.0000000/14.00\""));

        let response =
            move_end_handler(State(state.clone()), Json(Viewport::new(40.5, -75.0, 14.0))).await;
        assert_eq!(body_json(response).await["route"], "/40.5000000/-75.0000000/14.00");

        // the page's own write-back is not a jump
        let response = route_change_handler(
            State(state.clone()),
            Json(RouteChange {
                latitude: "40.5000000".to_string(),
                longitude: "-75.0000000".to_string(),
                zoom: "14.00".to_string(),
            }),
        )
        .await;
        assert_eq!(body_json(response).await["jump"], Value::Null);

        let response = route_change_handler(
            State(state.clone()),
            Json(RouteChange {
                latitude: "41".to_string(),
                longitude: "-75".to_string(),
                zoom: "14".to_string(),
            }),
        )
        .await;
        assert_eq!(body_json(response).await["jump"]["latitude"], 41.0);

        let redirect = root_handler(State(state)).await.into_response();
        assert_eq!(
            redirect.headers()[header::LOCATION],
            "/40.5000000/-75.0000000/14.00"
        );
    }

    #[tokio::test]
    async fn search_returns_features_and_areas() {
        let state = state(false);
        assert_eq!(
            bounds_handler(State(state.clone())).await.status(),
            StatusCode::NOT_FOUND
        );

        let response = search_handler(State(state.clone()), Json(request(16.0))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["loading"], false);
        assert_eq!(body["features"]["features"].as_array().unwrap().len(), 1);
        assert!(body["area"]["feature_area"].as_f64().unwrap() > 0.0);
        assert!(body["percentage"].as_f64().unwrap() < 100.0);

        let bounds = body_json(bounds_handler(State(state.clone())).await).await;
        assert_eq!(bounds["geometry"]["type"], "Polygon");

        let export = export_handler(State(state)).await;
        assert_eq!(
            export.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sidewalkData.json\""
        );
        assert_eq!(body_json(export).await["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn low_zoom_search_is_rejected() {
        let state = state(false);
        let response = search_handler(State(state.clone()), Json(request(12.5))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"], "zoom");
        assert!(!lock(&state.session).is_loading());
    }

    #[tokio::test]
    async fn upstream_failure_keeps_previous_features() {
        let state = state(true);
        let response = search_handler(State(state.clone()), Json(request(16.0))).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "load");

        {
            let session = lock(&state.session);
            assert!(!session.is_loading());
            assert!(session.snapshot().error);
            assert!(session.features().features.is_empty());
        }

        // the outline follows the attempted window even when loading failed
        let bounds = bounds_handler(State(state)).await;
        assert_eq!(bounds.status(), StatusCode::OK);
    }
}

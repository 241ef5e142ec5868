use crate::config::Config;
use crate::endpoints::handlers::{
    bounds_handler, export_handler, move_end_handler, root_handler, route_change_handler,
    search_handler, webmap_handler,
};
use crate::models::{FilterProfile, TagPredicate};
use crate::overpass::{OverpassClient, QueryBuilder};
use crate::pipeline::SearchSession;
use crate::traits::{FeatureSource, ViewportStore};
use crate::utils::status::print_profile_summary;
use crate::viewport::{CsvStore, MemoryStore, ViewportSync};
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub sync: Mutex<ViewportSync<Box<dyn ViewportStore>>>,
    pub session: Arc<Mutex<SearchSession>>,
    pub source: Arc<dyn FeatureSource>,
    pub profile: FilterProfile,
    pub min_zoom: f64,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Box<dyn ViewportStore>,
        source: Arc<dyn FeatureSource>,
    ) -> Self {
        let profile = FilterProfile::from_kind(config.profile);
        let builder = QueryBuilder::new(profile.clone()).with_timeout(config.query_timeout_secs);
        let session = SearchSession::new(builder, config.exclusions.clone(), config.min_query_zoom);
        AppState {
            sync: Mutex::new(ViewportSync::new(store, config.default_viewport)),
            session: Arc::new(Mutex::new(session)),
            source,
            profile,
            min_zoom: config.min_query_zoom,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/{latitude}/{longitude}/{zoom}", get(webmap_handler))
        .route("/api/viewport", post(move_end_handler))
        .route("/api/route", post(route_change_handler))
        .route("/api/search", post(search_handler))
        .route("/api/export", get(export_handler))
        .route("/api/bounds", get(bounds_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct MapServer {
    config: Config,
    state: AppState,
}

impl MapServer {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store: Box<dyn ViewportStore> = match &config.storage {
            Some(path) => Box::new(CsvStore::open(path)),
            None => Box::new(MemoryStore::default()),
        };
        let client = OverpassClient::new(
            config.overpass_url.clone(),
            Duration::from_secs(config.query_timeout_secs as u64 + 5),
        )?;
        let state = AppState::new(&config, store, Arc::new(client));
        Ok(Self { config, state })
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let exclusions: &[TagPredicate] = &self.config.exclusions;
        print_profile_summary(&self.state.profile, exclusions);

        let app = router(Arc::new(self.state));
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let storage = match &self.config.storage {
            Some(path) => path.display().to_string(),
            None => "memory only".to_string(),
        };
        println!(
            r#"
    🚀 OpenSidewalkMap serving on {}

    🗺️ Open the map at the last viewport
       → http://{}/

    🌍 Upstream Overpass API
       → {}

    💾 Viewport storage
       → {}
            "#,
            addr, addr, self.config.overpass_url, storage
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}

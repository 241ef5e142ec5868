//! Search pipeline: viewport + bounds → query → fetch → GeoJSON → areas.
//!
//! All state sits in a [`SearchSession`]. Only the upstream fetch suspends;
//! `begin` and `complete` are synchronous so the session can live behind a
//! plain mutex that is never held across the network call.

use crate::errors::{FetchError, SearchError};
use crate::geometry::AreaAnalyzer;
use crate::models::overpass::OverpassResponse;
use crate::models::{AreaResult, FilterProfile, GeoExtent, TagPredicate};
use crate::overpass::mapper::empty_collection;
use crate::overpass::{QueryBuilder, to_feature_collection};
use crate::traits::FeatureSource;
use geojson::FeatureCollection;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Permission to run one upstream fetch.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    id: u64,
    extent: GeoExtent,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn extent(&self) -> &GeoExtent {
        &self.extent
    }
}

/// What the presentation layer reads after a search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSnapshot {
    pub loading: bool,
    pub error: bool,
    pub bounds: Option<GeoExtent>,
    pub area: Option<AreaResult>,
    pub percentage: Option<f64>,
    pub features: FeatureCollection,
}

pub struct SearchSession {
    builder: QueryBuilder,
    analyzer: AreaAnalyzer,
    predicates: Vec<TagPredicate>,
    min_zoom: f64,
    loading: bool,
    error: bool,
    issued: u64,
    in_flight: Option<u64>,
    features: FeatureCollection,
    saved_bounds: Option<GeoExtent>,
    area: Option<AreaResult>,
}

impl SearchSession {
    pub fn new(builder: QueryBuilder, predicates: Vec<TagPredicate>, min_zoom: f64) -> Self {
        let analyzer = AreaAnalyzer::new(builder.profile().area_model);
        SearchSession {
            builder,
            analyzer,
            predicates,
            min_zoom,
            loading: false,
            error: false,
            issued: 0,
            in_flight: None,
            features: empty_collection(),
            saved_bounds: None,
            area: None,
        }
    }

    pub fn profile(&self) -> &FilterProfile {
        self.builder.profile()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    pub fn saved_bounds(&self) -> Option<&GeoExtent> {
        self.saved_bounds.as_ref()
    }

    /// Start a search of `extent` seen at `zoom`.
    ///
    /// Nothing changes when the zoom is too low, the bounds are not a finite
    /// `south < north`, `west < east` rectangle, or another search is loading.
    pub fn begin(&mut self, zoom: f64, extent: GeoExtent) -> Result<SearchTicket, SearchError> {
        if zoom.is_nan() || zoom < self.min_zoom {
            return Err(SearchError::InsufficientZoom {
                zoom,
                min: self.min_zoom,
            });
        }
        if !extent.is_finite() || extent.south >= extent.north || extent.west >= extent.east {
            return Err(SearchError::InvalidBounds);
        }
        if self.loading {
            return Err(SearchError::Busy);
        }

        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.loading = true;
        self.saved_bounds = Some(extent);

        Ok(SearchTicket {
            id: self.issued,
            extent,
            query: self.builder.build(&extent, &self.predicates),
        })
    }

    /// Apply the outcome of the fetch started by `ticket`.
    ///
    /// A failed fetch keeps the previous features and sets the error flag.
    /// A ticket that is no longer in flight is discarded.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        result: Result<OverpassResponse, FetchError>,
    ) -> Result<AreaResult, SearchError> {
        if self.in_flight != Some(ticket.id) {
            tracing::warn!("Discarding result of superseded search #{}", ticket.id);
            return Err(SearchError::Superseded);
        }
        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(response) => {
                let features = to_feature_collection(response);
                let area = self.analyzer.analyze(&features, &ticket.extent);
                tracing::info!(
                    "Search #{} found {} features: {:.1} ac of {:.1} ac",
                    ticket.id,
                    features.features.len(),
                    area.feature_area,
                    area.window_area
                );
                self.features = features;
                self.area = Some(area);
                self.error = false;
                Ok(area)
            }
            Err(e) => {
                tracing::warn!("Search #{} failed: {}", ticket.id, e);
                self.error = true;
                Err(SearchError::Fetch(e))
            }
        }
    }

    /// Release the loading state of a fetch that never produced an outcome.
    pub fn abort(&mut self, ticket_id: u64, reason: String) -> SearchError {
        if self.in_flight == Some(ticket_id) {
            self.in_flight = None;
            self.loading = false;
            self.error = true;
        }
        SearchError::Fetch(FetchError::Aborted(reason))
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            loading: self.loading,
            error: self.error,
            bounds: self.saved_bounds,
            area: self.area,
            percentage: self.area.and_then(|a| a.percentage()),
            features: self.features.clone(),
        }
    }

    /// Current features as a downloadable JSON document.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.features)
    }
}

/// Run a whole search on a session the caller owns exclusively.
pub async fn search<F: FeatureSource + ?Sized>(
    session: &mut SearchSession,
    source: &F,
    zoom: f64,
    extent: GeoExtent,
) -> Result<AreaResult, SearchError> {
    let ticket = session.begin(zoom, extent)?;
    let result = source.fetch(ticket.query()).await;
    session.complete(ticket, result)
}

/// Run a search on a shared session.
///
/// The fetch runs in its own task so the session leaves the loading state
/// even if the caller is dropped mid-request.
pub async fn search_shared(
    session: Arc<Mutex<SearchSession>>,
    source: Arc<dyn FeatureSource>,
    zoom: f64,
    extent: GeoExtent,
) -> Result<AreaResult, SearchError> {
    let ticket = lock(&session).begin(zoom, extent)?;
    let ticket_id = ticket.id;

    let task_session = session.clone();
    let task = tokio::spawn(async move {
        let result = source.fetch(ticket.query()).await;
        lock(&task_session).complete(ticket, result)
    });

    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Search #{} task failed: {}", ticket_id, e);
            Err(lock(&session).abort(ticket_id, e.to_string()))
        }
    }
}

pub fn lock(session: &Mutex<SearchSession>) -> std::sync::MutexGuard<'_, SearchSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write `features` to `path` as GeoJSON.
pub fn write_export(path: &Path, features: &FeatureCollection) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(features)?;
    std::fs::write(path, json)?;
    Ok(())
}

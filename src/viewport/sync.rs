//! Reconciles the three places a viewport lives: the route path, persistent
//! storage and the live map display.
//!
//! Writers per transition:
//! - load: route → live (or storage/default → live, route replaced)
//! - move-end: live → route (replace) and live → storage
//! - route change: route → live, only when the rounded values differ
//!
//! The rounded comparison on route change is what stops a move-end
//! write-back from commanding another jump.

use crate::models::Viewport;
use crate::traits::ViewportStore;
use crate::viewport::route::{parse_viewport, validate};
use crate::viewport::storage::{load_viewport, save_viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Initializing,
    Synchronized,
}

/// Where the initial live viewport came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSource {
    Route,
    Storage,
    Default,
}

/// Route segments as received, before validation.
#[derive(Debug, Clone, Copy)]
pub struct RouteParams<'a> {
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub zoom: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initialized {
    pub viewport: Viewport,
    pub source: InitialSource,
    /// Canonical route to replace the current one with.
    pub route_path: String,
}

pub struct ViewportSync<S: ViewportStore> {
    state: SyncState,
    default: Viewport,
    store: S,
    live: Option<Viewport>,
    route: Option<String>,
}

impl<S: ViewportStore> ViewportSync<S> {
    pub fn new(store: S, default: Viewport) -> Self {
        ViewportSync {
            state: SyncState::Uninitialized,
            default,
            store,
            live: None,
            route: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Current live viewport, or the default before the first load.
    pub fn live(&self) -> Viewport {
        self.live.unwrap_or(self.default)
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Viewport to open when no route was given: storage, else default.
    pub fn landing(&self) -> (Viewport, InitialSource) {
        match load_viewport(&self.store) {
            Some(viewport) => (viewport, InitialSource::Storage),
            None => (self.default, InitialSource::Default),
        }
    }

    /// A display (re)loaded with `params` as its route.
    ///
    /// Valid params become the live viewport. Missing params use the stored
    /// viewport or the default; invalid params use the default.
    pub fn load(&mut self, params: Option<RouteParams<'_>>) -> Initialized {
        self.state = SyncState::Initializing;

        let (viewport, source) = match params {
            Some(p) => match parse_viewport(p.latitude, p.longitude, p.zoom) {
                Ok(viewport) => (viewport, InitialSource::Route),
                Err(e) => {
                    tracing::debug!("Route rejected, using default viewport: {}", e);
                    (self.default, InitialSource::Default)
                }
            },
            None => self.landing(),
        };

        let route_path = viewport.route_path();
        self.live = Some(viewport);
        self.route = Some(route_path.clone());
        self.state = SyncState::Synchronized;

        Initialized {
            viewport,
            source,
            route_path,
        }
    }

    /// The user finished moving the display.
    ///
    /// Returns the route to replace the current history entry with, or
    /// `None` when the machine is not loaded or the values are unusable.
    pub fn on_move_end(&mut self, live: Viewport) -> Option<String> {
        if self.state != SyncState::Synchronized {
            tracing::debug!("Move-end before load ignored");
            return None;
        }
        let live = match validate(live) {
            Ok(viewport) => viewport,
            Err(e) => {
                tracing::debug!("Move-end ignored: {}", e);
                return None;
            }
        };

        let route_path = live.route_path();
        self.live = Some(live);
        self.route = Some(route_path.clone());
        save_viewport(&mut self.store, &live);
        Some(route_path)
    }

    /// The route changed from outside the display.
    ///
    /// Returns the viewport the display must jump to, or `None` when the
    /// route is invalid or matches the live viewport at route precision.
    pub fn on_route_change(&mut self, params: RouteParams<'_>) -> Option<Viewport> {
        if self.state != SyncState::Synchronized {
            return None;
        }
        let target = match parse_viewport(params.latitude, params.longitude, params.zoom) {
            Ok(viewport) => viewport,
            Err(e) => {
                tracing::debug!("Route change ignored: {}", e);
                return None;
            }
        };

        self.route = Some(target.route_path());
        if !target.differs_from(&self.live()) {
            return None;
        }
        self.live = Some(target);
        Some(target)
    }
}

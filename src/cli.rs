use crate::config::Config;
use crate::geometry::projection::viewport_extent;
use crate::models::{FilterProfile, GeoExtent, ProfileKind, TagPredicate, Viewport};
use crate::overpass::{OverpassClient, QueryBuilder};
use crate::pipeline::{SearchSession, search, write_export};
use crate::utils::status::print_area_summary;
use crate::viewport::CsvStore;
use crate::viewport::route::parse_viewport;
use crate::viewport::storage::load_viewport;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(flatten)]
    pub options: Options,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct Options {
    /// Port for the web map
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Overpass API interpreter URL
    #[arg(long, global = true)]
    pub overpass_url: Option<String>,

    /// Features to search for
    #[arg(long, value_enum, global = true)]
    pub profile: Option<ProfileKind>,

    /// Drop features tagged key=value (repeatable)
    #[arg(long = "exclude", value_name = "KEY=VALUE", global = true)]
    pub exclusions: Vec<TagPredicate>,

    /// File the last viewport is stored in
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    /// Lowest zoom a search is allowed at
    #[arg(long, global = true)]
    pub min_zoom: Option<f64>,

    /// Upstream query timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the web map (default)
    Serve,
    /// Run one search from the terminal
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search window as south,west,north,east
    #[arg(long, allow_hyphen_values = true)]
    pub bounds: Option<GeoExtent>,

    /// Map center and zoom as latitude,longitude,zoom (defaults to the stored viewport)
    #[arg(long, value_parser = parse_viewport_arg, allow_hyphen_values = true)]
    pub viewport: Option<Viewport>,

    /// Window size in pixels used to derive bounds from the viewport
    #[arg(long, value_parser = parse_window_arg, default_value = "1280x800")]
    pub window: (u32, u32),

    /// Write the features as GeoJSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl From<&Options> for Config {
    fn from(options: &Options) -> Self {
        let mut config = Config::default();
        if let Some(port) = options.port {
            config.port = port;
        }
        if let Some(url) = &options.overpass_url {
            config.overpass_url = url.clone();
        }
        if let Some(profile) = options.profile {
            config.profile = profile;
        }
        config.exclusions = options.exclusions.clone();
        if let Some(storage) = &options.storage {
            config.storage = Some(storage.clone());
        }
        if let Some(min_zoom) = options.min_zoom {
            config.min_query_zoom = min_zoom;
        }
        if let Some(timeout) = options.timeout {
            config.query_timeout_secs = timeout;
        }
        config
    }
}

fn parse_viewport_arg(s: &str) -> Result<Viewport, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let &[latitude, longitude, zoom] = parts.as_slice() else {
        return Err(format!("Expected latitude,longitude,zoom, got '{}'", s));
    };
    parse_viewport(latitude, longitude, zoom).map_err(|e| e.to_string())
}

fn parse_window_arg(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("Invalid width: {}", e))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("Invalid height: {}", e))?;
    if w == 0 || h == 0 {
        return Err("Window size must be non-zero".to_string());
    }
    Ok((w, h))
}

pub async fn run_search(config: Config, args: SearchArgs) -> anyhow::Result<()> {
    let viewport = args
        .viewport
        .or_else(|| {
            config
                .storage
                .as_ref()
                .and_then(|path| load_viewport(&CsvStore::open(path)))
        })
        .unwrap_or(config.default_viewport);
    let extent = match args.bounds {
        Some(bounds) => bounds,
        None => viewport_extent(&viewport, args.window.0, args.window.1, config.tile_size),
    };

    let profile = FilterProfile::from_kind(config.profile);
    let builder = QueryBuilder::new(profile.clone()).with_timeout(config.query_timeout_secs);
    let mut session = SearchSession::new(builder, config.exclusions.clone(), config.min_query_zoom);
    let client = OverpassClient::new(
        config.overpass_url.clone(),
        Duration::from_secs(config.query_timeout_secs as u64 + 5),
    )?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(format!("Querying {} for {} in {}", client.url(), profile.label, extent));
    pb.enable_steady_tick(Duration::from_millis(120));

    let outcome = search(&mut session, &client, viewport.zoom, extent).await;
    pb.finish_and_clear();

    let area = outcome?;
    print_area_summary(&profile, &extent, session.features().features.len(), &area);

    if let Some(path) = args.output {
        write_export(&path, session.features())?;
        println!("💾 Wrote {}", path.display());
    }
    Ok(())
}

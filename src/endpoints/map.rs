use crate::models::Viewport;
use crate::models::profile::PATH_HIGHWAYS;
use crate::models::viewport::MAX_ZOOM;

/// Render the map page opened at `viewport`.
pub(super) fn render_index(viewport: &Viewport, route_path: &str, label: &str, min_zoom: f64) -> String {
    let initial = serde_json::json!({
        "latitude": viewport.latitude,
        "longitude": viewport.longitude,
        "zoom": viewport.zoom,
        "route": route_path,
        "label": label,
        "minZoom": min_zoom,
        "maxZoom": MAX_ZOOM,
        "paths": PATH_HIGHWAYS,
    });
    INDEX_HTML
        .replace("__TITLE__", label)
        .replace("__INITIAL__", &initial.to_string())
}

pub(super) const INDEX_HTML: &str = r#"<!DOCTYPE html>
  <html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
    <title>OpenSidewalkMap</title>
    <link
      rel="stylesheet"
      href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
      integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY="
      crossorigin=""
    />
    <style>
      html, body { height: 100%; margin: 0; padding: 0; font-family: sans-serif; }
      #controls {
        position: absolute;
        top: 12px;
        left: 50px;
        z-index: 1000;
        background: white;
        padding: 10px;
        border-radius: 4px;
        box-shadow: 0 1px 4px rgba(0,0,0,0.3);
        width: 240px;
        line-height: 22px;
      }
      #map { height: 100%; width: 100%; }
      #search { width: 100%; padding: 6px; cursor: pointer; }
      #details, #error, #zoomWarning { display: none; margin-top: 8px; font-size: 14px; }
      #error, #zoomWarning { color: #c00; }
    </style>
  </head>
  <body>
    <div id="controls">
      <b>OpenSidewalkMap</b>
      <br />
      <button id="search">Show __TITLE__</button>
      <div id="details">
        <b>__TITLE__:</b> <span id="featureArea"></span> ac<br />
        <b>Area in Window:</b> <span id="windowArea"></span> ac<br />
        <b>% of window:</b> <span id="percentage"></span><br />
        <a href="/api/export">Download GeoJSON</a>
      </div>
      <div id="zoomWarning">Zoom in further to search.</div>
      <div id="error">Error loading data. Please try again.</div>
    </div>

    <div id="map"></div>

    <script
      src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
      integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo="
      crossorigin=""
    ></script>

    <script>
      const initial = __INITIAL__;
      const searchButton = document.getElementById('search');
      const details = document.getElementById('details');
      const errorBox = document.getElementById('error');
      const zoomWarning = document.getElementById('zoomWarning');

      history.replaceState(null, '', initial.route);

      const map = L.map('map', { zoomSnap: 0.25, maxZoom: initial.maxZoom })
        .setView([initial.latitude, initial.longitude], initial.zoom);

      L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
        maxZoom: initial.maxZoom,
        attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors'
      }).addTo(map);

      // Paths are drawn solid, roads carrying sidewalks dashed
      const featureLayer = L.geoJSON(null, {
        style: feature => {
          const isPath = initial.paths.includes((feature.properties || {}).highway);
          return isPath
            ? { color: 'red', opacity: 0.8, weight: 3 }
            : { color: 'red', opacity: 0.8, weight: 2, dashArray: '4 4' };
        }
      }).addTo(map);
      const boundsLayer = L.geoJSON(null, {
        style: { color: 'blue', weight: 2, fill: false }
      }).addTo(map);

      async function post(url, body) {
        const res = await fetch(url, {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(body),
        });
        return { status: res.status, body: await res.json() };
      }

      map.on('moveend', async () => {
        const c = map.getCenter().wrap();
        const { body } = await post('/api/viewport', {
          latitude: c.lat,
          longitude: c.lng,
          zoom: map.getZoom(),
        });
        if (body.route && body.route !== location.pathname) {
          history.replaceState(null, '', body.route);
        }
      });

      window.addEventListener('popstate', async () => {
        const [latitude, longitude, zoom] = location.pathname.split('/').filter(Boolean);
        const { body } = await post('/api/route', { latitude, longitude, zoom });
        if (body.jump) {
          map.setView([body.jump.latitude, body.jump.longitude], body.jump.zoom);
        }
      });

      searchButton.addEventListener('click', async () => {
        zoomWarning.style.display = 'none';
        if (map.getZoom() < initial.minZoom) {
          zoomWarning.style.display = 'block';
          return;
        }

        const b = map.getBounds();
        searchButton.disabled = true;
        searchButton.textContent = 'loading...';
        try {
          const { status, body } = await post('/api/search', {
            zoom: map.getZoom(),
            bounds: { south: b.getSouth(), west: b.getWest(), north: b.getNorth(), east: b.getEast() },
          });
          if (status === 422) {
            zoomWarning.style.display = 'block';
          } else if (status !== 200) {
            errorBox.style.display = 'block';
          } else {
            errorBox.style.display = 'none';
            featureLayer.clearLayers().addData(body.features);
            boundsLayer.clearLayers().addData(await (await fetch('/api/bounds')).json());
            if (body.area) {
              details.style.display = 'block';
              document.getElementById('featureArea').textContent = body.area.feature_area.toFixed(1);
              document.getElementById('windowArea').textContent = body.area.window_area.toFixed(1);
              document.getElementById('percentage').textContent =
                body.percentage === null ? 'n/a' : body.percentage.toFixed(1) + ' %';
            }
          }
        } catch (e) {
          console.error(e);
          errorBox.style.display = 'block';
        } finally {
          searchButton.disabled = false;
          searchButton.textContent = 'Show ' + initial.label;
        }
      });
    </script>
  </body>
  </html>
"#;

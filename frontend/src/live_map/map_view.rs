// frontend/src/live_map/map_view.rs

use dioxus::prelude::*;
use dioxus_signals::{ReadableExt, Signal};
use livemap_shared::{Region, ScreenPhase};

use super::js_eval;

/// The Leaflet surface. Initialised once with the fixed camera region; every
/// later delivery only moves the marker.
#[component]
pub fn MapView(phase: Signal<ScreenPhase>, region: Signal<Option<Region>>) -> Element {
    // One-time JS setup. The init loop retries until Leaflet, the glue and
    // the target node are all live.
    use_effect(move || {
        if let Some(region) = *region.read() {
            js_setup_init_retry(&region);
        }
    });

    // Marker follows every delivery; the camera never moves.
    use_effect(move || {
        if let Some(reading) = phase.read().reading() {
            js_update_marker(reading.latitude, reading.longitude);
        }
    });

    rsx! {
        div {
            id: "live-map",
            style: "width:100%; height:100%; background:#000; overflow:hidden; touch-action:manipulation; overscroll-behavior:contain;",
        }
    }
}

/* ================================================================================================
 * JS bridge helpers (no wasm-bindgen imports)
 * ============================================================================================== */

fn js_setup_init_retry(region: &Region) {
    let (south, west) = region.south_west();
    let (north, east) = region.north_east();

    let script = format!(
        r#"
    (function() {{
      if (window.__livemap_init_retry_installed) return;
      window.__livemap_init_retry_installed = true;

      let tries = 0;
      const maxTries = 200; // ~10s at 50ms

      const t = setInterval(() => {{
        tries++;
        try {{
          if (window.__livemap_loaded === true &&
              typeof window.initLiveMap === "function" &&
              window.initLiveMap({south}, {west}, {north}, {east})) {{
            clearInterval(t);
            return;
          }}
        }} catch (e) {{}}

        if (tries >= maxTries) {{
          clearInterval(t);
          try {{ console.warn("[livemap] initLiveMap retry timed out"); }} catch (e) {{}}
        }}
      }}, 50);
    }})();
    "#
    );

    js_eval(&script);
}

fn js_update_marker(lat: f64, lon: f64) {
    // Always cache the most recent values so the JS side can apply them once
    // the map comes up.
    js_eval(&format!(
        r#"
        (function() {{
          try {{
            window.__livemap_pending_lat = {lat};
            window.__livemap_pending_lon = {lon};
            if (typeof window.updateLiveMarker === "function") {{
              window.updateLiveMarker({lat}, {lon});
            }}
          }} catch (e) {{
            console.warn("updateLiveMarker threw:", e);
          }}
        }})();
        "#,
        lat = lat,
        lon = lon,
    ));
}

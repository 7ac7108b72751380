// frontend/src/live_map/mod.rs

mod gps;
mod gps_android;
mod gps_apple;
mod gps_web;
pub mod map_view;

use dioxus::prelude::*;
use dioxus_signals::{ReadableExt, Signal, WritableExt};
use livemap_shared::{
    overlay_lines, PermissionStatus, PositionReading, Region, ScreenPhase, WatchConfig,
};

use map_view::MapView;

macro_rules! log {
    ($($t:tt)*) => {{
        let s = format!($($t)*);
        crate::live_map::log(&s);
    }}
}

// ---------- Web vs Native logging ----------
pub(crate) fn log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    println!("{msg}");
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn js_eval(js: &str) {
    let _ = js_sys::eval(js);
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn js_eval(js: &str) {
    dioxus::document::eval(js);
}

/// The whole app is this one screen: gate on permission, take one fix,
/// then follow the device until unmount.
#[component]
pub fn LiveMapScreen() -> Element {
    let phase = use_signal(|| ScreenPhase::Loading);
    // Camera region, fixed at the first fix. Later deliveries move the
    // marker only.
    let region = use_signal(|| None::<Region>);
    let watch = use_signal(|| None::<gps::WatchHandle>);
    let permission_watch = use_signal(|| None::<gps::PermissionWatchHandle>);

    // Gate -> fix -> watch, strictly linear, once per mount.
    use_future(move || async move {
        run_pipeline(phase, region, watch, permission_watch).await;
    });

    // The subscriptions die with the screen.
    use_drop(move || {
        let mut watch = watch;
        let mut permission_watch = permission_watch;
        if let Ok(mut slot) = watch.try_write() {
            slot.take();
        }
        if let Ok(mut slot) = permission_watch.try_write() {
            slot.take();
        }
    });

    let showing = phase.read().is_showing();

    rsx! {
        if showing {
            div {
                style: "position:relative; height:100vh; width:100%; overflow:hidden; background:#020617;",
                MapView { phase: phase, region: region }
                InfoPanel { phase: phase }
            }
        } else {
            StatusView { phase: phase }
        }
    }
}

async fn run_pipeline(
    mut phase: Signal<ScreenPhase>,
    mut region: Signal<Option<Region>>,
    mut watch: Signal<Option<gps::WatchHandle>>,
    mut permission_watch: Signal<Option<gps::PermissionWatchHandle>>,
) {
    // Permission gate.
    let status = gps::request_permission().await;
    let next = (*phase.peek()).clone().on_permission(status);
    let denied = next == ScreenPhase::PermissionDenied;
    phase.set(next);
    if denied {
        log!("location permission denied; staying on the gate");
        return;
    }

    // Keep following the platform's permission state where it is
    // observable; a mid-session revocation tears the watch down.
    let on_change = Box::new(move |status| apply_permission_change(phase, watch, status));
    if let Some(handle) = gps::watch_permission(on_change).await {
        permission_watch.set(Some(handle));
    }

    // One-shot fix, default options, no timeout.
    let fix = gps::current_position().await;
    if let Err(e) = &fix {
        log!("initial position fix failed: {e}");
    }
    let next = (*phase.peek()).clone().on_fix(fix);
    if let ScreenPhase::Showing(reading) = &next {
        region.set(Some(Region::centered(reading)));
    }
    let proceed = next.is_showing();
    phase.set(next);
    if !proceed {
        return;
    }

    // Continuous watch for the rest of the screen's life.
    let on_reading = Box::new(move |reading: PositionReading| {
        // Late deliveries after unmount must not panic.
        if let Ok(mut w) = phase.try_write() {
            let next = (*w).clone().on_watch_update(reading);
            *w = next;
        }
    });
    match gps::watch_position(WatchConfig::default(), on_reading) {
        Ok(handle) => watch.set(Some(handle)),
        Err(e) => log!("position watch unavailable: {e}"),
    }
}

fn apply_permission_change(
    mut phase: Signal<ScreenPhase>,
    mut watch: Signal<Option<gps::WatchHandle>>,
    status: PermissionStatus,
) {
    let Ok(mut w) = phase.try_write() else { return };
    let next = (*w).clone().on_permission(status);
    let denied = next == ScreenPhase::PermissionDenied;
    *w = next;
    drop(w);

    if denied
        && let Ok(mut slot) = watch.try_write()
    {
        slot.take();
    }
}

/// Status copy for the degenerate (no-map) modes. `None` means the mode has
/// its own view (the denial dialog) or the map is up.
fn degenerate_status(phase: &ScreenPhase) -> Option<(String, Option<String>)> {
    match phase {
        ScreenPhase::Loading => Some(("Fetching location...".to_string(), None)),
        ScreenPhase::AcquisitionFailed(reason) => {
            Some(("Fetching location...".to_string(), Some(reason.clone())))
        }
        ScreenPhase::PermissionDenied | ScreenPhase::Showing(_) => None,
    }
}

#[component]
fn StatusView(phase: Signal<ScreenPhase>) -> Element {
    let denied = *phase.read() == ScreenPhase::PermissionDenied;
    let (status, detail) = match degenerate_status(&phase.read()) {
        Some((status, detail)) => (status, detail),
        None => (String::new(), None),
    };
    let detail_text = detail.unwrap_or_default();

    rsx! {
        div {
            style: "height:100vh; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:12px; background:#020617; font-family:system-ui, -apple-system, BlinkMacSystemFont;",
            if denied {
                div {
                    style: "width:min(420px, 92vw); padding:24px; border:1px solid #334155; border-radius:16px; background:#0b1220; box-shadow:0 12px 30px rgba(0,0,0,0.5); text-align:center;",
                    h2 { style: "margin:0 0 8px 0; font-size:18px; color:#ef4444;", "Permission Denied" }
                    p { style: "margin:0; color:#94a3b8;", "Allow location access to view the map." }
                }
            } else {
                div {
                    style: "width:42px; height:42px; border-radius:50%; border:4px solid #1e293b; border-top-color:#60a5fa; animation:livemap-spin 0.9s linear infinite;",
                }
                p { style: "margin:0; color:#e5e7eb;", "{status}" }
                if !detail_text.is_empty() {
                    p { style: "margin:0; color:#64748b; font-size:0.85rem;", "{detail_text}" }
                }
            }
        }
    }
}

#[component]
fn InfoPanel(phase: Signal<ScreenPhase>) -> Element {
    let lines = match phase.read().reading() {
        Some(reading) => overlay_lines(reading),
        None => return rsx!(div {}),
    };

    rsx! {
        div {
            style: "position:absolute; bottom:0; left:0; right:0; display:flex; flex-direction:column; align-items:center; gap:2px; padding:10px; \
                    background:#020617ee; border-top:1px solid #4b5563; border-top-left-radius:10px; border-top-right-radius:10px; \
                    box-shadow:0 -10px 25px rgba(0,0,0,0.45); font-family:system-ui, -apple-system, BlinkMacSystemFont;",
            for line in lines {
                span { style: "font-size:1rem; font-weight:700;", "{line}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemap_shared::LocationError;

    #[test]
    fn loading_shows_the_fetching_status() {
        let (status, detail) = degenerate_status(&ScreenPhase::Loading).unwrap();
        assert_eq!(status, "Fetching location...");
        assert!(detail.is_none());
    }

    #[test]
    fn acquisition_failure_keeps_the_spinner_with_a_reason() {
        let phase = ScreenPhase::Loading.on_fix(Err(LocationError::unavailable("gps off")));
        let (status, detail) = degenerate_status(&phase).unwrap();
        assert_eq!(status, "Fetching location...");
        assert_eq!(detail.as_deref(), Some("position unavailable: gps off"));
    }

    #[test]
    fn denial_and_showing_have_no_spinner_status() {
        // Denial gets the dialog, Showing gets the map.
        assert!(degenerate_status(&ScreenPhase::PermissionDenied).is_none());
        let showing = ScreenPhase::Showing(PositionReading::new(37.0, -122.0, 5.0));
        assert!(degenerate_status(&showing).is_none());
    }

    #[test]
    fn overlay_matches_the_first_fix() {
        let lines = overlay_lines(&PositionReading::new(37.0, -122.0, 5.0));
        assert_eq!(lines[0], "Latitude: 37");
        assert_eq!(lines[1], "Longitude: -122");
        assert_eq!(lines[2], "Accuracy: 5 meters");
    }
}

// frontend/src/live_map/gps_web.rs
#![cfg(target_arch = "wasm32")]

//! Browser/webview backend on `navigator.geolocation`, plus the Permissions
//! API for the gate and its change observable.

use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::oneshot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use livemap_shared::{
    Accuracy, LocationError, LocationResult, PermissionStatus, PositionReading, WatchConfig,
};

use super::gps::{DeliverySink, PermissionSink};

fn geolocation() -> LocationResult<web_sys::Geolocation> {
    web_sys::window()
        .ok_or(LocationError::Unsupported)?
        .navigator()
        .geolocation()
        .map_err(|_| LocationError::Unsupported)
}

fn reading_from(pos: &web_sys::Position) -> PositionReading {
    let coords = pos.coords();
    PositionReading::new(coords.latitude(), coords.longitude(), coords.accuracy())
}

fn error_from(err: &web_sys::PositionError) -> LocationError {
    match err.code() {
        web_sys::PositionError::PERMISSION_DENIED => LocationError::PermissionDenied,
        web_sys::PositionError::TIMEOUT => LocationError::Timeout,
        _ => LocationError::unavailable(err.message()),
    }
}

fn permission_from(state: web_sys::PermissionState) -> PermissionStatus {
    match state {
        web_sys::PermissionState::Granted => PermissionStatus::Granted,
        web_sys::PermissionState::Denied => PermissionStatus::Denied,
        _ => PermissionStatus::Prompt,
    }
}

fn geolocation_query(permissions: &web_sys::Permissions) -> Option<js_sys::Promise> {
    let desc = js_sys::Object::new();
    js_sys::Reflect::set(
        &desc,
        &JsValue::from_str("name"),
        &JsValue::from_str("geolocation"),
    )
    .ok()?;
    permissions.query(&desc).ok()
}

/// Query the Permissions API. Safari has no `navigator.permissions`; treat
/// that as a prompt and let the first geolocation call ask.
pub async fn request_permission() -> PermissionStatus {
    let Some(window) = web_sys::window() else {
        return PermissionStatus::Prompt;
    };
    let Ok(permissions) = window.navigator().permissions() else {
        return PermissionStatus::Prompt;
    };
    let Some(query) = geolocation_query(&permissions) else {
        return PermissionStatus::Prompt;
    };

    match JsFuture::from(query).await {
        Ok(status) => {
            let status: web_sys::PermissionStatus = status.unchecked_into();
            permission_from(status.state())
        }
        Err(_) => PermissionStatus::Prompt,
    }
}

pub async fn current_position() -> LocationResult<PositionReading> {
    let geo = geolocation()?;

    let (tx, rx) = oneshot::channel::<LocationResult<PositionReading>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::<dyn FnMut(web_sys::Position)>::new(move |pos: web_sys::Position| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(reading_from(&pos)));
            }
        })
    };
    let on_failure = {
        let tx = tx.clone();
        Closure::<dyn FnMut(web_sys::PositionError)>::new(move |err: web_sys::PositionError| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(error_from(&err)));
            }
        })
    };

    // Default options: no timeout bounds the request.
    geo.get_current_position_with_error_callback(
        on_success.as_ref().unchecked_ref(),
        Some(on_failure.as_ref().unchecked_ref()),
    )
    .map_err(|_| LocationError::Unsupported)?;

    // The closures must outlive the provider's answer.
    let result = rx
        .await
        .unwrap_or(Err(LocationError::unavailable("position request dropped")));
    drop(on_success);
    drop(on_failure);
    result
}

pub struct Watch {
    watch_id: Option<i32>,
    _on_pos: Closure<dyn FnMut(web_sys::Position)>,
    _on_err: Closure<dyn FnMut(web_sys::PositionError)>,
}

impl Watch {
    pub fn cancel(&mut self) {
        if let Some(id) = self.watch_id.take()
            && let Ok(geo) = geolocation()
        {
            geo.clear_watch(id);
        }
    }
}

/// Browsers expose no interval/distance thresholds; map onto what they do
/// have and let the provider throttle.
fn watch_options(config: &WatchConfig) -> web_sys::PositionOptions {
    let options = web_sys::PositionOptions::new();
    options.set_enable_high_accuracy(matches!(config.accuracy, Accuracy::High));
    options.set_maximum_age(config.min_interval_ms);
    options
}

pub fn watch_position(config: WatchConfig, mut sink: DeliverySink) -> LocationResult<Watch> {
    let geo = geolocation()?;

    let on_pos = Closure::<dyn FnMut(web_sys::Position)>::new(move |pos: web_sys::Position| {
        sink(reading_from(&pos));
    });
    // Watch errors are logged and otherwise ignored; the provider either
    // delivers or stays silent.
    let on_err = Closure::<dyn FnMut(web_sys::PositionError)>::new(|err: web_sys::PositionError| {
        web_sys::console::warn_1(&format!("geolocation watch error: {}", error_from(&err)).into());
    });

    let watch_id = geo
        .watch_position_with_error_callback_and_options(
            on_pos.as_ref().unchecked_ref(),
            Some(on_err.as_ref().unchecked_ref()),
            &watch_options(&config),
        )
        .map_err(|_| LocationError::Unsupported)?;

    Ok(Watch {
        watch_id: Some(watch_id),
        _on_pos: on_pos,
        _on_err: on_err,
    })
}

pub struct PermissionWatch {
    status: web_sys::PermissionStatus,
    _on_change: Closure<dyn FnMut()>,
}

impl PermissionWatch {
    pub fn cancel(&mut self) {
        self.status.set_onchange(None);
    }
}

pub async fn watch_permission(mut sink: PermissionSink) -> Option<PermissionWatch> {
    let window = web_sys::window()?;
    let permissions = window.navigator().permissions().ok()?;
    let query = geolocation_query(&permissions)?;
    let status: web_sys::PermissionStatus = JsFuture::from(query).await.ok()?.unchecked_into();

    let watched = status.clone();
    let on_change = Closure::<dyn FnMut()>::new(move || {
        sink(permission_from(watched.state()));
    });
    status.set_onchange(Some(on_change.as_ref().unchecked_ref()));

    Some(PermissionWatch {
        status,
        _on_change: on_change,
    })
}

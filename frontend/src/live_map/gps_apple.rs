// frontend/src/live_map/gps_apple.rs
#![cfg(any(target_os = "macos", target_os = "ios"))]

//! Apple backend: CoreLocation glue compiled into the app bundle. The shim
//! dispatches every callback on the main queue, so thread-locals are safe
//! here.

use std::cell::RefCell;

use futures_channel::oneshot;

use livemap_shared::{
    Accuracy, LocationError, LocationResult, PermissionStatus, PositionReading, WatchConfig,
};

use super::gps::{DeliverySink, PermissionSink};

unsafe extern "C" {
    fn livemap_location_request_auth(cb: extern "C" fn(i32));
    fn livemap_location_current(cb: extern "C" fn(f64, f64, f64, i32));
    fn livemap_location_start(
        desired_accuracy_m: f64,
        min_distance_m: f64,
        cb: extern "C" fn(f64, f64, f64),
    );
    fn livemap_location_stop();
}

thread_local! {
    static PERMISSION_TX: RefCell<Option<oneshot::Sender<PermissionStatus>>> =
        const { RefCell::new(None) };
    static FIX_TX: RefCell<Option<oneshot::Sender<LocationResult<PositionReading>>>> =
        const { RefCell::new(None) };
    static WATCH_SINK: RefCell<Option<DeliverySink>> = const { RefCell::new(None) };
}

extern "C" fn on_auth(granted: i32) {
    let status = if granted != 0 {
        PermissionStatus::Granted
    } else {
        PermissionStatus::Denied
    };
    PERMISSION_TX.with(|slot| {
        if let Some(tx) = slot.borrow_mut().take() {
            let _ = tx.send(status);
        }
    });
}

extern "C" fn on_fix(lat: f64, lon: f64, accuracy: f64, code: i32) {
    let result = match code {
        0 => Ok(PositionReading::new(lat, lon, accuracy)),
        1 => Err(LocationError::PermissionDenied),
        _ => Err(LocationError::unavailable(format!(
            "CoreLocation error code {code}"
        ))),
    };
    FIX_TX.with(|slot| {
        if let Some(tx) = slot.borrow_mut().take() {
            let _ = tx.send(result);
        }
    });
}

extern "C" fn on_update(lat: f64, lon: f64, accuracy: f64) {
    WATCH_SINK.with(|slot| {
        if let Some(sink) = slot.borrow_mut().as_mut() {
            sink(PositionReading::new(lat, lon, accuracy));
        }
    });
}

/// CoreLocation expresses accuracy as a desired radius in meters;
/// kCLLocationAccuracyBest is negative.
fn desired_accuracy_m(accuracy: Accuracy) -> f64 {
    match accuracy {
        Accuracy::High => -1.0,
        Accuracy::Balanced => 100.0,
        Accuracy::Low => 1000.0,
    }
}

pub async fn request_permission() -> PermissionStatus {
    let (tx, rx) = oneshot::channel();
    PERMISSION_TX.with(|slot| *slot.borrow_mut() = Some(tx));
    unsafe { livemap_location_request_auth(on_auth) };
    rx.await.unwrap_or(PermissionStatus::Denied)
}

pub async fn current_position() -> LocationResult<PositionReading> {
    let (tx, rx) = oneshot::channel();
    FIX_TX.with(|slot| *slot.borrow_mut() = Some(tx));
    unsafe { livemap_location_current(on_fix) };
    rx.await
        .unwrap_or_else(|_| Err(LocationError::unavailable("position request dropped")))
}

pub struct Watch;

impl Watch {
    pub fn cancel(&mut self) {
        WATCH_SINK.with(|slot| slot.borrow_mut().take());
        unsafe { livemap_location_stop() };
    }
}

pub struct PermissionWatch;

impl PermissionWatch {
    pub fn cancel(&mut self) {}
}

// CoreLocation has no delivery interval; the distance filter is the only
// throttle it understands.
pub fn watch_position(config: WatchConfig, sink: DeliverySink) -> LocationResult<Watch> {
    WATCH_SINK.with(|slot| *slot.borrow_mut() = Some(sink));
    unsafe {
        livemap_location_start(
            desired_accuracy_m(config.accuracy),
            config.min_distance_m,
            on_update,
        )
    };
    Ok(Watch)
}

pub async fn watch_permission(_sink: PermissionSink) -> Option<PermissionWatch> {
    None
}

// frontend/src/live_map/gps_android.rs
#![cfg(target_os = "android")]

//! Android backend: a thin JNI bridge to the app's `LocationShim` class,
//! which owns the fused location client and dispatches every callback on
//! the main looper.

use std::cell::RefCell;

use futures_channel::oneshot;
use jni::objects::{JClass, JValue};
use jni::sys::{jboolean, jdouble, jint};
use jni::JNIEnv;

use livemap_shared::{
    Accuracy, LocationError, LocationResult, PermissionStatus, PositionReading, WatchConfig,
};

use super::gps::{DeliverySink, PermissionSink};

const SHIM_CLASS: &str = "com/livemap/app/LocationShim";

thread_local! {
    static PERMISSION_TX: RefCell<Option<oneshot::Sender<PermissionStatus>>> =
        const { RefCell::new(None) };
    static FIX_TX: RefCell<Option<oneshot::Sender<LocationResult<PositionReading>>>> =
        const { RefCell::new(None) };
    static WATCH_SINK: RefCell<Option<DeliverySink>> = const { RefCell::new(None) };
}

fn call_shim(name: &str, sig: &str, args: &[JValue]) -> LocationResult<()> {
    let ctx = ndk_context::android_context();
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| LocationError::unavailable(e.to_string()))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| LocationError::unavailable(e.to_string()))?;
    let class = env
        .find_class(SHIM_CLASS)
        .map_err(|e| LocationError::unavailable(e.to_string()))?;
    env.call_static_method(class, name, sig, args)
        .map_err(|e| LocationError::unavailable(e.to_string()))?;
    Ok(())
}

/// Fused-provider priority constants.
fn priority(accuracy: Accuracy) -> i32 {
    match accuracy {
        Accuracy::High => 100,     // PRIORITY_HIGH_ACCURACY
        Accuracy::Balanced => 102, // PRIORITY_BALANCED_POWER_ACCURACY
        Accuracy::Low => 104,      // PRIORITY_LOW_POWER
    }
}

pub async fn request_permission() -> PermissionStatus {
    let (tx, rx) = oneshot::channel();
    PERMISSION_TX.with(|slot| *slot.borrow_mut() = Some(tx));
    if call_shim("requestPermission", "()V", &[]).is_err() {
        return PermissionStatus::Denied;
    }
    rx.await.unwrap_or(PermissionStatus::Denied)
}

pub async fn current_position() -> LocationResult<PositionReading> {
    let (tx, rx) = oneshot::channel();
    FIX_TX.with(|slot| *slot.borrow_mut() = Some(tx));
    call_shim("currentPosition", "()V", &[])?;
    rx.await
        .unwrap_or_else(|_| Err(LocationError::unavailable("position request dropped")))
}

pub struct Watch;

impl Watch {
    pub fn cancel(&mut self) {
        WATCH_SINK.with(|slot| slot.borrow_mut().take());
        let _ = call_shim("stop", "()V", &[]);
    }
}

pub struct PermissionWatch;

impl PermissionWatch {
    pub fn cancel(&mut self) {}
}

pub fn watch_position(config: WatchConfig, sink: DeliverySink) -> LocationResult<Watch> {
    WATCH_SINK.with(|slot| *slot.borrow_mut() = Some(sink));
    call_shim(
        "start",
        "(IJF)V",
        &[
            JValue::Int(priority(config.accuracy)),
            JValue::Long(config.min_interval_ms as i64),
            JValue::Float(config.min_distance_m as f32),
        ],
    )?;
    Ok(Watch)
}

pub async fn watch_permission(_sink: PermissionSink) -> Option<PermissionWatch> {
    None
}

/// Called from `LocationShim` on the main looper for every watch delivery.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_livemap_app_LocationShim_nativeOnUpdate(
    _env: JNIEnv,
    _class: JClass,
    lat: jdouble,
    lon: jdouble,
    accuracy: jdouble,
) {
    WATCH_SINK.with(|slot| {
        if let Some(sink) = slot.borrow_mut().as_mut() {
            sink(PositionReading::new(lat, lon, accuracy));
        }
    });
}

/// Called from `LocationShim` once the permission request resolves.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_livemap_app_LocationShim_nativeOnPermission(
    _env: JNIEnv,
    _class: JClass,
    granted: jboolean,
) {
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

/// Called from `LocationShim` with the one-shot fix outcome.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_livemap_app_LocationShim_nativeOnFix(
    _env: JNIEnv,
    _class: JClass,
    lat: jdouble,
    lon: jdouble,
    accuracy: jdouble,
    code: jint,
) {
    let result = match code {
        0 => Ok(PositionReading::new(lat, lon, accuracy)),
        1 => Err(LocationError::PermissionDenied),
        _ => Err(LocationError::unavailable(format!(
            "provider error code {code}"
        ))),
    };
    FIX_TX.with(|slot| {
        if let Some(tx) = slot.borrow_mut().take() {
            let _ = tx.send(result);
        }
    });
}

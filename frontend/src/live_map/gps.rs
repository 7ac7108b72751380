// frontend/src/live_map/gps.rs
//
// The Location Provider capability, behind one narrow facade:
// - a permission-request operation,
// - a one-shot current-position operation,
// - a subscribe-to-updates operation yielding a cancel-on-drop handle,
// - an optional permission-change observation (web only).
//
// Platform backends live in sibling modules; everything else in the app
// talks only to this file.

use livemap_shared::{LocationResult, PermissionStatus, PositionReading, WatchConfig};

#[cfg(target_arch = "wasm32")]
use super::gps_web as imp;

#[cfg(any(target_os = "macos", target_os = "ios"))]
use super::gps_apple as imp;

#[cfg(target_os = "android")]
use super::gps_android as imp;

/// Sink invoked once per watch delivery, on the UI event loop.
pub type DeliverySink = Box<dyn FnMut(PositionReading) + 'static>;

/// Sink invoked when the platform reports a permission change.
pub type PermissionSink = Box<dyn FnMut(PermissionStatus) + 'static>;

/// Owning handle for the continuous watch. Dropping it cancels the platform
/// subscription, which ties the watch to the owning screen's lifetime.
pub struct WatchHandle {
    inner: imp::Watch,
}

impl WatchHandle {
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owning handle for the permission-change observation.
pub struct PermissionWatchHandle {
    inner: imp::PermissionWatch,
}

impl Drop for PermissionWatchHandle {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}

/// Ask the platform for the foreground-permission state. May pop an OS
/// dialog; `Prompt` means the platform will ask on the first provider call.
pub async fn request_permission() -> PermissionStatus {
    imp::request_permission().await
}

/// One-shot current position with the provider's default options. No
/// timeout is imposed on our side.
pub async fn current_position() -> LocationResult<PositionReading> {
    imp::current_position().await
}

/// Open the long-lived update subscription. Deliveries arrive on the UI
/// event loop until the returned handle is dropped.
pub fn watch_position(config: WatchConfig, sink: DeliverySink) -> LocationResult<WatchHandle> {
    imp::watch_position(config, sink).map(|inner| WatchHandle { inner })
}

/// Subscribe to permission changes where the platform has an observable for
/// them; `None` everywhere else.
pub async fn watch_permission(sink: PermissionSink) -> Option<PermissionWatchHandle> {
    imp::watch_permission(sink)
        .await
        .map(|inner| PermissionWatchHandle { inner })
}

// Desktop targets without a location backend: every call reports the
// provider as unavailable and the screen stays in its degenerate state.
#[cfg(not(any(
    target_arch = "wasm32",
    target_os = "macos",
    target_os = "ios",
    target_os = "android"
)))]
mod imp {
    use livemap_shared::{
        LocationError, LocationResult, PermissionStatus, PositionReading, WatchConfig,
    };

    use super::{DeliverySink, PermissionSink};

    pub struct Watch;

    impl Watch {
        pub fn cancel(&mut self) {}
    }

    pub struct PermissionWatch;

    impl PermissionWatch {
        pub fn cancel(&mut self) {}
    }

    pub async fn request_permission() -> PermissionStatus {
        PermissionStatus::Prompt
    }

    pub async fn current_position() -> LocationResult<PositionReading> {
        Err(LocationError::Unsupported)
    }

    pub fn watch_position(_config: WatchConfig, _sink: DeliverySink) -> LocationResult<Watch> {
        Err(LocationError::Unsupported)
    }

    pub async fn watch_permission(_sink: PermissionSink) -> Option<PermissionWatch> {
        None
    }
}

#[cfg(all(
    test,
    not(any(
        target_arch = "wasm32",
        target_os = "macos",
        target_os = "ios",
        target_os = "android"
    ))
))]
mod tests {
    use super::*;
    use livemap_shared::LocationError;

    #[tokio::test]
    async fn desktop_fallback_passes_the_gate_and_fails_acquisition() {
        assert_eq!(request_permission().await, PermissionStatus::Prompt);
        assert_eq!(current_position().await, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn desktop_fallback_has_no_watch() {
        let result = watch_position(WatchConfig::default(), Box::new(|_| {}));
        assert!(matches!(result, Err(LocationError::Unsupported)));
        assert!(watch_permission(Box::new(|_| {})).await.is_none());
    }
}

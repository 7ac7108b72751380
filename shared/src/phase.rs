use serde::{Deserialize, Serialize};

use crate::error::LocationError;
use crate::position::PositionReading;

/// Outcome of the permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    /// The platform will prompt on the first provider call; treat as
    /// passable — a real refusal comes back as a provider error.
    Prompt,
    Denied,
}

/// Everything the screen can observably be.
///
/// `PermissionDenied` and `AcquisitionFailed` are modeled explicitly rather
/// than collapsing into a loading flag, so every asynchronous host call has
/// an outcome the UI can reflect.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenPhase {
    /// Initial state; also where a failed gate or fix leaves the user
    /// visually (spinner stays up).
    Loading,
    /// Terminal for the session: exactly one dialog, no retry.
    PermissionDenied,
    /// The one-shot fix failed. Logged, no alert, no retry.
    AcquisitionFailed(String),
    /// A reading is on screen. Never reverts to `Loading` while mounted.
    Showing(PositionReading),
}

impl ScreenPhase {
    /// Apply a permission gate outcome (or a later observable change).
    /// Denial is terminal for the session: a re-grant observed afterwards
    /// does not resurrect the screen.
    pub fn on_permission(self, status: PermissionStatus) -> ScreenPhase {
        match status {
            PermissionStatus::Denied => ScreenPhase::PermissionDenied,
            PermissionStatus::Granted | PermissionStatus::Prompt => self,
        }
    }

    /// Apply the result of the one-shot fix.
    pub fn on_fix(self, fix: Result<PositionReading, LocationError>) -> ScreenPhase {
        if self == ScreenPhase::PermissionDenied {
            return ScreenPhase::PermissionDenied;
        }
        match fix {
            Ok(reading) => ScreenPhase::Showing(reading),
            // The browser surfaces a prompt refusal through the position
            // call, not the gate; it still gates.
            Err(LocationError::PermissionDenied) => ScreenPhase::PermissionDenied,
            Err(e) => ScreenPhase::AcquisitionFailed(e.to_string()),
        }
    }

    /// Apply a watch delivery: whole-value replacement, latest wins.
    pub fn on_watch_update(self, reading: PositionReading) -> ScreenPhase {
        match self {
            ScreenPhase::PermissionDenied => ScreenPhase::PermissionDenied,
            _ => ScreenPhase::Showing(reading),
        }
    }

    pub fn is_showing(&self) -> bool {
        matches!(self, ScreenPhase::Showing(_))
    }

    pub fn reading(&self) -> Option<&PositionReading> {
        match self {
            ScreenPhase::Showing(reading) => Some(reading),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(lat: f64, lon: f64, acc: f64) -> PositionReading {
        PositionReading::new(lat, lon, acc)
    }

    #[test]
    fn denial_is_terminal_and_never_shows() {
        let phase = ScreenPhase::Loading.on_permission(PermissionStatus::Denied);
        assert_eq!(phase, ScreenPhase::PermissionDenied);

        // Late deliveries and fixes are ignored once denied.
        let phase = phase.on_watch_update(reading(1.0, 2.0, 3.0));
        assert_eq!(phase, ScreenPhase::PermissionDenied);
        let phase = phase.on_fix(Ok(reading(1.0, 2.0, 3.0)));
        assert_eq!(phase, ScreenPhase::PermissionDenied);
    }

    #[test]
    fn grant_then_fix_enters_showing_once() {
        let phase = ScreenPhase::Loading
            .on_permission(PermissionStatus::Granted)
            .on_fix(Ok(reading(37.0, -122.0, 5.0)));
        assert_eq!(phase, ScreenPhase::Showing(reading(37.0, -122.0, 5.0)));
    }

    #[test]
    fn prompt_outcome_passes_the_gate() {
        let phase = ScreenPhase::Loading.on_permission(PermissionStatus::Prompt);
        assert_eq!(phase, ScreenPhase::Loading);
    }

    #[test]
    fn showing_never_reverts_to_loading() {
        let phase = ScreenPhase::Loading.on_fix(Ok(reading(37.0, -122.0, 5.0)));
        let phase = phase.on_permission(PermissionStatus::Granted);
        assert!(phase.is_showing());
        let phase = phase.on_watch_update(reading(37.0001, -122.0, 4.0));
        assert!(phase.is_showing());
    }

    #[test]
    fn watch_deliveries_are_latest_wins() {
        let deliveries = [
            reading(37.0, -122.0, 5.0),
            reading(37.0001, -122.0, 4.0),
            reading(37.0002, -122.0001, 6.0),
        ];

        let mut phase = ScreenPhase::Loading.on_fix(Ok(deliveries[0]));
        for d in &deliveries[1..] {
            phase = phase.on_watch_update(*d);
            // After each delivery the rendered value equals that delivery.
            assert_eq!(phase.reading(), Some(d));
        }
        assert_eq!(phase.reading(), Some(&deliveries[2]));
    }

    #[test]
    fn fix_failure_is_recorded_without_an_alert() {
        let phase =
            ScreenPhase::Loading.on_fix(Err(LocationError::unavailable("no satellites")));
        assert_eq!(
            phase,
            ScreenPhase::AcquisitionFailed("position unavailable: no satellites".into())
        );
        assert_ne!(phase, ScreenPhase::PermissionDenied);
    }

    #[test]
    fn prompt_refusal_during_fix_still_gates() {
        let phase = ScreenPhase::Loading.on_fix(Err(LocationError::PermissionDenied));
        assert_eq!(phase, ScreenPhase::PermissionDenied);
    }

    #[test]
    fn denial_survives_a_later_regrant() {
        let phase = ScreenPhase::PermissionDenied.on_permission(PermissionStatus::Granted);
        assert_eq!(phase, ScreenPhase::PermissionDenied);
    }

    #[test]
    fn observed_denial_tears_down_showing() {
        let phase = ScreenPhase::Showing(reading(37.0, -122.0, 5.0))
            .on_permission(PermissionStatus::Denied);
        assert_eq!(phase, ScreenPhase::PermissionDenied);
    }
}

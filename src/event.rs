//! All inputs the app core reacts to: shell lifecycle, user intents, and
//! capability responses.

use serde::{Deserialize, Serialize};

use crate::capabilities::{LocationError, StorageResult};
use crate::PlaceId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    Noop,

    // Lifecycle
    AppStarted,

    // Geolocation (one-shot, requested at startup)
    LocationReceived { latitude: f64, longitude: f64 },
    LocationFailed { error: LocationError },

    // Selection & removal intents
    PlaceSelected { id: PlaceId },
    RemovalRequested { id: PlaceId },
    RemovalConfirmed,
    RemovalCancelled,
    /// Implicit host dismissal of the confirmation dialog (e.g. escape key).
    /// Routed to the cancel path; a no-op when the dialog is already closed.
    RemovalDialogDismissed,

    // Confirmation timers (generation-scoped; stale firings are ignored)
    AutoConfirmElapsed { generation: u64 },
    CountdownTicked { generation: u64 },

    // Persistence pipeline responses (boxed to keep the enum small)
    PersistedIdsLoaded(Box<StorageResult>),
    PersistedIdsWritten(Box<StorageResult>),
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted => "app_started",
            Self::LocationReceived { .. } => "location_received",
            Self::LocationFailed { .. } => "location_failed",
            Self::PlaceSelected { .. } => "place_selected",
            Self::RemovalRequested { .. } => "removal_requested",
            Self::RemovalConfirmed => "removal_confirmed",
            Self::RemovalCancelled => "removal_cancelled",
            Self::RemovalDialogDismissed => "removal_dialog_dismissed",
            Self::AutoConfirmElapsed { .. } => "auto_confirm_elapsed",
            Self::CountdownTicked { .. } => "countdown_ticked",
            Self::PersistedIdsLoaded(_) => "persisted_ids_loaded",
            Self::PersistedIdsWritten(_) => "persisted_ids_written",
        }
    }

    #[must_use]
    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::PlaceSelected { .. }
                | Self::RemovalRequested { .. }
                | Self::RemovalConfirmed
                | Self::RemovalCancelled
                | Self::RemovalDialogDismissed
        )
    }
}

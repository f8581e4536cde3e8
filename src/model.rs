//! Application state and the view model derived from it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::capabilities::LocationError;
use crate::catalog::Catalog;
use crate::{
    format_distance, Place, PlaceId, SortedPlace, AVAILABLE_FALLBACK, AVAILABLE_TITLE,
    PICKED_FALLBACK, PICKED_TITLE, REMOVAL_TIMEOUT_MS,
};

/// Outcome of the single startup geolocation request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationState {
    #[default]
    Locating,
    Located(crate::ValidatedCoordinate),
    /// Terminal: no retry, the available list stays empty.
    Failed(LocationError),
}

/// Removal-confirmation dialog state machine: `Closed -> Open -> Closed`.
///
/// Each `Open` carries the generation it was opened under; timer firings
/// from a previous generation are stale and must not act.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RemovalDialog {
    #[default]
    Closed,
    Open {
        pending: PlaceId,
        remaining_ms: u64,
        generation: u64,
    },
}

impl RemovalDialog {
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PlaceId> {
        match self {
            Self::Open { pending, .. } => Some(pending),
            Self::Closed => None,
        }
    }

    #[must_use]
    pub fn matches_generation(&self, gen: u64) -> bool {
        matches!(self, Self::Open { generation, .. } if *generation == gen)
    }
}

pub struct Model {
    pub catalog: Catalog,
    pub location: LocationState,
    /// Computed once, after the first successful geolocation read.
    pub available_places: Vec<SortedPlace>,
    /// User selections, most recently added first; no duplicate ids.
    /// Starts empty every session regardless of persisted ids.
    pub picked_places: Vec<Place>,
    pub dialog: RemovalDialog,
    /// Monotonic counter bumped on every dialog open; scopes timer handles.
    pub dialog_generation: u64,
    /// Total auto-confirm grace period. A value of 0 confirms immediately.
    pub removal_timeout_ms: u64,
    /// Ids awaiting the persistence read-modify-write cycle.
    pub persist_queue: VecDeque<PlaceId>,
    /// At most one storage cycle runs at a time so no update is lost.
    pub persist_in_flight: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            catalog: Catalog::builtin(),
            location: LocationState::default(),
            available_places: Vec::new(),
            picked_places: Vec::new(),
            dialog: RemovalDialog::default(),
            dialog_generation: 0,
            removal_timeout_ms: REMOVAL_TIMEOUT_MS,
            persist_queue: VecDeque::new(),
            persist_in_flight: false,
        }
    }
}

impl Model {
    #[must_use]
    pub fn is_picked(&self, id: &PlaceId) -> bool {
        self.picked_places.iter().any(|p| &p.id == id)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlaceView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub distance_text: Option<String>,
}

impl PlaceView {
    fn from_place(place: &Place) -> Self {
        Self {
            id: place.id.as_str().to_string(),
            name: place.name.clone(),
            image: place.image.clone(),
            description: place.description.clone(),
            distance_text: None,
        }
    }

    fn from_sorted(sorted: &SortedPlace) -> Self {
        Self {
            distance_text: Some(format_distance(sorted.distance_m)),
            ..Self::from_place(&sorted.place)
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlaceListView {
    pub title: String,
    /// Shown instead of the list while `places` is empty.
    pub fallback_text: String,
    pub places: Vec<PlaceView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RemovalDialogView {
    pub open: bool,
    pub remaining_ms: u64,
    pub total_ms: u64,
    /// Fraction of the grace period left, in `[0, 1]`, for the progress bar.
    pub progress: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub picked: PlaceListView,
    pub available: PlaceListView,
    pub removal_dialog: RemovalDialogView,
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        let available_fallback = match &model.location {
            LocationState::Failed(error) => error.user_facing_message().to_string(),
            LocationState::Locating | LocationState::Located(_) => {
                AVAILABLE_FALLBACK.to_string()
            }
        };

        let (remaining_ms, open) = match &model.dialog {
            RemovalDialog::Open { remaining_ms, .. } => (*remaining_ms, true),
            RemovalDialog::Closed => (model.removal_timeout_ms, false),
        };
        let total_ms = model.removal_timeout_ms;
        #[allow(clippy::cast_precision_loss)]
        let progress = if total_ms == 0 {
            0.0
        } else {
            remaining_ms as f64 / total_ms as f64
        };

        Self {
            picked: PlaceListView {
                title: PICKED_TITLE.to_string(),
                fallback_text: PICKED_FALLBACK.to_string(),
                places: model.picked_places.iter().map(PlaceView::from_place).collect(),
            },
            available: PlaceListView {
                title: AVAILABLE_TITLE.to_string(),
                fallback_text: available_fallback,
                places: model
                    .available_places
                    .iter()
                    .map(PlaceView::from_sorted)
                    .collect(),
            },
            removal_dialog: RemovalDialogView {
                open,
                remaining_ms,
                total_ms,
                progress,
            },
        }
    }
}

//! The application controller: a reducer over [`Event`]s that owns place
//! selection, the removal-confirmation state machine, and the persistence
//! pipeline for selected ids.

use tracing::{debug, error, warn};

use crate::capabilities::{
    Capabilities, StorageOutput, StorageResult, TimerId, TimerOutput,
};
use crate::event::Event;
use crate::model::{LocationState, Model, RemovalDialog, ViewModel};
use crate::{
    sort_places_by_distance, PlaceId, ValidatedCoordinate, REMOVAL_TICK_MS, SELECTED_PLACES_KEY,
};

#[derive(Default)]
pub struct App;

impl App {
    /// Queues `id` for the durable selected-ids log and starts a
    /// read-modify-write cycle unless one is already in flight. Serializing
    /// cycles keeps a later selection from clobbering an earlier unwritten
    /// one.
    fn enqueue_persist(model: &mut Model, caps: &Capabilities, id: PlaceId) {
        model.persist_queue.push_back(id);
        if !model.persist_in_flight {
            Self::start_persist_cycle(model, caps);
        }
    }

    fn start_persist_cycle(model: &mut Model, caps: &Capabilities) {
        model.persist_in_flight = true;
        caps.storage.read(SELECTED_PLACES_KEY, |result| {
            Event::PersistedIdsLoaded(Box::new(result))
        });
    }

    fn handle_persisted_ids_loaded(model: &mut Model, caps: &Capabilities, result: StorageResult) {
        let mut stored: Vec<PlaceId> = match result {
            Ok(StorageOutput::Value(Some(bytes))) => match serde_json::from_slice(&bytes) {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(error = %e, "stored selection ids unparseable, starting over");
                    Vec::new()
                }
            },
            Ok(StorageOutput::Value(None)) => Vec::new(),
            Ok(StorageOutput::Written) => {
                warn!("unexpected storage output for read, skipping persistence");
                model.persist_queue.clear();
                model.persist_in_flight = false;
                return;
            }
            Err(e) => {
                // Non-fatal: selections stay functional in memory.
                warn!(error = %e, "reading stored selection ids failed, skipping persistence");
                model.persist_queue.clear();
                model.persist_in_flight = false;
                return;
            }
        };

        let mut changed = false;
        while let Some(id) = model.persist_queue.pop_front() {
            if !stored.contains(&id) {
                stored.insert(0, id);
                changed = true;
            }
        }

        if !changed {
            model.persist_in_flight = false;
            return;
        }

        match serde_json::to_vec(&stored) {
            Ok(bytes) => {
                caps.storage.write(SELECTED_PLACES_KEY, bytes, |result| {
                    Event::PersistedIdsWritten(Box::new(result))
                });
            }
            Err(e) => {
                warn!(error = %e, "encoding selection ids failed, skipping persistence");
                model.persist_in_flight = false;
            }
        }
    }

    fn handle_persisted_ids_written(model: &mut Model, caps: &Capabilities, result: StorageResult) {
        if let Err(e) = result {
            // Non-fatal per the error-handling policy: keep in-memory state.
            warn!(error = %e, "writing selection ids failed");
        }

        // Selections that arrived while the write was in flight start the
        // next cycle.
        if model.persist_queue.is_empty() {
            model.persist_in_flight = false;
        } else {
            Self::start_persist_cycle(model, caps);
        }
    }

    /// Arms both removal timers for the current dialog generation: the
    /// auto-confirm deadline and the first display tick.
    fn arm_removal_timers(model: &Model, caps: &Capabilities, generation: u64) {
        caps.timer.start(
            TimerId::auto_confirm(generation),
            model.removal_timeout_ms,
            move |output| match output {
                TimerOutput::Fired(_) => Event::AutoConfirmElapsed { generation },
                TimerOutput::Cancelled(_) => Event::Noop,
            },
        );
        Self::arm_tick_timer(caps, generation);
    }

    fn arm_tick_timer(caps: &Capabilities, generation: u64) {
        caps.timer.start(
            TimerId::countdown_tick(generation),
            REMOVAL_TICK_MS,
            move |output| match output {
                TimerOutput::Fired(_) => Event::CountdownTicked { generation },
                TimerOutput::Cancelled(_) => Event::Noop,
            },
        );
    }

    /// Exits the `Open` state: cancels the generation's timers and hides the
    /// overlay. Every transition out of `Open` funnels through here so no
    /// trigger can leave timers running.
    fn close_dialog(model: &mut Model, caps: &Capabilities) {
        if let RemovalDialog::Open { generation, .. } = model.dialog {
            caps.timer.cancel(TimerId::auto_confirm(generation));
            caps.timer.cancel(TimerId::countdown_tick(generation));
            caps.modal.close();
        }
        model.dialog = RemovalDialog::Closed;
    }

    /// Removes the pending place and closes the dialog. Shared by explicit
    /// confirmation and auto-confirm.
    fn confirm_removal(model: &mut Model, caps: &Capabilities) {
        if let Some(pending) = model.dialog.pending().cloned() {
            model.picked_places.retain(|p| p.id != pending);
            debug!(id = %pending, "removal confirmed");
        }
        Self::close_dialog(model, caps);
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), user = event.is_user_initiated(), "update");

        match event {
            Event::Noop => {}

            Event::AppStarted => {
                model.location = LocationState::Locating;
                caps.location.get_position(|result| match result {
                    Ok(pos) => Event::LocationReceived {
                        latitude: pos.latitude,
                        longitude: pos.longitude,
                    },
                    Err(error) => Event::LocationFailed { error },
                });
                caps.render.render();
            }

            Event::LocationReceived {
                latitude,
                longitude,
            } => {
                match ValidatedCoordinate::new(latitude, longitude) {
                    Ok(origin) => {
                        model.available_places =
                            sort_places_by_distance(model.catalog.places(), origin);
                        model.location = LocationState::Located(origin);
                    }
                    Err(e) => {
                        warn!(error = %e, latitude, longitude, "shell delivered invalid position");
                        model.location = LocationState::Failed(
                            crate::capabilities::LocationError::Unavailable {
                                reason: e.to_string(),
                            },
                        );
                    }
                }
                caps.render.render();
            }

            Event::LocationFailed { error } => {
                warn!(error = %error, "geolocation failed, available list stays empty");
                model.location = LocationState::Failed(error);
                caps.render.render();
            }

            Event::PlaceSelected { id } => {
                let Some(place) = model.catalog.get(&id).cloned() else {
                    debug_assert!(false, "selected place id {id} is not in the catalog");
                    error!(id = %id, "selected place id is not in the catalog, ignoring");
                    return;
                };

                if !model.is_picked(&id) {
                    model.picked_places.insert(0, place);
                }

                // The durable id log updates even for an already-picked
                // place, matching the in-memory/durable split of the data
                // model.
                Self::enqueue_persist(model, caps, id);
                caps.render.render();
            }

            Event::RemovalRequested { id } => {
                if model.dialog.is_open() {
                    debug!(id = %id, "removal requested while dialog already open, ignoring");
                    return;
                }
                if !model.is_picked(&id) {
                    debug!(id = %id, "removal requested for unpicked place, ignoring");
                    return;
                }

                // Misconfigured (zero) grace period: confirm immediately
                // rather than opening a dialog that would hang.
                if model.removal_timeout_ms == 0 {
                    model.picked_places.retain(|p| p.id != id);
                    caps.render.render();
                    return;
                }

                model.dialog_generation += 1;
                let generation = model.dialog_generation;
                model.dialog = RemovalDialog::Open {
                    pending: id,
                    remaining_ms: model.removal_timeout_ms,
                    generation,
                };
                caps.modal.open();
                Self::arm_removal_timers(model, caps, generation);
                caps.render.render();
            }

            Event::RemovalConfirmed => {
                if !model.dialog.is_open() {
                    return;
                }
                Self::confirm_removal(model, caps);
                caps.render.render();
            }

            Event::RemovalCancelled | Event::RemovalDialogDismissed => {
                // Implicit dismissal is deliberately routed to the cancel
                // path; a dismissal after the core already closed the dialog
                // is a no-op, which also absorbs shells echoing back a
                // core-initiated close.
                if !model.dialog.is_open() {
                    return;
                }
                Self::close_dialog(model, caps);
                caps.render.render();
            }

            Event::AutoConfirmElapsed { generation } => {
                if !model.dialog.matches_generation(generation) {
                    debug!(generation, "stale auto-confirm firing, ignoring");
                    return;
                }
                if let RemovalDialog::Open { remaining_ms, .. } = &mut model.dialog {
                    *remaining_ms = 0;
                }
                Self::confirm_removal(model, caps);
                caps.render.render();
            }

            Event::CountdownTicked { generation } => {
                if !model.dialog.matches_generation(generation) {
                    debug!(generation, "stale countdown tick, ignoring");
                    return;
                }
                if let RemovalDialog::Open { remaining_ms, .. } = &mut model.dialog {
                    *remaining_ms = remaining_ms.saturating_sub(REMOVAL_TICK_MS);
                    if *remaining_ms > 0 {
                        Self::arm_tick_timer(caps, generation);
                    }
                }
                caps.render.render();
            }

            Event::PersistedIdsLoaded(result) => {
                Self::handle_persisted_ids_loaded(model, caps, *result);
            }

            Event::PersistedIdsWritten(result) => {
                Self::handle_persisted_ids_written(model, caps, *result);
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from_model(model)
    }
}

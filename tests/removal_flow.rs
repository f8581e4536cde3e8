use crux_core::testing::AppTester;
use placepicker_core::capabilities::{ModalOperation, TimerOperation};
use placepicker_core::{App, Effect, Event, Model, PlaceId, RemovalDialog, REMOVAL_TIMEOUT_MS};

fn tester() -> AppTester<App, Effect> {
    AppTester::default()
}

fn select(app: &AppTester<App, Effect>, model: &mut Model, id: &str) {
    app.update(
        Event::PlaceSelected {
            id: PlaceId::new(id),
        },
        model,
    );
}

fn request_removal(app: &AppTester<App, Effect>, model: &mut Model, id: &str) -> Vec<Effect> {
    app.update(
        Event::RemovalRequested {
            id: PlaceId::new(id),
        },
        model,
    )
    .effects
}

fn timer_ops(effects: &[Effect]) -> Vec<TimerOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Timer(req) => Some(req.operation.clone()),
            _ => None,
        })
        .collect()
}

fn modal_ops(effects: &[Effect]) -> Vec<ModalOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Modal(req) => Some(req.operation),
            _ => None,
        })
        .collect()
}

fn picked_ids(model: &Model) -> Vec<&str> {
    model.picked_places.iter().map(|p| p.id.as_str()).collect()
}

fn open_generation(model: &Model) -> u64 {
    match &model.dialog {
        RemovalDialog::Open { generation, .. } => *generation,
        RemovalDialog::Closed => panic!("dialog is not open"),
    }
}

fn remaining_ms(model: &Model) -> u64 {
    match &model.dialog {
        RemovalDialog::Open { remaining_ms, .. } => *remaining_ms,
        RemovalDialog::Closed => panic!("dialog is not open"),
    }
}

#[test]
fn removal_request_opens_dialog_and_arms_timers() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");

    let effects = request_removal(&app, &mut model, "p1");

    assert!(model.dialog.is_open());
    assert_eq!(model.dialog.pending(), Some(&PlaceId::new("p1")));
    assert_eq!(remaining_ms(&model), REMOVAL_TIMEOUT_MS);

    assert_eq!(modal_ops(&effects), vec![ModalOperation::Open]);

    let starts: Vec<u64> = timer_ops(&effects)
        .into_iter()
        .filter_map(|op| match op {
            TimerOperation::Start { duration_ms, .. } => Some(duration_ms),
            TimerOperation::Cancel { .. } => None,
        })
        .collect();
    // Auto-confirm deadline plus the first display tick.
    assert!(starts.contains(&REMOVAL_TIMEOUT_MS));
    assert_eq!(starts.len(), 2);
    assert!(effects.iter().any(|e| matches!(e, Effect::Render(_))));
}

#[test]
fn removal_request_for_unpicked_place_is_ignored() {
    let app = tester();
    let mut model = Model::default();

    let effects = request_removal(&app, &mut model, "p1");

    assert!(!model.dialog.is_open());
    assert!(modal_ops(&effects).is_empty());
}

#[test]
fn explicit_confirm_removes_and_closes() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");

    let update = app.update(Event::RemovalConfirmed, &mut model);

    assert!(picked_ids(&model).is_empty());
    assert!(!model.dialog.is_open());
    assert!(modal_ops(&update.effects).contains(&ModalOperation::Close));
}

#[test]
fn cancel_closes_without_removing_and_blocks_late_auto_confirm() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");
    let generation = open_generation(&model);

    let update = app.update(Event::RemovalCancelled, &mut model);

    assert_eq!(picked_ids(&model), vec!["p1"]);
    assert!(!model.dialog.is_open());
    // Closing cancels both of the generation's timers.
    let cancels = timer_ops(&update.effects)
        .into_iter()
        .filter(|op| matches!(op, TimerOperation::Cancel { .. }))
        .count();
    assert_eq!(cancels, 2);

    // The auto-confirm deadline fires anyway (shell raced the cancel):
    // the stale generation must never remove anything.
    app.update(Event::AutoConfirmElapsed { generation }, &mut model);
    assert_eq!(picked_ids(&model), vec!["p1"]);
    assert!(!model.dialog.is_open());
}

#[test]
fn auto_confirm_removes_after_grace_period() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");
    let generation = open_generation(&model);

    app.update(Event::AutoConfirmElapsed { generation }, &mut model);

    assert!(picked_ids(&model).is_empty());
    assert!(!model.dialog.is_open());
}

#[test]
fn implicit_dismissal_routes_to_cancel() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");
    let generation = open_generation(&model);

    app.update(Event::RemovalDialogDismissed, &mut model);

    assert_eq!(picked_ids(&model), vec!["p1"]);
    assert!(!model.dialog.is_open());

    // A dismissal echo after the core closed the dialog is a no-op, as is
    // the stale deadline.
    app.update(Event::RemovalDialogDismissed, &mut model);
    app.update(Event::AutoConfirmElapsed { generation }, &mut model);
    assert_eq!(picked_ids(&model), vec!["p1"]);
}

#[test]
fn countdown_ticks_decrement_within_bounds_and_stop_at_zero() {
    let app = tester();
    let mut model = Model {
        removal_timeout_ms: 30,
        ..Model::default()
    };
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");
    let generation = open_generation(&model);
    assert_eq!(remaining_ms(&model), 30);

    let update = app.update(Event::CountdownTicked { generation }, &mut model);
    assert_eq!(remaining_ms(&model), 20);
    // Still time left: the tick re-arms itself.
    assert_eq!(
        timer_ops(&update.effects)
            .iter()
            .filter(|op| matches!(op, TimerOperation::Start { .. }))
            .count(),
        1
    );

    app.update(Event::CountdownTicked { generation }, &mut model);
    assert_eq!(remaining_ms(&model), 10);

    let update = app.update(Event::CountdownTicked { generation }, &mut model);
    assert_eq!(remaining_ms(&model), 0);
    // Zero reached: no further tick is requested.
    assert!(timer_ops(&update.effects)
        .iter()
        .all(|op| !matches!(op, TimerOperation::Start { .. })));

    // The deadline fires with the display at exactly zero.
    app.update(Event::AutoConfirmElapsed { generation }, &mut model);
    assert!(picked_ids(&model).is_empty());
    assert!(!model.dialog.is_open());
}

#[test]
fn stale_tick_after_close_is_ignored() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");
    let generation = open_generation(&model);

    app.update(Event::RemovalCancelled, &mut model);
    let update = app.update(Event::CountdownTicked { generation }, &mut model);

    assert!(!model.dialog.is_open());
    assert!(timer_ops(&update.effects).is_empty());
}

#[test]
fn reopening_starts_a_fresh_countdown() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");

    request_removal(&app, &mut model, "p1");
    let first_generation = open_generation(&model);
    app.update(
        Event::CountdownTicked {
            generation: first_generation,
        },
        &mut model,
    );
    assert!(remaining_ms(&model) < REMOVAL_TIMEOUT_MS);
    app.update(Event::RemovalCancelled, &mut model);

    request_removal(&app, &mut model, "p1");
    let second_generation = open_generation(&model);

    assert_ne!(first_generation, second_generation);
    assert_eq!(remaining_ms(&model), REMOVAL_TIMEOUT_MS);
}

#[test]
fn second_removal_request_while_open_is_ignored() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");
    select(&app, &mut model, "p2");

    request_removal(&app, &mut model, "p1");
    let effects = request_removal(&app, &mut model, "p2");

    assert_eq!(model.dialog.pending(), Some(&PlaceId::new("p1")));
    assert!(modal_ops(&effects).is_empty());
}

#[test]
fn zero_grace_period_confirms_immediately() {
    let app = tester();
    let mut model = Model {
        removal_timeout_ms: 0,
        ..Model::default()
    };
    select(&app, &mut model, "p1");

    let effects = request_removal(&app, &mut model, "p1");

    assert!(picked_ids(&model).is_empty());
    assert!(!model.dialog.is_open());
    // The dialog never opens, so no overlay and no timers.
    assert!(modal_ops(&effects).is_empty());
    assert!(timer_ops(&effects).is_empty());
}

#[test]
fn confirm_with_closed_dialog_is_a_no_op() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");

    app.update(Event::RemovalConfirmed, &mut model);

    assert_eq!(picked_ids(&model), vec!["p1"]);
}

#[test]
fn reselecting_after_confirmed_removal_works() {
    let app = tester();
    let mut model = Model::default();
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");
    app.update(Event::RemovalConfirmed, &mut model);
    assert!(picked_ids(&model).is_empty());

    select(&app, &mut model, "p1");
    assert_eq!(picked_ids(&model), vec!["p1"]);
}

#[test]
fn dialog_view_reflects_countdown() {
    let app = tester();
    let mut model = Model {
        removal_timeout_ms: 100,
        ..Model::default()
    };
    select(&app, &mut model, "p1");
    request_removal(&app, &mut model, "p1");
    let generation = open_generation(&model);

    app.update(Event::CountdownTicked { generation }, &mut model);
    let view = app.view(&model);

    assert!(view.removal_dialog.open);
    assert_eq!(view.removal_dialog.remaining_ms, 90);
    assert_eq!(view.removal_dialog.total_ms, 100);
    assert!((view.removal_dialog.progress - 0.9).abs() < 1e-9);

    app.update(Event::RemovalCancelled, &mut model);
    let view = app.view(&model);
    assert!(!view.removal_dialog.open);
}

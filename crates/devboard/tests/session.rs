//! Board session integration tests: input, history and autosave together.

#![cfg(feature = "runtime")]

use std::sync::{Arc, Mutex};

use devboard::prelude::*;
use devboard::{
    Flow, ImportError, KeyCode, KeyEvent, ManualClock, Modifiers, PointerButton, PointerEvent,
    SessionConfig, StorageBackend, StorageError, WheelEvent, ZOOM_MAX,
};
use tracing_subscriber::layer::SubscriberExt;

struct WarnCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if *event.metadata().level() == tracing::Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.messages.lock().unwrap().push(visitor.0);
        }
    }
}

fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(WarnCapture {
        messages: messages.clone(),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = messages.lock().unwrap().clone();
    (result, captured)
}

fn session() -> (BoardSession<EventStormingBoard>, Arc<MemoryStorage>, ManualClock) {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::default();
    let session = BoardSession::open(storage.clone(), clock.clone(), SessionConfig::default());
    (session, storage, clock)
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL))
}

#[test]
fn navigation_autosaves_without_history() {
    let (mut s, storage, clock) = session();
    s.handle_event(&Event::Pointer(PointerEvent::down(PointerButton::Middle, 10.0, 10.0)));
    s.handle_event(&Event::Pointer(PointerEvent::moved(60.0, 30.0)));
    s.handle_event(&Event::Pointer(PointerEvent::up(PointerButton::Middle, 60.0, 30.0)));
    assert!(s.handle_event(&Event::Wheel(WheelEvent::new(-100.0, 0.0, 0.0))));

    assert!(!s.store().can_undo());
    assert_eq!(s.store().viewport(), s.controller().viewport());
    assert!(s.store().viewport().zoom > 1.0);

    clock.advance(std::time::Duration::from_millis(500));
    assert!(s.tick());
    let stored: EventStormingBoard =
        serde_json::from_str(&storage.load("devboard.event-storming").unwrap().unwrap()).unwrap();
    assert_eq!(stored.viewport, s.controller().viewport());
}

#[test]
fn shortcuts_drive_history() {
    let (mut s, _, _) = session();
    s.edit(|b| {
        b.add_flow(Flow::new("Checkout", Point::ZERO));
    });
    assert_eq!(s.board().flows.len(), 1);

    assert!(s.handle_event(&ctrl('z')));
    assert!(s.board().flows.is_empty());

    let redo = Event::Key(
        KeyEvent::new(KeyCode::Char('Z')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT),
    );
    assert!(s.handle_event(&redo));
    assert_eq!(s.board().flows.len(), 1);

    // Nothing left to redo.
    assert!(!s.handle_event(&redo));
}

#[test]
fn undo_keeps_the_view() {
    let (mut s, _, _) = session();
    s.set_container_size(Size::new(800.0, 600.0));
    s.edit(|b| {
        b.add_flow(Flow::new("A", Point::ZERO));
    });
    s.zoom_in();
    let view = s.controller().viewport();
    assert!(s.undo());
    assert_eq!(s.store().viewport(), view);
}

#[test]
fn restored_view_is_clamped_to_config() {
    let storage = Arc::new(MemoryStorage::new());
    let mut board = EventStormingBoard::empty();
    board.viewport = Viewport::new(5.0, 5.0, 9.0);
    storage
        .save("devboard.event-storming", &serde_json::to_string(&board).unwrap())
        .unwrap();

    let s: BoardSession<EventStormingBoard> =
        BoardSession::open(storage, ManualClock::default(), SessionConfig::default());
    assert_eq!(s.controller().viewport().zoom, ZOOM_MAX);
    assert_eq!(s.store().viewport().zoom, ZOOM_MAX);
    // Restoring never schedules a write, even when the view was adjusted.
    assert!(!s.store().is_autosave_pending());
    assert!(!s.store().can_undo());
}

#[test]
fn import_keeps_view_and_is_undoable() {
    let (mut s, _, _) = session();
    s.reset_view();
    s.handle_event(&Event::Wheel(WheelEvent::new(-1.0, 100.0, 100.0)));
    let view = s.controller().viewport();

    let mut other = EventStormingBoard::empty();
    other.name = "Imported".into();
    other.viewport = Viewport::new(999.0, 999.0, 0.5);
    let artifact = devboard::runtime::export_board(&other, chrono::Utc::now()).unwrap();

    assert!(s.import(artifact.contents.as_bytes()));
    assert_eq!(s.board().name, "Imported");
    assert_eq!(s.store().viewport(), view);
    assert!(!s.import(b"{}"));
    assert!(s.undo());
    assert_eq!(s.board().name, "Event Storming");
}

#[test]
fn close_stops_autosave() {
    let (mut s, storage, clock) = session();
    s.edit(|b| {
        b.add_flow(Flow::new("A", Point::ZERO));
    });
    s.close();
    clock.advance(std::time::Duration::from_secs(10));
    assert!(!s.tick());
    assert!(storage.load("devboard.event-storming").unwrap().is_none());
    assert!(s.export().is_ok());
}

#[test]
fn rejected_import_reports_reason_and_logs() {
    let (mut s, _, _) = session();
    let before = s.board().clone();

    let err = s.try_import(b"not json").unwrap_err();
    assert!(matches!(err, Error::Import(ImportError::Malformed(_))));

    let (accepted, warnings) = capture_warnings(|| s.import(br#"{"version":99,"board":{}}"#));
    assert!(!accepted);
    assert_eq!(warnings, vec!["import rejected".to_string()]);
    assert_eq!(s.board(), &before);
    assert!(!s.store().can_undo());
}

#[test]
fn save_surfaces_storage_errors() {
    let storage = Arc::new(MemoryStorage::with_quota(8));
    let mut s: BoardSession<EventStormingBoard> =
        BoardSession::open(storage, ManualClock::default(), SessionConfig::default());
    let err = s.save().unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::QuotaExceeded { quota: 8, .. })));

    let (mut ok, storage, _) = session();
    ok.save().unwrap();
    assert!(storage.load("devboard.event-storming").unwrap().is_some());
    ok.close();
    assert!(matches!(ok.save(), Err(Error::Storage(StorageError::Unavailable(_)))));
}

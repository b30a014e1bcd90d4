//! End-to-end flows: vCard directory → worker → handler → view model.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Cursor;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use zcontacts::app::expansion::RowUpdate;
use zcontacts::storage::{JsonPreferenceStore, PreferenceStore, Preferences};
use zcontacts::ui::render_to_string;
use zcontacts::worker::{ContactsWorker, WorkerMessage, WorkerResponse};
use zcontacts::{handle_event, initialize, Action, Config, Event, Photo};

fn png_base64(width: u32, height: u32) -> String {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
    STANDARD.encode(bytes)
}

fn write_contacts(dir: &Path) {
    let ann = format!(
        "BEGIN:VCARD\nVERSION:3.0\nUID:ann\nFN:Ann Smith\nTEL;TYPE=CELL:+1 555 0100\nPHOTO;ENCODING=b;TYPE=PNG:{}\nEND:VCARD\n",
        png_base64(4, 2)
    );
    std::fs::write(dir.join("ann.vcf"), ann).unwrap();
    std::fs::write(
        dir.join("others.vcf"),
        "BEGIN:VCARD\nVERSION:4.0\nUID:bob\nFN:Bob Jones\nTEL:+44 20 7946\n\
         PHOTO:data:image/png;base64,bm90IGFuIGltYWdl\nEND:VCARD\n\
         BEGIN:VCARD\nVERSION:4.0\nN:Nguyen;Carol;;;\nEND:VCARD\n",
    )
    .unwrap();
}

/// Pushes the worker request of `action` through `worker` and returns the
/// response as an event.
fn run_worker(worker: &mut ContactsWorker, action: &Action) -> Event {
    let Action::PostToWorker(message) = action else {
        panic!("expected a worker request, got {action:?}");
    };
    // Round trip through JSON as the real channel does.
    let payload = serde_json::to_string(message).unwrap();
    let message: WorkerMessage = serde_json::from_str(&payload).unwrap();
    let response = worker.handle_message(message);
    let payload = serde_json::to_string(&response).unwrap();
    Event::WorkerResponse(serde_json::from_str(&payload).unwrap())
}

fn config_for(dir: &Path) -> Config {
    Config {
        contacts_dir: dir.display().to_string(),
        ..Config::default()
    }
}

#[test]
fn fetch_expand_and_call() {
    let contacts_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    write_contacts(contacts_dir.path());

    let mut worker = ContactsWorker::with_store(Box::new(JsonPreferenceStore::in_dir(data_dir.path()).unwrap()));
    let mut state = initialize(&config_for(contacts_dir.path()), &Preferences::default());
    let now = Instant::now();

    let (_, actions) = handle_event(&mut state, &Event::Started, now).unwrap();
    assert_eq!(actions[0], Action::RequestPermission);
    let saved = run_worker(&mut worker, &actions[1]);
    assert_eq!(saved, Event::WorkerResponse(WorkerResponse::PreferencesSaved));
    assert!(JsonPreferenceStore::in_dir(data_dir.path()).unwrap().load().permission_requested);

    let (_, actions) = handle_event(&mut state, &Event::PermissionResult { granted: true }, now).unwrap();
    let fetched = run_worker(&mut worker, &actions[0]);
    let (render, _) = handle_event(&mut state, &fetched, now).unwrap();
    assert!(render);

    let records = state.list.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "Ann Smith");
    assert_eq!(records[0].photo.label(), "png 4x2");
    assert_eq!(records[1].name, "Bob Jones");
    assert_eq!(records[1].photo, Photo::Default);
    assert_eq!(records[2].name, "Carol Nguyen");
    assert_eq!(records[2].phone_number, "");

    // Expand Ann, then Bob: Ann collapses.
    assert_eq!(state.list.on_item_tapped(0), vec![RowUpdate::Expanded(0)]);
    assert_eq!(state.list.on_item_tapped(1), vec![RowUpdate::Collapsed(0), RowUpdate::Expanded(1)]);

    let (_, actions) = handle_event(&mut state, &Event::Call, now).unwrap();
    assert_eq!(actions, vec![Action::Dial { number: "+44 20 7946".to_string() }]);

    let frame = render_to_string(&state, 24, 100);
    assert!(frame.contains("Contacts (3)"));
    assert!(frame.contains("photo: default photo"));
    assert!(frame.contains("[c] Call  [m] Message"));
}

#[test]
fn contact_without_number_reports_invalid_number() {
    let contacts_dir = TempDir::new().unwrap();
    write_contacts(contacts_dir.path());

    let mut worker = ContactsWorker::default();
    let mut state = initialize(&config_for(contacts_dir.path()), &Preferences::default().with_permission_requested());
    let now = Instant::now();

    let (_, actions) = handle_event(&mut state, &Event::PermissionResult { granted: true }, now).unwrap();
    let fetched = run_worker(&mut worker, &actions[0]);
    handle_event(&mut state, &fetched, now).unwrap();

    handle_event(&mut state, &Event::KeyUp, now).unwrap();
    handle_event(&mut state, &Event::ToggleExpand, now).unwrap();
    let (_, actions) = handle_event(&mut state, &Event::Message, now).unwrap();

    assert_eq!(actions, vec![Action::ScheduleTick { after: Duration::from_millis(2000) }]);
    let frame = render_to_string(&state, 24, 100);
    assert!(frame.contains("Invalid phone number"));
    assert!(frame.contains("no number"));
}

#[test]
fn debounced_search_filters_after_quiet_period() {
    let contacts_dir = TempDir::new().unwrap();
    write_contacts(contacts_dir.path());

    let mut worker = ContactsWorker::default();
    let mut state = initialize(&config_for(contacts_dir.path()), &Preferences::default().with_permission_requested());
    let t0 = Instant::now();

    let (_, actions) = handle_event(&mut state, &Event::PermissionResult { granted: true }, t0).unwrap();
    let fetched = run_worker(&mut worker, &actions[0]);
    handle_event(&mut state, &fetched, t0).unwrap();

    handle_event(&mut state, &Event::SearchMode, t0).unwrap();
    for (offset, c) in [(0, '5'), (40, '5'), (80, '5')] {
        handle_event(&mut state, &Event::Char(c), t0 + Duration::from_millis(offset)).unwrap();
    }
    handle_event(&mut state, &Event::Tick, t0 + Duration::from_millis(379)).unwrap();
    assert_eq!(state.list.len(), 3);

    handle_event(&mut state, &Event::Tick, t0 + Duration::from_millis(380)).unwrap();
    assert_eq!(state.list.len(), 1);
    assert_eq!(state.list.records()[0].name, "Ann Smith");
}

#[test]
fn directory_search_drops_stale_results() {
    let contacts_dir = TempDir::new().unwrap();
    write_contacts(contacts_dir.path());

    let mut config = config_for(contacts_dir.path());
    config.search_source = zcontacts::SearchSource::Directory;
    let mut worker = ContactsWorker::default();
    let mut state = initialize(&config, &Preferences::default().with_permission_requested());
    let t0 = Instant::now();

    let (_, first) = handle_event(&mut state, &Event::PermissionResult { granted: true }, t0).unwrap();
    let (_, second) = handle_event(&mut state, &Event::Refresh, t0).unwrap();

    // Answers arrive out of order; the older one must not win.
    let newer = run_worker(&mut worker, &second[0]);
    handle_event(&mut state, &newer, t0).unwrap();
    std::fs::remove_file(contacts_dir.path().join("others.vcf")).unwrap();
    let older = run_worker(&mut worker, &first[0]);
    let (render, _) = handle_event(&mut state, &older, t0).unwrap();

    assert!(!render);
    assert_eq!(state.list.len(), 3);
}

#[test]
fn missing_directory_shows_notification_and_empty_state() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nowhere");

    let mut worker = ContactsWorker::default();
    let mut state = initialize(&config_for(&missing), &Preferences::default().with_permission_requested());
    let now = Instant::now();

    let (_, actions) = handle_event(&mut state, &Event::PermissionResult { granted: true }, now).unwrap();
    let failed = run_worker(&mut worker, &actions[0]);
    handle_event(&mut state, &failed, now).unwrap();

    assert!(!state.fetch.in_flight);
    assert!(state.notification.is_some());
    let frame = render_to_string(&state, 24, 100);
    assert!(frame.contains("No contacts found"));
}

#[test]
fn repeated_denial_shows_dialog() {
    let data_dir = TempDir::new().unwrap();
    let mut store = JsonPreferenceStore::in_dir(data_dir.path()).unwrap();
    store.save(&Preferences::default().with_permission_requested()).unwrap();

    let prefs = JsonPreferenceStore::in_dir(data_dir.path()).unwrap().load();
    let mut state = initialize(&Config::default(), &prefs);
    let now = Instant::now();

    let (_, actions) = handle_event(&mut state, &Event::Started, now).unwrap();
    assert_eq!(actions, vec![Action::RequestPermission]);

    let (_, actions) = handle_event(&mut state, &Event::PermissionResult { granted: false }, now).unwrap();
    assert!(actions.is_empty());
    assert!(state.dialog.is_some());
    assert!(render_to_string(&state, 24, 100).contains("Permission Required"));

    // Dismissing leaves the plugin open with the denial message.
    handle_event(&mut state, &Event::DismissDialog, now).unwrap();
    assert!(state.dialog.is_none());
    assert!(render_to_string(&state, 24, 100).contains("Contacts permission not granted"));
}

#[test]
fn shared_uid_keeps_the_tapped_contact_expanded_through_a_search() {
    let contacts_dir = TempDir::new().unwrap();
    std::fs::write(contacts_dir.path().join("a.vcf"), "BEGIN:VCARD\nUID:same\nFN:Ann\nTEL:1\nEND:VCARD\n").unwrap();
    std::fs::write(contacts_dir.path().join("b.vcf"), "BEGIN:VCARD\nUID:same\nFN:Anna\nTEL:2\nEND:VCARD\n").unwrap();

    let mut worker = ContactsWorker::default();
    let mut state = initialize(&config_for(contacts_dir.path()), &Preferences::default().with_permission_requested());
    let t0 = Instant::now();

    let (_, actions) = handle_event(&mut state, &Event::PermissionResult { granted: true }, t0).unwrap();
    let fetched = run_worker(&mut worker, &actions[0]);
    handle_event(&mut state, &fetched, t0).unwrap();

    handle_event(&mut state, &Event::KeyDown, t0).unwrap();
    handle_event(&mut state, &Event::ToggleExpand, t0).unwrap();
    assert_eq!(state.list.expanded_record().map(|r| r.name.as_str()), Some("Anna"));

    handle_event(&mut state, &Event::SearchMode, t0).unwrap();
    for c in "ann".chars() {
        handle_event(&mut state, &Event::Char(c), t0).unwrap();
    }
    handle_event(&mut state, &Event::Tick, t0 + Duration::from_secs(3)).unwrap();
    assert_eq!(state.list.len(), 2);

    let (_, actions) = handle_event(&mut state, &Event::Call, t0 + Duration::from_secs(3)).unwrap();
    assert_eq!(actions, vec![Action::Dial { number: "2".to_string() }]);
}

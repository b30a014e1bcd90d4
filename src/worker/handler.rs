//! Worker thread implementation.
//!
//! All blocking I/O (reading the contact directory, writing preferences)
//! happens here so the plugin's render loop never waits on the filesystem.

use crate::contacts::{ContactRepository, VcardDirectory};
use crate::domain::error::{ContactsError, Result};
use crate::infrastructure::paths;
use crate::storage::{JsonPreferenceStore, PreferenceStore, Preferences};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Worker state, created by Zellij on its own thread.
///
/// The preference store is opened lazily on the first request that needs it.
#[derive(Serialize, Deserialize, Default)]
pub struct ContactsWorker {
    #[serde(skip)]
    preferences: Option<Box<dyn PreferenceStore>>,
}

impl ContactsWorker {
    /// Creates a worker writing preferences through `store`.
    #[must_use]
    pub fn with_store(store: Box<dyn PreferenceStore>) -> Self {
        Self { preferences: Some(store) }
    }

    fn preference_store(&mut self) -> Result<&mut Box<dyn PreferenceStore>> {
        if self.preferences.is_none() {
            let store = JsonPreferenceStore::in_dir(&paths::get_data_dir())?;
            self.preferences = Some(Box::new(store));
        }
        self.preferences
            .as_mut()
            .ok_or_else(|| ContactsError::Worker("preference store not initialized".to_string()))
    }

    fn handle_fetch_contacts(generation: u64, contacts_dir: &str, query: Option<&str>) -> WorkerResponse {
        let repository = VcardDirectory::new(contacts_dir);

        match repository.fetch_all(query) {
            Ok(contacts) => {
                tracing::debug!(generation, count = contacts.len(), "contacts fetched");
                WorkerResponse::ContactsFetched { generation, contacts }
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "contact fetch failed");
                WorkerResponse::Error {
                    generation: Some(generation),
                    message: e.to_string(),
                }
            }
        }
    }

    fn handle_save_preferences(&mut self, preferences: &Preferences) -> WorkerResponse {
        match self.preference_store().and_then(|store| store.save(preferences)) {
            Ok(()) => WorkerResponse::PreferencesSaved,
            Err(e) => {
                tracing::warn!(error = %e, "saving preferences failed");
                WorkerResponse::Error {
                    generation: None,
                    message: format!("save preferences: {e}"),
                }
            }
        }
    }

    /// Re-parents the current thread's OpenTelemetry context onto the span
    /// that sent `message`. Hold the guard for the duration of the request.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }

    /// Processes one request.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = ?message).entered();

        match message {
            WorkerMessage::FetchContacts { generation, contacts_dir, query, .. } => {
                Self::handle_fetch_contacts(generation, &contacts_dir, query.as_deref())
            }
            WorkerMessage::SavePreferences { preferences, .. } => self.handle_save_preferences(&preferences),
        }
    }
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for ContactsWorker {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            if let Err(e) = crate::observability::init_tracing(&crate::Config::default()) {
                eprintln!("zcontacts worker: tracing disabled: {e}");
            }
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);

        match serde_json::to_string(&response) {
            Ok(payload) => post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            }),
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fetch(generation: u64, dir: &std::path::Path, query: Option<&str>) -> WorkerMessage {
        WorkerMessage::FetchContacts {
            generation,
            contacts_dir: dir.display().to_string(),
            query: query.map(str::to_string),
            trace_context: None,
        }
    }

    #[test]
    fn fetch_echoes_generation() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.vcf"), "BEGIN:VCARD\nFN:Ann\nTEL:1\nEND:VCARD\n").unwrap();

        let mut worker = ContactsWorker::default();
        match worker.handle_message(fetch(42, dir.path(), None)) {
            WorkerResponse::ContactsFetched { generation, contacts } => {
                assert_eq!(generation, 42);
                assert_eq!(contacts.len(), 1);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn missing_directory_reports_error_with_generation() {
        let dir = TempDir::new().unwrap();
        let mut worker = ContactsWorker::default();

        let response = worker.handle_message(fetch(3, &dir.path().join("missing"), Some("x")));
        assert!(matches!(response, WorkerResponse::Error { generation: Some(3), .. }));
    }

    #[test]
    fn saves_preferences_through_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonPreferenceStore::in_dir(dir.path()).unwrap();
        let mut worker = ContactsWorker::with_store(Box::new(store));

        let response = worker.handle_message(WorkerMessage::SavePreferences {
            preferences: Preferences::default().with_permission_requested(),
            trace_context: None,
        });
        assert_eq!(response, WorkerResponse::PreferencesSaved);

        let reopened = JsonPreferenceStore::in_dir(dir.path()).unwrap();
        assert!(reopened.load().permission_requested);
    }

    #[test]
    fn save_recovers_from_corrupt_preference_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(crate::storage::PREFERENCES_FILE), "{\"version\":").unwrap();
        let store = JsonPreferenceStore::in_dir(dir.path()).unwrap();
        let mut worker = ContactsWorker::with_store(Box::new(store));

        let response = worker.handle_message(WorkerMessage::SavePreferences {
            preferences: Preferences::default().with_permission_requested(),
            trace_context: None,
        });
        assert_eq!(response, WorkerResponse::PreferencesSaved);

        let reopened = JsonPreferenceStore::in_dir(dir.path()).unwrap();
        assert!(reopened.load().permission_requested);
    }
}

//! Worker thread message types for cross-thread communication.
//!
//! Requests and responses travel as JSON through Zellij's worker channel.
//! Every request carries an optional [`TraceContext`] so spans recorded on
//! the worker join the trace that issued the request.

use crate::domain::ContactRecord;
use crate::storage::Preferences;
use serde::{Deserialize, Serialize};

/// Trace and parent span identifiers captured on the sending thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry context of the current tracing span.
    ///
    /// Returns `None` when no valid span context is active, e.g. before
    /// tracing is initialized.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_contacts(FetchContacts { generation: u64, contacts_dir: String, query: Option<String> }),
    save_preferences(SavePreferences { preferences: Preferences }),
}

/// Requests from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the contact directory.
    FetchContacts {
        /// Request counter; echoed back so stale results can be dropped.
        generation: u64,

        /// Sandbox path of the vCard directory.
        contacts_dir: String,

        /// Optional name or number filter applied while reading.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist plugin preferences.
    SavePreferences {
        preferences: Preferences,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchContacts { trace_context, .. } | Self::SavePreferences { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Responses from the worker to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Result of a `FetchContacts` request.
    ContactsFetched {
        generation: u64,
        contacts: Vec<ContactRecord>,
    },

    /// Preferences were written.
    PreferencesSaved,

    /// A request failed.
    Error {
        /// Generation of the failed fetch, `None` for other requests.
        #[serde(default)]
        generation: Option<u64>,

        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_request_round_trips_through_json() {
        let message = WorkerMessage::FetchContacts {
            generation: 7,
            contacts_dir: "/host/.contacts".to_string(),
            query: Some("ann".to_string()),
            trace_context: Some(TraceContext {
                trace_id: "0af7651916cd43dd8448eb211c80319c".to_string(),
                parent_span_id: "b7ad6b7169203331".to_string(),
            }),
        };

        let json = serde_json::to_string(&message).unwrap();
        let back: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn absent_optional_fields_are_omitted() {
        let message = WorkerMessage::FetchContacts {
            generation: 1,
            contacts_dir: "/c".to_string(),
            query: None,
            trace_context: None,
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("query"));
        assert!(!json.contains("trace_context"));
        assert_eq!(serde_json::from_str::<WorkerMessage>(&json).unwrap(), message);
    }
}

//! Background worker thread for contact fetching and preference writes.
//!
//! - `messages`: Request/response protocol with trace context propagation
//! - `handler`: [`ContactsWorker`], the Zellij worker implementation

pub mod handler;
pub mod messages;

pub use handler::ContactsWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};

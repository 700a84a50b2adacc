//! Terminal input for the composer.
//!
//! A single Tokio task reads `crossterm::EventStream` and forwards normalized
//! [`core_events::Event`]s into the event loop's bounded channel. Typed text
//! and pasted payloads are never logged; only their lengths are.

mod async_service;
mod key_token;
pub use async_service::AsyncInputShutdown;

use core_events::Event;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

pub(crate) fn log_paste_chunk_flush(chunk: &str) {
    tracing::trace!(target: "input.paste", chunk_len = chunk.len(), "chunk_flush");
}

/// Start reading terminal events into `sender`.
///
/// The returned handle joins the reader task; [`AsyncInputShutdown::signal`]
/// stops it without waiting for the next terminal event.
pub fn spawn_async_input(sender: Sender<Event>) -> (JoinHandle<()>, AsyncInputShutdown) {
    async_service::spawn(sender)
}

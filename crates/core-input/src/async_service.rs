use crate::key_token::{KeyPressParts, map_key_event};
use crate::log_paste_chunk_flush;
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOPS, CHANNEL_SEND_FAILURES, Event, InputEvent,
    KEYPRESS_REPEAT, KEYPRESS_TOTAL, KeyEventExt, KeyToken, PASTE_BYTES, PASTE_CHUNKS,
    PASTE_SESSIONS,
};
use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, info, trace, warn};

/// Upper bound on one `PasteChunk` payload.
const PASTE_CHUNK_BYTES: usize = 4_096;

/// Handle that stops the input task.
///
/// The stop request is remembered, so signalling before the task reaches its
/// next `select!` still ends it.
#[derive(Clone, Debug, Default)]
pub struct AsyncInputShutdown(Arc<Notify>);

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.0.notify_one();
    }

    async fn requested(&self) {
        self.0.notified().await;
    }
}

pub(crate) fn spawn(sender: Sender<Event>) -> (JoinHandle<()>, AsyncInputShutdown) {
    let shutdown = AsyncInputShutdown::default();
    let pump = InputPump::new(sender, EventStream::new(), shutdown.clone());
    (spawn_pump(pump), shutdown)
}

/// Run `pump` as its own task inside the `input_pump` span.
fn spawn_pump<S>(pump: InputPump<S>) -> JoinHandle<()>
where
    S: Stream<Item = io::Result<TermEvent>> + Send + Sync + Unpin + 'static,
{
    let span = tracing::debug_span!(target: "input.thread", "input_pump");
    tokio::spawn(pump.run().instrument(span))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopCause {
    StreamEnded,
    Shutdown,
    ReceiverGone,
    StreamError(io::ErrorKind),
}

impl StopCause {
    fn label(self) -> &'static str {
        match self {
            StopCause::StreamEnded => "stream_ended",
            StopCause::Shutdown => "shutdown_signal",
            StopCause::ReceiverGone => "channel_closed",
            StopCause::StreamError(_) => "stream_error",
        }
    }
}

/// Outcome of forwarding one terminal event.
type Flow = Result<(), StopCause>;

/// Reads terminal events and forwards them to the composer's loop.
struct InputPump<S> {
    sender: Sender<Event>,
    stream: S,
    shutdown: AsyncInputShutdown,
}

impl<S> InputPump<S>
where
    S: Stream<Item = io::Result<TermEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: AsyncInputShutdown) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);

        let cause = loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.requested() => break StopCause::Shutdown,
                next = self.stream.next() => next,
            };
            let flow = match next {
                None => Err(StopCause::StreamEnded),
                Some(Err(err)) => Err(StopCause::StreamError(err.kind())),
                Some(Ok(event)) => self.forward(event).await,
            };
            if let Err(cause) = flow {
                break cause;
            }
        };

        ASYNC_INPUT_STOPS.fetch_add(1, Ordering::Relaxed);
        if let StopCause::StreamError(kind) = cause {
            warn!(target: "input.thread", error_kind = ?kind, "async_input_task_stream_error");
        }
        info!(target: "input.thread", reason = cause.label(), "async_input_task_stopped");
    }

    async fn forward(&mut self, event: TermEvent) -> Flow {
        match event {
            TermEvent::Key(key) => self.forward_key(key).await,
            TermEvent::Paste(data) => self.forward_paste(&data).await,
            TermEvent::Resize(w, h) => {
                trace!(target: "input.event", w, h, "resize");
                self.send(InputEvent::Resize(w, h)).await
            }
            TermEvent::FocusGained => self.send(InputEvent::FocusGained).await,
            TermEvent::FocusLost => self.send(InputEvent::FocusLost).await,
            TermEvent::Mouse(_) => Ok(()),
        }
    }

    async fn forward_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.send(InputEvent::CtrlC).await;
        }
        let Some(KeyPressParts {
            token,
            mods,
            repeat,
        }) = map_key_event(&key)
        else {
            return Ok(());
        };

        let token = KeyToken::chord(token, mods);
        trace!(
            target: "input.event",
            kind = "keypress",
            repeat,
            mods = ?mods,
            token_kind = token.kind_label()
        );
        self.send(InputEvent::KeyPress(KeyEventExt::with_repeat(token, repeat)))
            .await?;
        KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
        if repeat {
            KEYPRESS_REPEAT.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    /// A bracketed paste becomes `PasteStart`, one or more chunks, `PasteEnd`.
    async fn forward_paste(&mut self, data: &str) -> Flow {
        trace!(target: "input.paste", len = data.len(), "paste_event");
        self.send(InputEvent::PasteStart).await?;
        PASTE_SESSIONS.fetch_add(1, Ordering::Relaxed);

        for chunk in paste_chunks(data) {
            log_paste_chunk_flush(chunk);
            self.send(InputEvent::PasteChunk(chunk.to_owned())).await?;
            PASTE_CHUNKS.fetch_add(1, Ordering::Relaxed);
            PASTE_BYTES.fetch_add(chunk.len() as u64, Ordering::Relaxed);
        }

        trace!(target: "input.paste", "paste_event_end");
        self.send(InputEvent::PasteEnd).await
    }

    async fn send(&self, input: InputEvent) -> Flow {
        self.sender.send(Event::Input(input)).await.map_err(|_| {
            CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            StopCause::ReceiverGone
        })
    }
}

/// Slices `data` into pieces of at most `PASTE_CHUNK_BYTES`, never cutting a
/// UTF-8 sequence.
fn paste_chunks(data: &str) -> impl Iterator<Item = &str> {
    let mut rest = data;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let mut cut = rest.len().min(PASTE_CHUNK_BYTES);
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = rest.split_at(cut);
        rest = tail;
        Some(head)
    })
}

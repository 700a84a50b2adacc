//! Composer application state machine, independent of the terminal.
//!
//! The event loop feeds every [`InputEvent`] through [`App::handle_input_event`];
//! after each event the gauge is refreshed against the current text and the
//! screen is rebuilt only if something changed.

use core_config::GaugeSettings;
use core_events::{InputEvent, KeyEventExt, KeyToken, ModMask, NamedKey};
use core_gauge::{Gauge, GaugeState};
use core_render::Frame;
use core_render::composer::build_frame;
use core_state::ComposerState;
use core_text::{LengthMetric, MetricKind};
use std::fmt;
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    CtrlC,
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::Quit => "quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

pub struct App {
    state: ComposerState,
    gauge: Gauge,
    metric: Box<dyn LengthMetric + Send + Sync>,
    size: (u16, u16),
    last_state: GaugeState,
    resized: bool,
}

impl App {
    pub fn new(settings: GaugeSettings, initial: Option<&str>, size: (u16, u16)) -> Self {
        let state = initial.map(ComposerState::with_text).unwrap_or_default();
        let mut app = Self {
            state,
            gauge: settings.gauge(),
            metric: settings.metric.metric(),
            size,
            last_state: GaugeState::Ok,
            resized: false,
        };
        app.refresh();
        app.state.mark_dirty();
        app
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    pub fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    pub fn metric_kind(&self) -> MetricKind {
        self.metric.kind()
    }

    /// Re-measure the text and let the gauge update its decoration.
    pub fn refresh(&mut self) -> GaugeState {
        let weighted = self.metric.measure(self.state.text());
        let state = self
            .gauge
            .update_with(&mut self.state, Some(weighted), self.metric.as_ref());
        if state != self.last_state {
            info!(
                target: "gauge",
                from = self.last_state.as_str(),
                to = state.as_str(),
                weighted_length = weighted,
                max_count = self.gauge.max_count().get(),
                "gauge_state_changed"
            );
            self.last_state = state;
        }
        state
    }

    /// Returns whether the screen must be repainted, clearing the flag.
    pub fn take_redraw(&mut self) -> bool {
        self.state.take_dirty()
    }

    /// Whether the terminal size changed since the last call.
    pub fn take_resized(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    pub fn frame(&self) -> Frame {
        build_frame(&self.state, &self.gauge, self.size.0, self.size.1)
    }

    pub fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        let control = match input {
            InputEvent::KeyPress(key) => self.handle_key(key),
            InputEvent::CtrlC => LoopControl::Break {
                reason: ShutdownReason::CtrlC,
            },
            InputEvent::Resize(w, h) => self.handle_resize(*w, *h),
            InputEvent::PasteStart => {
                self.state.begin_paste();
                LoopControl::Continue
            }
            InputEvent::PasteChunk(chunk) => {
                self.state.push_paste_chunk(chunk);
                LoopControl::Continue
            }
            InputEvent::PasteEnd => {
                self.state.end_paste();
                LoopControl::Continue
            }
            InputEvent::FocusGained | InputEvent::FocusLost => LoopControl::Continue,
        };
        if control == LoopControl::Continue {
            self.refresh();
        }
        control
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> LoopControl {
        debug!(target: "runtime", width, height, "resize");
        if self.size != (width, height) {
            self.size = (width, height);
            self.resized = true;
            self.state.mark_dirty();
        }
        LoopControl::Continue
    }

    fn handle_key(&mut self, key: &KeyEventExt) -> LoopControl {
        trace!(
            target: "runtime.key",
            kind = key.token.kind_label(),
            repeat = key.repeat,
            "key"
        );
        match &key.token {
            KeyToken::Char(c) => self.state.insert_char(*c),
            KeyToken::Named(named) => return self.handle_named(*named),
            KeyToken::Chord { base, mods } => return self.handle_chord(base, *mods),
        }
        LoopControl::Continue
    }

    fn handle_named(&mut self, key: NamedKey) -> LoopControl {
        match key {
            NamedKey::Esc => {
                return LoopControl::Break {
                    reason: ShutdownReason::Quit,
                };
            }
            NamedKey::Enter => self.state.insert_newline(),
            NamedKey::Backspace => {
                self.state.backspace();
            }
            NamedKey::Delete => {
                self.state.delete_forward();
            }
            NamedKey::Left => self.state.move_left(),
            NamedKey::Right => self.state.move_right(),
            NamedKey::Home => self.state.move_home(),
            NamedKey::End => self.state.move_end(),
            NamedKey::Tab | NamedKey::Up | NamedKey::Down => {}
        }
        LoopControl::Continue
    }

    fn handle_chord(&mut self, base: &KeyToken, mods: ModMask) -> LoopControl {
        if mods != ModMask::CTRL {
            return LoopControl::Continue;
        }
        match base {
            KeyToken::Char('s') => self.post(),
            KeyToken::Char('q') => {
                return LoopControl::Break {
                    reason: ShutdownReason::Quit,
                };
            }
            _ => {}
        }
        LoopControl::Continue
    }

    fn post(&mut self) {
        let weighted = self.gauge.weighted_length();
        let state = self.gauge.state();
        let posted = self.state.post();
        info!(
            target: "runtime",
            bytes = posted.len(),
            weighted_length = weighted,
            state = state.as_str(),
            posts = self.state.posts(),
            "composer_posted"
        );
    }
}

//! length-gauge entrypoint: a terminal composer with a circular
//! character-count gauge.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::{ConfigOverrides, GaugeSettings, load_from};
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOPS, CHANNEL_SEND_FAILURES, EVENT_CHANNEL_CAP, Event,
    KEYPRESS_REPEAT, KEYPRESS_TOTAL, PASTE_BYTES, PASTE_CHUNKS, PASTE_SESSIONS,
};
use core_render::terminal::{CrosstermBackend, TerminalBackend, TerminalGuard};
use core_render::writer::Writer;
use core_text::MetricKind;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, trace};
use tracing_appender::non_blocking::WorkerGuard;

mod app;
use app::{App, LoopControl, ShutdownReason};

const LOG_FILE_NAME: &str = "length-gauge.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "length-gauge",
    version,
    about = "Message composer with a character-count gauge"
)]
struct Args {
    /// Initial composer text.
    pub text: Option<String>,
    /// Optional configuration file path (overrides discovery of `length-gauge.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Maximum count, overriding `[gauge] max_count`.
    #[arg(long = "max-count", allow_negative_numbers = true)]
    pub max_count: Option<i64>,
    /// Length metric (`utf16` or `weighted`), overriding `[length] metric`.
    #[arg(long = "metric")]
    pub metric: Option<MetricKind>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_count: self.max_count,
            metric: self.metric,
        }
    }
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    app: App,
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run(&mut self, args: &Args) -> Result<RuntimeContext<'_>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        let settings = Self::load_settings(args)?;

        self.backend.set_title("length-gauge")?;
        let size = self.backend.size()?;
        let guard = self.backend.enter_guard()?;

        info!(
            target: "runtime.startup",
            max_count = settings.max_count.get(),
            warning_cutoff = settings.warning_cutoff,
            metric = settings.metric.as_str(),
            initial_len = args.text.as_deref().map_or(0, str::len),
            config_override = args.config.is_some(),
            "bootstrap_complete"
        );

        Ok(RuntimeContext {
            app: App::new(settings, args.text.as_deref(), size),
            terminal_guard: guard,
        })
    }

    /// Logs go to `length-gauge.log` in the working directory, truncated on
    /// every start; the terminal itself belongs to the composer.
    fn configure_logging(&mut self) -> Result<()> {
        let dir = Path::new(".");
        match std::fs::remove_file(dir.join(LOG_FILE_NAME)) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err).context("truncating previous log file"),
        }

        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE_NAME));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(writer)
            .try_init()
            .is_ok();
        // Someone else owns the global subscriber; let the guard drop.
        self.log_guard = installed.then_some(guard);
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn load_settings(args: &Args) -> Result<GaugeSettings> {
        let config = load_from(args.config.clone())?;
        let settings = config
            .resolve(args.overrides())
            .with_context(|| match &config.source {
                Some(path) => format!("invalid configuration in {}", path.display()),
                None => "invalid configuration".to_string(),
            })?;
        Ok(settings)
    }
}

struct ComposerRuntime<'a> {
    app: App,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    frames: u64,
    _terminal_guard: TerminalGuard<'a>,
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

impl<'a> ComposerRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: tokio::task::JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
    ) -> Self {
        let RuntimeContext {
            app,
            terminal_guard,
        } = context;
        Self {
            app,
            rx,
            tx: Some(tx),
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            frames: 0,
            _terminal_guard: terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.render_if_needed();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let reason = self.drain_events().instrument(loop_span).await;

        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(())
    }

    /// Feed events to the app until it or the channel asks to stop.
    async fn drain_events(&mut self) -> ShutdownReason {
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(input) => self.app.handle_input_event(input),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            match control {
                LoopControl::Break { reason } => return reason,
                LoopControl::Continue => self.render_if_needed(),
            }
        }
        ShutdownReason::ChannelClosed
    }

    fn render_if_needed(&mut self) {
        if !self.app.take_redraw() {
            return;
        }
        let mut writer = Writer::new();
        if self.app.take_resized() {
            writer.clear_all();
        }
        let result = writer
            .flush()
            .and_then(|_| Writer::from_frame(&self.app.frame()).flush());
        match result {
            Ok(()) => {
                self.frames += 1;
                trace!(target: "render", frames = self.frames, "frame_flushed");
            }
            Err(e) => error!(target: "render", ?e, "render_error"),
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        // The reader may be parked in `send`; closing our sender and the
        // receiver lets it observe the closed channel.
        drop(self.tx.take());
        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
            log_shutdown_stage(reason, "input_signalled");
        }

        if let Some(handle) = self.input_task.take() {
            let stage = match handle.await {
                Ok(()) => "input_joined",
                Err(err) if err.is_cancelled() => "input_cancelled",
                Err(err) => {
                    error!(target: "runtime.shutdown", ?err, "input_task_join_failed");
                    "input_join_failed"
                }
            };
            log_shutdown_stage(reason, stage);
        }

        log_input_telemetry();
        info!(
            target: "runtime.shutdown",
            frames = self.frames,
            posts = self.app.state().posts(),
            "runtime_summary"
        );
        log_shutdown_stage(reason, "complete");
    }
}

fn log_input_telemetry() {
    info!(
        target: "runtime.telemetry",
        keypress_total = KEYPRESS_TOTAL.load(Ordering::Relaxed),
        keypress_repeat = KEYPRESS_REPEAT.load(Ordering::Relaxed),
        paste_sessions = PASTE_SESSIONS.load(Ordering::Relaxed),
        paste_chunks = PASTE_CHUNKS.load(Ordering::Relaxed),
        paste_bytes = PASTE_BYTES.load(Ordering::Relaxed),
        channel_send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
        async_input_starts = ASYNC_INPUT_STARTS.load(Ordering::Relaxed),
        async_input_stops = ASYNC_INPUT_STOPS.load(Ordering::Relaxed),
        "input_telemetry"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());

    let mut runtime = ComposerRuntime::new(context, tx, rx, input_task, input_shutdown);
    runtime.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_overrides() {
        let args = Args::try_parse_from([
            "length-gauge",
            "--max-count",
            "140",
            "--metric",
            "weighted",
            "--config",
            "custom.toml",
            "hello",
        ])
        .unwrap();
        assert_eq!(args.text.as_deref(), Some("hello"));
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(
            args.overrides(),
            ConfigOverrides {
                max_count: Some(140),
                metric: Some(MetricKind::Weighted),
            }
        );
    }

    #[test]
    fn unknown_metric_is_a_usage_error() {
        assert!(Args::try_parse_from(["length-gauge", "--metric", "bytes"]).is_err());
    }

    #[test]
    fn negative_max_count_parses_then_fails_validation() {
        let args = Args::try_parse_from(["length-gauge", "--max-count", "-3"]).unwrap();
        assert_eq!(args.max_count, Some(-3));
        let missing = PathBuf::from("__no_such_length_gauge_config__.toml");
        let args = Args {
            config: Some(missing),
            ..args
        };
        let err = AppStartup::load_settings(&args).unwrap_err();
        assert!(format!("{err:#}").contains("max count"));
    }

    #[tokio::test]
    async fn bounded_channel_capacity_blocking() {
        let (tx, mut rx) = mpsc::channel::<Event>(1);
        tx.send(Event::Shutdown).await.unwrap();
        assert!(tx.try_send(Event::Shutdown).is_err());
        assert!(matches!(rx.recv().await, Some(Event::Shutdown)));
    }
}

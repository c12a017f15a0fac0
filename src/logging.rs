// src/logging.rs
// =============================================================================
// Log lines produced by the crawl pipeline.
//
// Pipeline components never write to the terminal themselves. They hand a
// `LogLine` to the `LogSink`, which is an unbounded channel, so emitting never
// waits on the terminal. A single writer task drains the channel and passes
// each line on to `tracing`.
//
// stdout is kept for results; all log output goes to stderr.
// =============================================================================

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub content: String,
    pub level: Level,
}

/// Fire-and-forget handle for pipeline log lines.
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: mpsc::UnboundedSender<LogLine>,
}

impl LogSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LogLine>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, line: LogLine) {
        // A closed writer only means nobody is listening any more.
        let _ = self.tx.send(line);
    }

    pub fn info(&self, content: impl Into<String>) {
        self.emit(LogLine {
            content: content.into(),
            level: Level::Info,
        });
    }

    pub fn error(&self, content: impl Into<String>) {
        self.emit(LogLine {
            content: content.into(),
            level: Level::Error,
        });
    }

    pub fn debug(&self, content: impl Into<String>) {
        self.emit(LogLine {
            content: content.into(),
            level: Level::Debug,
        });
    }
}

/// Spawns the task that forwards log lines to `tracing`.
/// It finishes once every `LogSink` clone has been dropped.
pub fn spawn_writer(mut rx: mpsc::UnboundedReceiver<LogLine>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            match line.level {
                Level::Info => tracing::info!("{}", line.content),
                Level::Error => tracing::error!("{}", line.content),
                Level::Debug => tracing::debug!("{}", line.content),
            }
        }
    })
}

/// Installs the global subscriber. `RUST_LOG` wins over the `--debug` flag.
pub fn init(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// src/checker/wordlist.rs
// =============================================================================
// Streams a wordlist file into a bounded queue.
//
// The file is read line by line on its own task, so a huge wordlist never
// has to fit in memory and the brute-forcer can start probing before the
// file has been read. The queue is closed (sender dropped) at end of file.
// =============================================================================

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::WordSource;
use crate::logging::LogSink;

pub struct FileWordlist {
    path: PathBuf,
    log: LogSink,
}

impl FileWordlist {
    pub fn new(path: impl Into<PathBuf>, log: LogSink) -> Self {
        Self {
            path: path.into(),
            log,
        }
    }
}

impl WordSource for FileWordlist {
    fn open(&self, capacity: usize) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let path = self.path.clone();
        let log = self.log.clone();

        tokio::spawn(async move {
            if let Err(e) = load_words(&path, &tx).await {
                log.error(format!("Failed to read wordlist {}: {}", path.display(), e));
            }
        });

        rx
    }
}

async fn load_words(path: &Path, tx: &mpsc::Sender<String>) -> std::io::Result<()> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    while let Some(line) = lines.next_line().await? {
        let word = line.trim();
        if word.is_empty() || word.starts_with('#') {
            continue;
        }
        if tx.send(word.to_string()).await.is_err() {
            // Reader went away; nothing left to do.
            break;
        }
    }
    Ok(())
}

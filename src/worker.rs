//! Worker pool dispatching files to decoders.
//!
//! Each worker owns one instance of every decoder for its whole lifetime and
//! pulls file paths from a shared channel until it is drained. Reports are
//! sent back over a second channel as soon as a file is done, so they arrive
//! in no particular order.

use std::path::PathBuf;
use std::thread;

use crossbeam_channel::Receiver;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::format::{create_decoders, decode_file, has_known_extension, known_extensions};
use crate::format::{DecoderSettings, FileReport};

/// Workers per CPU when no explicit count is given.
pub const THREADS_PER_CPU: usize = 8;

// =============================================================================
// File Collection
// =============================================================================

/// Expand `paths` into a list of files.
///
/// Directories are walked recursively; entries that cannot be read are
/// logged and skipped. With `known_extensions_only`, files whose extension
/// no decoder lists are dropped.
pub fn collect_files(
    paths: &[PathBuf],
    settings: &DecoderSettings,
    known_extensions_only: bool,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        debug!(directory = %path.display(), "scanning directory");
        for entry in WalkDir::new(path).follow_links(true) {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => warn!(directory = %path.display(), error = %e, "cannot scan entry"),
            }
        }
    }

    if known_extensions_only {
        let extensions = known_extensions(&create_decoders(settings));
        files.retain(|f| has_known_extension(f, &extensions));
    }
    files
}

/// Number of workers to start for `num_files` files.
///
/// An explicit count wins; otherwise the CPU count times
/// [`THREADS_PER_CPU`]. Never more than the number of files, never zero.
pub fn thread_count(explicit: Option<usize>, num_files: usize) -> usize {
    let wanted = explicit.unwrap_or_else(|| {
        thread::available_parallelism().map_or(1, |n| n.get()) * THREADS_PER_CPU
    });
    wanted.min(num_files).max(1)
}

// =============================================================================
// Pool
// =============================================================================

/// Start `threads` workers over `files`.
///
/// Must be called from within a tokio runtime. The returned receiver yields
/// one report per readable file and closes once every worker has finished.
pub fn run(
    files: Vec<PathBuf>,
    settings: &DecoderSettings,
    threads: usize,
) -> mpsc::UnboundedReceiver<FileReport> {
    let (file_tx, file_rx) = crossbeam_channel::unbounded();
    for file in files {
        // the receiver is still alive, so sending cannot fail
        let _ = file_tx.send(file);
    }
    drop(file_tx);

    let (tx, rx) = mpsc::unbounded_channel();
    for id in 0..threads.max(1) {
        let queue = file_rx.clone();
        let tx = tx.clone();
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || work(id, &queue, &settings, &tx));
    }
    rx
}

fn work(
    id: usize,
    queue: &Receiver<PathBuf>,
    settings: &DecoderSettings,
    tx: &mpsc::UnboundedSender<FileReport>,
) {
    let mut decoders = create_decoders(settings);
    let mut processed = 0usize;

    for path in queue.iter() {
        match decode_file(&mut decoders, settings, &path) {
            Ok(report) => {
                processed += 1;
                if tx.send(report).is_err() {
                    break;
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "cannot read file"),
        }
    }
    debug!(worker = id, files = processed, "worker finished");
}

// =============================================================================
// Tests
// =============================================================================

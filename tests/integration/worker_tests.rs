//! Worker pool tests over files on disk.

use std::fs;
use std::path::PathBuf;

use imgcheck::diagnostics::ResultStatus;
use imgcheck::format::{DecoderSettings, FileReport};
use imgcheck::worker::{collect_files, run, thread_count};

use super::test_utils::*;

async fn run_all(files: Vec<PathBuf>, threads: usize) -> Vec<FileReport> {
    let mut rx = run(files, &DecoderSettings::default(), threads);
    let mut reports = Vec::new();
    while let Some(report) = rx.recv().await {
        reports.push(report);
    }
    reports.sort_by(|a, b| a.path.cmp(&b.path));
    reports
}

fn write_samples(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("raw")).unwrap();
    fs::write(dir.join("a.tif"), create_strip_tiff()).unwrap();
    fs::write(dir.join("b.jpg"), create_test_jpeg()).unwrap();
    let mut broken = create_test_jpeg();
    broken.truncate(broken.len() - 2);
    fs::write(dir.join("c.jpeg"), broken).unwrap();
    fs::write(dir.join("raw/d.dng"), create_strip_tiff()).unwrap();
    fs::write(dir.join("notes.txt"), b"not an image").unwrap();
}

#[tokio::test]
async fn test_pool_checks_directory_tree() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());

    let files = collect_files(&[dir.path().to_path_buf()], &DecoderSettings::default(), false);
    assert_eq!(files.len(), 5);

    let threads = thread_count(Some(3), files.len());
    let reports = run_all(files, threads).await;
    assert_eq!(reports.len(), 5);

    let statuses: Vec<(Option<&str>, ResultStatus)> =
        reports.iter().map(|r| (r.format, r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (Some("TIFF"), ResultStatus::Ok),
            (Some("JPEG"), ResultStatus::Ok),
            (Some("JPEG"), ResultStatus::Error),
            (None, ResultStatus::Unknown),
            (Some("TIFF"), ResultStatus::Ok),
        ]
    );
}

#[tokio::test]
async fn test_known_extensions_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());

    let files = collect_files(&[dir.path().to_path_buf()], &DecoderSettings::default(), true);
    assert_eq!(files.len(), 4);
    assert!(files.iter().all(|f| f.extension().unwrap() != "txt"));

    let reports = run_all(files, 1).await;
    assert!(reports.iter().all(|r| r.format.is_some()));
}

#[tokio::test]
async fn test_single_worker_reuses_decoders() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = Vec::new();
    for i in 0..6 {
        let path = dir.path().join(format!("{i}.jpg"));
        let data = if i % 2 == 0 {
            create_test_jpeg()
        } else {
            vec![0xFF, 0xD8, 0xFF, 0xD8]
        };
        fs::write(&path, data).unwrap();
        files.push(path);
    }

    let reports = run_all(files, 1).await;
    let ok: Vec<bool> = reports.iter().map(FileReport::is_ok).collect();
    assert_eq!(ok, vec![true, false, true, false, true, false]);
}

#[tokio::test]
async fn test_unreadable_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.jpg");
    fs::write(&good, create_test_jpeg()).unwrap();

    let reports = run_all(vec![dir.path().join("gone.jpg"), good], 4).await;
    assert_eq!(reports.len(), 1);
    assert!(reports[0].path.ends_with("good.jpg"));
}

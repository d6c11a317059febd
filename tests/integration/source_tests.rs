//! Loading runs from a directory tree through a session

use std::path::PathBuf;
use std::sync::Arc;

use travelog::session::Session;
use travelog::settings::{SourceConfig, TelemetryConfig};
use travelog::source::{self, DirectorySource, RunSource};

use crate::common::{run_bytes, synthetic, wait_for};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("travelog-it-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_directory_runs_load_into_session() {
    let dir = temp_dir("session");
    std::fs::write(
        dir.join("morning.json"),
        run_bytes(&synthetic::ramp(200, 1024.0), &synthetic::ramp(200, 1024.0), 100.0, 100.0),
    )
    .unwrap();
    std::fs::write(dir.join("broken.json"), b"[1, 2").unwrap();

    let source: Arc<dyn RunSource> = Arc::from(source::from_config(&SourceConfig::Directory(dir.clone())));
    let runs = source.list_runs().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].display_title(), "broken");
    assert_eq!(runs[1].display_title(), "morning");

    let mut session = Session::new(source, TelemetryConfig::default());
    session.toggle(&runs[0]);
    session.toggle(&runs[1]);
    assert!(wait_for(&mut session, |s| !s.is_loading()));

    assert!(session.selected()[0].slot.error().is_some());
    let loaded = session.selected()[1].slot.loaded().unwrap();
    assert_eq!(loaded.analysis.front.series.len(), 200);
    assert_eq!(loaded.analysis.rear.sag.len(), 151);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_file_reports_io_error() {
    let dir = temp_dir("missing");
    std::fs::write(dir.join("gone.json"), b"{}").unwrap();

    let source = DirectorySource::new(&dir);
    let runs = source.list_runs().unwrap();
    std::fs::remove_file(dir.join("gone.json")).unwrap();

    let err = source.fetch(&runs[0]).unwrap_err();
    assert!(err.to_string().contains("gone.json"));

    let _ = std::fs::remove_dir_all(&dir);
}

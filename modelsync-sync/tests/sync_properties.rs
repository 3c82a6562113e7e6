use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{Local, NaiveDate, NaiveDateTime};
use filetime::{set_file_mtime, FileTime};
use modelsync_core::{manifest, CategoryName};
use modelsync_sync::{
    cleanup,
    pipeline::{run, run_at},
    sync_all, sync_best, CleanupReport, CopyOutcome, ManifestUpdate, SyncConfig, SyncMode,
};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 29)
        .expect("date")
        .and_hms_opt(8, 15, 42)
        .expect("time")
}

/// Source root with categories `A` (best `model_001.json`) and `B`
/// (best `model_002.json`).
fn ab_source() -> TempDir {
    let src = TempDir::new().expect("src");
    write(
        &src.path().join("best_models.json"),
        r#"{
  "A": {"model_file": "model_001.json", "date": "2024-01-01", "time": "10:00:00"},
  "B": {"model_file": "model_002.json", "date": "2024-01-02", "time": "11:00:00"}
}
"#,
    );
    write(&src.path().join("A").join("model_001.json"), r#"{"w":1}"#);
    write(&src.path().join("B").join("model_002.json"), r#"{"w":2}"#);
    src
}

/// Every file under `root` with its bytes.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut out = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).expect("read_dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.insert(path.clone(), fs::read(&path).expect("read"));
            }
        }
    }
    out
}

#[test]
fn end_to_end_best_sync_into_empty_destination() {
    let src = ab_source();
    let dst = TempDir::new().expect("dst");
    let dest_root = dst.path().join("public").join("models");

    let report = run_at(&SyncConfig::new(src.path(), &dest_root), fixed_now()).expect("run");
    assert_eq!(report.synced_count(), 2);
    assert!(matches!(report.manifest, ManifestUpdate::Written(_)));

    assert_eq!(
        fs::read_to_string(dest_root.join("A").join("model_001.json")).unwrap(),
        r#"{"w":1}"#
    );
    assert_eq!(
        fs::read_to_string(dest_root.join("B").join("model_002.json")).unwrap(),
        r#"{"w":2}"#
    );

    let written = manifest::load_at(&dest_root).unwrap().expect("manifest");
    assert_eq!(written.len(), 2);
    let a = written.get(&CategoryName::from("A")).unwrap();
    assert_eq!(a.model_file, "model_001.json");
    assert_eq!(a.date, "2024-02-29");
    assert_eq!(a.time, "08:15:42");
    let b = written.get(&CategoryName::from("B")).unwrap();
    assert_eq!(b.model_file, "model_002.json");
    assert_eq!((b.date.as_str(), b.time.as_str()), ("2024-02-29", "08:15:42"));
}

#[test]
fn live_run_stamps_todays_date() {
    let src = ab_source();
    let dst = TempDir::new().expect("dst");
    let before = Local::now().date_naive().format("%Y-%m-%d").to_string();

    run(&SyncConfig::new(src.path(), dst.path())).expect("run");

    let after = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let written = manifest::load_at(dst.path()).unwrap().unwrap();
    let date = written.get(&CategoryName::from("A")).unwrap().date;
    assert!(date == before || date == after, "unexpected date {date}");
}

#[test]
fn second_best_sync_copies_nothing() {
    let src = ab_source();
    let dst = TempDir::new().expect("dst");

    let first = sync_best(src.path(), dst.path(), false, false);
    assert_eq!(first.copied_count(), 2);

    let second = sync_best(src.path(), dst.path(), false, false);
    assert_eq!(second.copied_count(), 0);
    assert!(second.outcomes().all(|o| o == CopyOutcome::UpToDate));
}

#[test]
fn identical_content_with_different_mtime_is_up_to_date() {
    let src = ab_source();
    let dst = TempDir::new().expect("dst");
    let dest_file = dst.path().join("A").join("model_001.json");
    write(&dest_file, r#"{"w":1}"#);
    let old = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(7 * 24 * 60 * 60));
    set_file_mtime(&dest_file, old).expect("set mtime");

    for overwrite in [false, true] {
        let report = sync_best(src.path(), dst.path(), overwrite, false);
        let a_outcome = report
            .events
            .iter()
            .find_map(|e| match e {
                modelsync_sync::SyncEvent::Copy {
                    category, outcome, ..
                } if category.as_str() == "A" => Some(*outcome),
                _ => None,
            })
            .expect("A processed");
        assert_eq!(a_outcome, CopyOutcome::UpToDate, "overwrite={overwrite}");
    }
    let mtime = FileTime::from_last_modification_time(&fs::metadata(&dest_file).unwrap());
    assert_eq!(mtime, old, "identical file must not be rewritten");
}

#[test]
fn overwrite_gate() {
    let src = ab_source();
    let dst = TempDir::new().expect("dst");
    let dest_file = dst.path().join("A").join("model_001.json");
    write(&dest_file, r#"{"w":"stale"}"#);

    let gated = sync_best(src.path(), dst.path(), false, false);
    assert!(!gated.synced.contains_key(&CategoryName::from("A")));
    assert!(gated.outcomes().any(|o| o == CopyOutcome::SkippedDiffers));
    assert_eq!(fs::read_to_string(&dest_file).unwrap(), r#"{"w":"stale"}"#);

    let forced = sync_best(src.path(), dst.path(), true, false);
    assert_eq!(forced.synced[&CategoryName::from("A")], "model_001.json");
    assert_eq!(fs::read_to_string(&dest_file).unwrap(), r#"{"w":1}"#);
}

#[test]
fn cleanup_preserves_best_and_deletes_rest() {
    let dst = TempDir::new().expect("dst");
    write(
        &dst.path().join("best_models.json"),
        r#"{"A": {"model_file": "model_003.json"}, "B": {"model_file": "model_010.json"}}"#,
    );
    for name in ["model_001.json", "model_002.json", "model_003.json", "README.md"] {
        write(&dst.path().join("A").join(name), name);
    }
    for name in ["model_009.json", "model_010.json", "weights.bin"] {
        write(&dst.path().join("B").join(name), name);
    }

    let CleanupReport::Swept(sweep) = cleanup(dst.path(), false) else {
        panic!("expected a sweep");
    };
    assert_eq!(sweep.protected, 2);
    assert_eq!(sweep.deleted.len(), 3);
    assert!(sweep.failures.is_empty());

    let a = dst.path().join("A");
    let b = dst.path().join("B");
    assert!(!a.join("model_001.json").exists());
    assert!(!a.join("model_002.json").exists());
    assert!(a.join("model_003.json").exists());
    assert!(a.join("README.md").exists());
    assert!(!b.join("model_009.json").exists());
    assert!(b.join("model_010.json").exists());
    assert!(b.join("weights.bin").exists());
}

#[test]
fn cleanup_deletes_files_of_categories_missing_from_manifest() {
    let dst = TempDir::new().expect("dst");
    write(&dst.path().join("best_models.json"), r#"{}"#);
    write(&dst.path().join("Gone").join("model_001.json"), "1");

    let CleanupReport::Swept(sweep) = cleanup(dst.path(), false) else {
        panic!("expected a sweep");
    };
    assert_eq!(sweep.deleted, vec![dst.path().join("Gone").join("model_001.json")]);
}

#[test]
fn dry_run_has_no_side_effects() {
    let src = ab_source();
    write(&src.path().join("A").join("model_000.json"), r#"{"w":0}"#);
    let dst = TempDir::new().expect("dst");
    write(
        &dst.path().join("best_models.json"),
        r#"{"A": {"model_file": "model_old.json", "date": "2023-01-01", "time": "00:00:00"}}"#,
    );
    write(&dst.path().join("A").join("model_old.json"), "old");
    write(&dst.path().join("B").join("model_002.json"), "differs");

    for mode in [SyncMode::Best, SyncMode::All] {
        for overwrite in [false, true] {
            let before = snapshot(dst.path());
            let config = SyncConfig {
                mode,
                overwrite,
                dry_run: true,
                cleanup: true,
                ..SyncConfig::new(src.path(), dst.path())
            };
            let report = run_at(&config, fixed_now()).expect("dry run");
            assert!(matches!(report.manifest, ManifestUpdate::WouldWrite(_)));
            assert_eq!(snapshot(dst.path()), before, "mode={mode:?} overwrite={overwrite}");
        }
    }
}

#[test]
fn dry_run_reports_the_same_decisions_as_live_run() {
    let src = ab_source();
    let dry_dst = TempDir::new().expect("dry");
    let live_dst = TempDir::new().expect("live");
    for root in [dry_dst.path(), live_dst.path()] {
        write(&root.join("B").join("model_002.json"), "differs");
        write(&root.join("B").join("model_001.json"), "stale");
    }

    let mut config = SyncConfig::new(src.path(), dry_dst.path());
    config.cleanup = true;
    config.dry_run = true;
    let dry = run_at(&config, fixed_now()).expect("dry");

    config.dest_root = live_dst.path().to_path_buf();
    config.dry_run = false;
    let live = run_at(&config, fixed_now()).expect("live");

    assert_eq!(dry.sync.synced, live.sync.synced);
    let copied = |o: CopyOutcome| o.copied();
    assert_eq!(
        dry.sync.outcomes().map(copied).collect::<Vec<_>>(),
        live.sync.outcomes().map(copied).collect::<Vec<_>>()
    );
    assert_eq!(
        dry.manifest.change().map(|c| c.manifest.clone()),
        live.manifest.change().map(|c| c.manifest.clone())
    );

    let (Some(CleanupReport::Swept(dry_sweep)), Some(CleanupReport::Swept(live_sweep))) =
        (&dry.cleanup, &live.cleanup)
    else {
        panic!("both runs should sweep");
    };
    let names = |paths: &[PathBuf]| -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    };
    assert_eq!(names(&dry_sweep.would_delete), names(&live_sweep.deleted));
}

#[test]
fn sync_all_last_match_wins() {
    let src = TempDir::new().expect("src");
    let dst = TempDir::new().expect("dst");
    write(&src.path().join("C").join("model_001.json"), "1");
    write(&src.path().join("C").join("model_002.json"), "2");

    let report = sync_all(src.path(), dst.path(), false, false);
    assert_eq!(report.synced[&CategoryName::from("C")], "model_002.json");
}

#[test]
fn all_mode_with_cleanup_keeps_only_latest() {
    let src = TempDir::new().expect("src");
    let dst = TempDir::new().expect("dst");
    for name in ["model_001.json", "model_002.json", "model_003.json"] {
        write(&src.path().join("C").join(name), name);
    }

    let config = SyncConfig {
        mode: SyncMode::All,
        cleanup: true,
        ..SyncConfig::new(src.path(), dst.path())
    };
    run_at(&config, fixed_now()).expect("run");

    let c = dst.path().join("C");
    assert!(!c.join("model_001.json").exists());
    assert!(!c.join("model_002.json").exists());
    assert!(c.join("model_003.json").exists());
    let written = manifest::load_at(dst.path()).unwrap().unwrap();
    assert_eq!(
        written.get(&CategoryName::from("C")).unwrap().model_file,
        "model_003.json"
    );
}

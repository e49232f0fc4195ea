//! End-to-end pipeline tests.
//!
//! These tests run the full enumerate, sort, plan, partition and invoke
//! sequence against temporary directories. The archiver is replaced by a
//! recording invoker unless a test needs a real process.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use partzip::{
    AutoConfirm, CancelFlag, Config, ConfirmFn, Error, FallbackPolicy, InvocationStatus,
    NoProgress, Pipeline, RunStatus, SplitMode, StatisticsProgress, VolumeThreshold,
};

mod common;

use common::{MB, RecordingInvoker, create_file, file_names, source_dir};

fn numbered_files(count: usize, size: u64) -> Vec<(String, u64)> {
    (1..=count).map(|i| (format!("clip{}.mp4", i), size)).collect()
}

fn as_refs(files: &[(String, u64)]) -> Vec<(&str, u64)> {
    files.iter().map(|(n, s)| (n.as_str(), *s)).collect()
}

// =============================================================================
// Planning
// =============================================================================

#[test]
fn test_standalone_plan_of_1000_mb() {
    let files = numbered_files(10, 100 * MB);
    let temp = source_dir(&as_refs(&files));
    let config = Config::builder(temp.path())
        .mode(SplitMode::Standalone)
        .max_split_mb(300)
        .build()
        .unwrap();
    let pipeline = Pipeline::new(config);
    let mut invoker = RecordingInvoker::new();

    let report = pipeline
        .run(&mut invoker, &mut AutoConfirm, &mut NoProgress)
        .unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    let plan = report.plan.as_ref().unwrap();
    assert_eq!(plan.total_mb, 1000);
    assert_eq!(plan.split.part_count, 4);
    assert_eq!(plan.split.part_size_mb, 250);

    let groups: Vec<Vec<String>> = invoker
        .requests
        .iter()
        .map(|r| file_names(&r.files))
        .collect();
    assert_eq!(
        groups,
        vec![
            vec!["clip1.mp4", "clip2.mp4", "clip3.mp4"],
            vec!["clip4.mp4", "clip5.mp4", "clip6.mp4"],
            vec!["clip7.mp4", "clip8.mp4", "clip9.mp4"],
            vec!["clip10.mp4"],
        ]
    );

    let source = pipeline.config().source_dir().display().to_string();
    let destinations: Vec<_> = invoker.requests.iter().map(|r| r.destination.clone()).collect();
    assert_eq!(
        destinations,
        (1..=4)
            .map(|n| PathBuf::from(format!("{} - Part {}.zip", source, n)))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_volume_plan_of_1000_mb() {
    let files = numbered_files(10, 100 * MB);
    let temp = source_dir(&as_refs(&files));
    let config = Config::builder(temp.path()).max_split_mb(300).build().unwrap();
    let pipeline = Pipeline::new(config);
    let mut invoker = RecordingInvoker::new();

    pipeline
        .run(&mut invoker, &mut AutoConfirm, &mut NoProgress)
        .unwrap();

    assert_eq!(invoker.requests.len(), 1);
    let request = &invoker.requests[0];
    assert_eq!(request.volume, Some(VolumeThreshold::new(250)));
    assert_eq!(request.ordinal, None);
    assert_eq!(request.files.len(), 10);
    assert_eq!(request.total_bytes, 1000 * MB);
    assert_eq!(
        request.destination,
        PathBuf::from(format!("{}.zip", pipeline.config().source_dir().display()))
    );
}

#[test]
fn test_small_set_is_one_archive() {
    let temp = source_dir(&[("a.txt", 10 * MB)]);
    let config = Config::builder(temp.path())
        .mode(SplitMode::Standalone)
        .build()
        .unwrap();

    let plan = Pipeline::new(config).plan().unwrap();

    assert_eq!(plan.total_mb, 10);
    assert_eq!(plan.split.part_count, 1);
    assert_eq!(plan.split.part_size_mb, 10);
    assert_eq!(plan.requests.len(), 1);
}

#[test]
fn test_natural_order_across_subdirectories() {
    let temp = source_dir(&[
        ("ep10.mkv", 1),
        ("season/ep2.mkv", 1),
        ("ep1.mkv", 1),
        ("notes.txt", 1),
        ("season/deeper/ep3.MKV", 1),
    ]);
    let config = Config::builder(temp.path())
        .recursive(true)
        .extensions("mkv,")
        .build()
        .unwrap();

    let plan = Pipeline::new(config).plan().unwrap();

    assert_eq!(plan.file_count, 4);
    assert_eq!(
        file_names(&plan.requests[0].files),
        ["ep1.mkv", "ep2.mkv", "ep3.MKV", "ep10.mkv"]
    );
}

#[test]
fn test_flat_enumeration_ignores_subdirectories() {
    let temp = source_dir(&[("top.bin", 1), ("sub/inner.bin", 1)]);
    let config = Config::builder(temp.path()).build().unwrap();

    let plan = Pipeline::new(config).plan().unwrap();

    assert_eq!(file_names(&plan.requests[0].files), ["top.bin"]);
}

#[test]
fn test_no_matching_files_is_nothing_to_do() {
    let temp = source_dir(&[("a.txt", 1), ("b.txt", 1)]);
    let config = Config::builder(temp.path())
        .extensions("mp4")
        .build()
        .unwrap();
    let mut invoker = RecordingInvoker::new();

    let report = Pipeline::new(config)
        .run(&mut invoker, &mut AutoConfirm, &mut NoProgress)
        .unwrap();

    assert_eq!(report.status, RunStatus::NothingToDo);
    assert_eq!(report.invocations(), 0);
    assert!(invoker.requests.is_empty());
}

#[test]
fn test_lenient_fallback_reports_warning() {
    let temp = source_dir(&[("big.iso", 25 * MB)]);
    let config = Config::builder(temp.path())
        .mode(SplitMode::Standalone)
        .max_split_mb(1)
        .build()
        .unwrap();
    let mut invoker = RecordingInvoker::new();
    let mut progress = StatisticsProgress::new();

    let report = Pipeline::new(config)
        .run(&mut invoker, &mut AutoConfirm, &mut progress)
        .unwrap();

    let plan = report.plan.unwrap();
    assert_eq!(plan.split.part_count, 1);
    assert_eq!(plan.split.part_size_mb, 25);
    assert!(plan.exceeds_maximum());
    assert_eq!(progress.warnings.len(), 1);
}

#[test]
fn test_strict_fallback_fails_before_invoking() {
    let temp = source_dir(&[("big.iso", 25 * MB)]);
    let config = Config::builder(temp.path())
        .max_split_mb(1)
        .fallback(FallbackPolicy::Strict)
        .build()
        .unwrap();
    let mut invoker = RecordingInvoker::new();

    let err = Pipeline::new(config)
        .run(&mut invoker, &mut AutoConfirm, &mut NoProgress)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::SizeConstraint {
            total_mb: 25,
            max_split_mb: 1,
            ..
        }
    ));
    assert!(invoker.requests.is_empty());
}

// =============================================================================
// Invocation sequencing
// =============================================================================

fn standalone_pipeline(temp: &tempfile::TempDir) -> Pipeline {
    let config = Config::builder(temp.path())
        .mode(SplitMode::Standalone)
        .max_split_mb(2)
        .build()
        .unwrap();
    Pipeline::new(config)
}

#[test]
fn test_confirmation_asked_between_invocations() {
    // 6 MB in parts of at most 2 MB: three archives.
    let temp = source_dir(&[("a", 2 * MB), ("b", 2 * MB), ("c", 2 * MB)]);
    let pipeline = standalone_pipeline(&temp);
    let mut invoker = RecordingInvoker::new();
    let asked = Arc::new(Mutex::new(Vec::new()));
    let asked_log = Arc::clone(&asked);
    let mut confirm = ConfirmFn::new(move |next: &partzip::ArchiveRequest| {
        asked_log.lock().unwrap().push(next.ordinal);
        true
    });

    let report = pipeline
        .run(&mut invoker, &mut confirm, &mut NoProgress)
        .unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.invocations(), 3);
    assert_eq!(*asked.lock().unwrap(), vec![Some(2), Some(3)]);
}

#[test]
fn test_declining_stops_the_run() {
    let temp = source_dir(&[("a", 2 * MB), ("b", 2 * MB), ("c", 2 * MB)]);
    let pipeline = standalone_pipeline(&temp);
    let mut invoker = RecordingInvoker::new();
    let mut confirm = ConfirmFn::new(|_: &partzip::ArchiveRequest| false);

    let report = pipeline
        .run(&mut invoker, &mut confirm, &mut NoProgress)
        .unwrap();

    assert_eq!(report.status, RunStatus::Declined);
    assert_eq!(invoker.requests.len(), 1);
    assert!(!report.is_ok());
}

#[test]
fn test_cancel_between_invocations() {
    let temp = source_dir(&[("a", 2 * MB), ("b", 2 * MB), ("c", 2 * MB)]);
    let cancel = CancelFlag::new();
    let pipeline = standalone_pipeline(&temp).with_cancel(cancel.clone());
    let mut invoker = RecordingInvoker::new();
    // Simulates Ctrl+C arriving while the prompt is shown.
    let mut confirm = ConfirmFn::new(move |_: &partzip::ArchiveRequest| {
        cancel.cancel();
        true
    });

    let report = pipeline
        .run(&mut invoker, &mut confirm, &mut NoProgress)
        .unwrap();

    assert_eq!(report.status, RunStatus::Cancelled);
    assert_eq!(invoker.requests.len(), 1);
}

#[test]
fn test_archiver_failures_are_reported_not_fatal() {
    let temp = source_dir(&[("a", 2 * MB), ("b", 2 * MB), ("c", 2 * MB)]);
    let pipeline = standalone_pipeline(&temp);
    let mut invoker = RecordingInvoker::with_exit_codes(&[0, 2, 0]);
    let mut progress = StatisticsProgress::new();

    let report = pipeline
        .run(&mut invoker, &mut AutoConfirm, &mut progress)
        .unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.invocations(), 3);
    assert_eq!(report.failures(), 1);
    assert_eq!(report.outcomes[1].status, InvocationStatus::Exited(Some(2)));
    assert_eq!(progress.archives_started, 3);
    assert_eq!(progress.archives_failed, 1);
    assert_eq!(progress.bytes_submitted, 6 * MB);
    assert_eq!(progress.warnings.len(), 1);
}

#[test]
fn test_dry_run_never_prompts() {
    let temp = source_dir(&[("a", 2 * MB), ("b", 2 * MB), ("c", 2 * MB)]);
    let config = Config::builder(temp.path())
        .mode(SplitMode::Standalone)
        .max_split_mb(2)
        .tool(partzip::ToolLocator::Explicit(PathBuf::from("/nonexistent/7z")))
        .dry_run(true)
        .build()
        .unwrap();
    let pipeline = Pipeline::new(config);
    let mut invoker = pipeline.config().invoker();
    let mut confirm = ConfirmFn::new(|_: &partzip::ArchiveRequest| -> bool {
        panic!("dry runs must not ask for confirmation")
    });

    let report = pipeline
        .run(&mut invoker, &mut confirm, &mut NoProgress)
        .unwrap();

    assert_eq!(report.invocations(), 3);
    assert!(report.outcomes.iter().all(|o| o.status == InvocationStatus::DryRun));
    let first = report.outcomes[0].command.to_string();
    assert!(first.starts_with("/nonexistent/7z a "));
    assert!(first.contains("Part 1.zip"));
}

// =============================================================================
// Real processes
// =============================================================================

#[cfg(unix)]
fn write_script(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
    path
}

// The scenarios share one test so that no other test thread forks while a
// script is still open for writing.
#[cfg(unix)]
#[test]
fn test_scripted_archiver() {
    use std::time::Duration;

    let tools = tempfile::TempDir::new().unwrap();
    let log = tools.path().join("calls.log");
    let recorder = write_script(
        tools.path(),
        "fake7z",
        &format!("echo \"$@\" >> '{}'", log.display()),
    );
    let sleeper = write_script(tools.path(), "slow7z", "exec sleep 5");
    let list_log = tools.path().join("list.log");
    let list_copy = tools.path().join("list.copy");
    let lister = write_script(
        tools.path(),
        "list7z",
        &format!(
            "echo \"$@\" >> '{}'\nfor arg in \"$@\"; do\n  case \"$arg\" in\n    @*) cp \"${{arg#@}}\" '{}' ;;\n  esac\ndone",
            list_log.display(),
            list_copy.display()
        ),
    );

    let temp = source_dir(&[("a.bin", 2 * MB), ("b.bin", 2 * MB), ("c.bin", 2 * MB)]);
    let config = Config::builder(temp.path())
        .mode(SplitMode::Volume)
        .max_split_mb(2)
        .tool(partzip::ToolLocator::Explicit(recorder))
        .build()
        .unwrap();
    let pipeline = Pipeline::new(config);
    let mut invoker = pipeline.config().invoker();

    let report = pipeline
        .run(&mut invoker, &mut AutoConfirm, &mut NoProgress)
        .unwrap();

    assert!(report.is_ok());
    assert_eq!(report.outcomes[0].status, InvocationStatus::Exited(Some(0)));
    let calls = std::fs::read_to_string(&log).unwrap();
    let line = calls.lines().next().unwrap();
    assert!(line.starts_with("a "));
    assert!(line.ends_with(" -v2m"));
    assert!(line.contains("a.bin"));
    assert!(line.contains("c.bin"));

    let config = Config::builder(temp.path())
        .tool(partzip::ToolLocator::Explicit(sleeper))
        .timeout(Some(Duration::from_millis(200)))
        .build()
        .unwrap();
    let pipeline = Pipeline::new(config);
    let mut invoker = pipeline.config().invoker();

    let err = pipeline
        .run(&mut invoker, &mut AutoConfirm, &mut NoProgress)
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));

    // 12 000 paths of about 200 bytes exceed the kernel's argument limit.
    let many = tempfile::TempDir::new().unwrap();
    let pad = "x".repeat(180);
    for i in (1..=12_000).rev() {
        create_file(many.path(), &format!("{}-{}.bin", i, pad), 1);
    }
    let config = Config::builder(many.path())
        .tool(partzip::ToolLocator::Explicit(lister))
        .build()
        .unwrap();
    let pipeline = Pipeline::new(config);
    let mut invoker = pipeline.config().invoker();

    let report = pipeline
        .run(&mut invoker, &mut AutoConfirm, &mut NoProgress)
        .unwrap();

    assert!(report.is_ok());
    let plan = report.plan.as_ref().unwrap();
    assert_eq!(plan.file_count, 12_000);
    let call = std::fs::read_to_string(&list_log).unwrap();
    assert!(call.trim_end().contains(" -scsUTF-8 -v1m @"));
    let listed: Vec<PathBuf> = std::fs::read_to_string(&list_copy)
        .unwrap()
        .lines()
        .map(PathBuf::from)
        .collect();
    assert_eq!(listed, plan.requests[0].files);
    assert_eq!(
        file_names(&listed[..2]),
        [format!("1-{}.bin", pad), format!("2-{}.bin", pad)]
    );
}

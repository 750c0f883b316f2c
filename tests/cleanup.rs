use energia_tools::cleanup::{EntryKind, Manifest};
use energia_tools::cli::{run_cleanup, CleanupCli, EXIT_DECLINED};
use clap::Parser;
use std::fs;
use std::io::Cursor;
use std::path::Path;

fn args(root: &Path, extra: &[&str]) -> CleanupCli {
    let mut argv = vec![
        "energia-cleanup".to_string(),
        "--project-root".to_string(),
        root.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    CleanupCli::try_parse_from(argv).unwrap()
}

fn run(root: &Path, answer: &str, extra: &[&str]) -> (i32, String) {
    let mut input = Cursor::new(answer.as_bytes().to_vec());
    let mut out = Vec::new();
    let code = run_cleanup(&args(root, extra), &mut input, &mut out, false).unwrap();
    (code, String::from_utf8(out).unwrap())
}

/// Create every manifest target plus files the cleanup must leave alone.
fn populate(root: &Path) {
    for entry in Manifest::builtin().entries {
        let path = root.join(&entry.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        match entry.kind {
            EntryKind::File => fs::write(&path, b"stale").unwrap(),
            EntryKind::Directory => {
                fs::create_dir_all(path.join("nested")).unwrap();
                fs::write(path.join("nested/file.txt"), b"stale").unwrap();
            }
        }
    }
    fs::create_dir_all(root.join("venv/bin")).unwrap();
    fs::write(root.join("venv/bin/python"), b"").unwrap();
    fs::create_dir_all(root.join("venv/lib/__pycache__")).unwrap();
    fs::write(root.join("adatfeldolgozo.py"), b"").unwrap();
    fs::write(root.join("energia_monitor_ctk.py"), b"").unwrap();
    fs::create_dir_all(root.join("core/__pycache__")).unwrap();
    fs::write(root.join("core/__pycache__/file_processor.cpython-312.pyc"), b"").unwrap();
    fs::write(root.join("core/file_processor.py"), b"").unwrap();
    fs::create_dir_all(root.join("__pycache__")).unwrap();
    fs::create_dir_all(root.join("export")).unwrap();
    fs::write(root.join("export/riport.pdf"), b"pdf").unwrap();
}

#[test]
fn declining_changes_nothing() {
    for answer in ["n\n", "\n", "yes\n", ""] {
        let tmp = tempfile::tempdir().unwrap();
        populate(tmp.path());

        let (code, out) = run(tmp.path(), answer, &[]);
        assert_eq!(code, EXIT_DECLINED, "answer {answer:?}");
        assert!(out.contains("Aborted"));
        for entry in Manifest::builtin().entries {
            assert!(tmp.path().join(&entry.path).exists(), "{:?}", entry.path);
        }
        assert!(tmp.path().join("export").is_dir());
        assert!(tmp.path().join("core/__pycache__").is_dir());
    }
}

#[test]
fn confirming_removes_every_manifest_target() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    populate(root);

    let (code, out) = run(root, "i\n", &[]);
    assert_eq!(code, 0, "{out}");

    for entry in Manifest::builtin().entries {
        assert!(
            fs::symlink_metadata(root.join(&entry.path)).is_err(),
            "{:?} should be gone",
            entry.path
        );
    }
    // Legacy export moved aside, not deleted.
    assert!(!root.join("export").exists());
    assert_eq!(fs::read(root.join("exports_regi/riport.pdf")).unwrap(), b"pdf");
    // Caches swept at any depth.
    assert!(!root.join("__pycache__").exists());
    assert!(!root.join("core/__pycache__").exists());
    assert!(!root.join("venv/lib/__pycache__").exists());
    // Runtime files untouched.
    assert!(root.join("venv/bin/python").is_file());
    assert!(root.join("adatfeldolgozo.py").is_file());
    assert!(root.join("energia_monitor_ctk.py").is_file());
    assert!(root.join("core/file_processor.py").is_file());

    assert!(out.contains("Removing build artifacts..."));
    assert!(out.contains("Renaming export to exports_regi..."));
    assert!(out.contains("Cleanup finished."));
}

#[test]
fn uppercase_confirmation_is_accepted() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("build")).unwrap();
    let (code, _) = run(tmp.path(), "I\n", &[]);
    assert_eq!(code, 0);
    assert!(!tmp.path().join("build").exists());
}

#[test]
fn second_run_is_a_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    populate(tmp.path());
    let (first, _) = run(tmp.path(), "i\n", &[]);
    assert_eq!(first, 0);

    let (second, out) = run(tmp.path(), "i\n", &[]);
    assert_eq!(second, 0);
    let total = Manifest::builtin().entries.len();
    assert!(out.contains(&format!("Removed: 0 item(s), {total} already absent")));
    assert!(tmp.path().join("exports_regi/riport.pdf").is_file());
}

#[test]
fn existing_destination_keeps_export_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir(root.join("export")).unwrap();
    fs::write(root.join("export/new.xlsx"), b"new").unwrap();
    fs::create_dir(root.join("exports_regi")).unwrap();
    fs::write(root.join("exports_regi/old.xlsx"), b"old").unwrap();

    let (code, out) = run(root, "i\n", &[]);
    assert_eq!(code, 0);
    assert_eq!(fs::read(root.join("export/new.xlsx")).unwrap(), b"new");
    assert_eq!(fs::read(root.join("exports_regi/old.xlsx")).unwrap(), b"old");
    assert!(!root.join("exports_regi/new.xlsx").exists());
    assert!(!root.join("exports_regi/export").exists());
    assert!(!out.contains("Renaming"));
}

#[test]
fn json_report_follows_completion_banner() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("dist")).unwrap();
    fs::create_dir(tmp.path().join("export")).unwrap();

    let (code, out) = run(tmp.path(), "i\n", &["--json"]);
    assert_eq!(code, 0);
    let (_, json) = out.split_once("Cleanup finished.\n").unwrap();
    let report: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(report["manifest"], "energia-cleanup");
    assert_eq!(report["removed"], serde_json::json!(["dist"]));
    assert_eq!(report["renames"][0]["outcome"], "renamed");
    assert_eq!(report["failures"], serde_json::json!([]));
}

#[test]
fn unremovable_target_yields_partial_exit() {
    let tmp = tempfile::tempdir().unwrap();
    // A directory where a file is declared cannot be removed as a file.
    fs::create_dir(tmp.path().join("nohup.out")).unwrap();
    fs::create_dir(tmp.path().join("build")).unwrap();

    let (code, out) = run(tmp.path(), "i\n", &[]);
    assert_eq!(code, energia_tools::cli::EXIT_PARTIAL);
    assert!(out.contains("Failed: 1 item(s)"));
    assert!(out.contains("nohup.out"));
    assert!(!tmp.path().join("build").exists());
}

#[test]
fn custom_manifest_file_is_honoured() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir(root.join("scratch")).unwrap();
    fs::create_dir(root.join("build")).unwrap();
    let manifest = root.join("manifest.json");
    fs::write(
        &manifest,
        r#"{"name":"custom","version":1,"entries":[{"category":"temporary_data","path":"scratch","kind":"directory"}]}"#,
    )
    .unwrap();

    let (code, _) = run(root, "i\n", &["--manifest", manifest.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(!root.join("scratch").exists());
    assert!(root.join("build").exists());
}

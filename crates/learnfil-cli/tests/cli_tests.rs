//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn learnfil(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("learnfil").unwrap();
    cmd.current_dir(dir)
        .env_remove("LEARNFIL_DATA_DIR")
        .env_remove("LEARNFIL_USER")
        .env("HOME", dir);
    cmd
}

/// A workspace with a config pointing at a local data dir and no result delay.
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("learnfil.toml"),
        "data_dir = \"data\"\nuser_id = \"ada\"\ndisplay_name = \"Ada\"\nresult_delay_ms = 0\n",
    )
    .unwrap();
    dir
}

const HELLO_FVM: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.17;

contract HelloFVM {
    function greet() public pure returns (string memory) {
        return "Hello, Filecoin!";
    }
}
"#;

#[test]
fn help_and_version() {
    let dir = TempDir::new().unwrap();
    learnfil(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("certificate"))
        .stdout(predicate::str::contains("bookmark"));
    learnfil(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("learnfil"));
}

#[test]
fn init_creates_config_and_seeds() {
    let dir = TempDir::new().unwrap();

    learnfil(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created learnfil.toml"))
        .stdout(predicate::str::contains("Seeded 3 modules"))
        .stdout(predicate::str::contains("Seeded 9 lessons"));

    assert!(dir.path().join("learnfil.toml").exists());
    assert!(dir.path().join("learnfil-data/learnfil_modules.json").exists());
    assert!(dir.path().join("learnfil-data/learnfil_lessons.json").exists());

    learnfil(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("nothing seeded"));
}

#[test]
fn init_from_custom_curriculum() {
    let dir = workspace();
    let curriculum = dir.path().join("custom.toml");
    std::fs::write(
        &curriculum,
        r##"
[[modules]]
id = "m1"
title = "Only Module"

[[lessons]]
id = "l1"
module_id = "m1"
title = "Only Lesson"
content = "# Only Lesson\nRead me."
"##,
    )
    .unwrap();

    learnfil(dir.path())
        .args(["init", "--curriculum", "custom.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 1 modules"));

    learnfil(dir.path())
        .arg("modules")
        .assert()
        .success()
        .stdout(predicate::str::contains("Only Module"))
        .stdout(predicate::str::contains("Filecoin Fundamentals").not());
}

#[test]
fn modules_lists_builtin_curriculum() {
    let dir = workspace();
    learnfil(dir.path())
        .arg("modules")
        .assert()
        .success()
        .stdout(predicate::str::contains("filecoin-fundamentals"))
        .stdout(predicate::str::contains("storage-and-retrieval"))
        .stdout(predicate::str::contains("fvm-smart-contracts"));
}

#[test]
fn lessons_and_show() {
    let dir = workspace();
    learnfil(dir.path())
        .args(["lessons", "--module", "fvm-smart-contracts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-fvm"))
        .stdout(predicate::str::contains("fil-units"));

    learnfil(dir.path())
        .args(["show", "--lesson", "hello-fvm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello, FVM"))
        .stdout(predicate::str::contains("SPDX-License-Identifier"))
        .stdout(predicate::str::contains("Declares the HelloFVM contract"))
        .stdout(predicate::str::contains("Next: FIL Units"));
}

#[test]
fn unknown_ids_fail() {
    let dir = workspace();
    learnfil(dir.path())
        .args(["lessons", "--module", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown module 'nope'"));
    learnfil(dir.path())
        .args(["show", "--lesson", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: unknown lesson 'nope'"));
}

#[test]
fn bookmark_toggles() {
    let dir = workspace();

    learnfil(dir.path())
        .args(["bookmark", "--lesson", "content-addressing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarked 'content-addressing'"));
    learnfil(dir.path())
        .arg("bookmarks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Content Addressing with CIDs"));

    learnfil(dir.path())
        .args(["bookmark", "--lesson", "content-addressing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed bookmark"));
    learnfil(dir.path())
        .arg("bookmarks")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookmarks."));
}

#[test]
fn run_solidity_lesson_records_completion() {
    let dir = workspace();
    std::fs::write(dir.path().join("hello.sol"), HELLO_FVM).unwrap();

    learnfil(dir.path())
        .args(["run", "--lesson", "hello-fvm", "--file", "hello.sol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[PASS] Declares a Solidity version"))
        .stdout(predicate::str::contains("3/3 tests passed"))
        .stdout(predicate::str::contains("Lesson 'hello-fvm' marked complete"));

    let progress = std::fs::read_to_string(dir.path().join("data/learnfil_progress.json")).unwrap();
    let progress: serde_json::Value = serde_json::from_str(&progress).unwrap();
    assert_eq!(progress["ada"]["hello-fvm"]["completed"], true);
    assert!(progress["ada"]["hello-fvm"]["code"]
        .as_str()
        .unwrap()
        .contains("contract HelloFVM"));

    learnfil(dir.path())
        .args(["run", "--lesson", "hello-fvm", "--file", "hello.sol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already complete"));
}

#[test]
fn failing_run_reports_messages() {
    let dir = workspace();
    std::fs::write(dir.path().join("partial.sol"), "pragma solidity ^0.8.0;\n").unwrap();

    learnfil(dir.path())
        .args(["run", "--lesson", "hello-fvm", "--file", "partial.sol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL] Declares the HelloFVM contract: Expected true, got false"))
        .stdout(predicate::str::contains("1/3 tests passed"))
        .stdout(predicate::str::contains("marked complete").not());

    assert!(!dir.path().join("data/learnfil_progress.json").exists());
}

#[test]
fn running_a_reading_lesson_completes_it() {
    let dir = workspace();
    std::fs::write(dir.path().join("notes.txt"), "// read it\n").unwrap();

    learnfil(dir.path())
        .args(["run", "--lesson", "what-is-filecoin", "--file", "notes.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No tests for this lesson"))
        .stdout(predicate::str::contains("0/0 tests passed"))
        .stdout(predicate::str::contains("Lesson 'what-is-filecoin' marked complete"))
        .stdout(predicate::str::contains("Next: Content Addressing with CIDs"));

    let progress = std::fs::read_to_string(dir.path().join("data/learnfil_progress.json")).unwrap();
    let progress: serde_json::Value = serde_json::from_str(&progress).unwrap();
    assert_eq!(progress["ada"]["what-is-filecoin"]["completed"], true);
}

#[test]
fn complete_and_progress() {
    let dir = workspace();

    learnfil(dir.path())
        .args(["complete", "--lesson", "what-is-filecoin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Filecoin Fundamentals: 1/3 lessons complete"));

    learnfil(dir.path())
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress for ada"))
        .stdout(predicate::str::contains("1/9"));

    let output = learnfil(dir.path())
        .args(["progress", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["user_id"], "ada");
    assert_eq!(view["track_complete"], false);
    assert_eq!(view["completed"][0]["lesson_id"], "what-is-filecoin");
    assert_eq!(view["modules"][0]["completed_lessons"], 1);
}

#[test]
fn progress_is_per_user() {
    let dir = workspace();
    learnfil(dir.path())
        .args(["complete", "--lesson", "what-is-filecoin"])
        .assert()
        .success();

    learnfil(dir.path())
        .env("LEARNFIL_USER", "grace")
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress for grace"))
        .stdout(predicate::str::contains("0/9"));
}

#[test]
fn validate_curriculum_files() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("dup.toml"),
        r#"
[[modules]]
id = "m1"
title = "Module"

[[lessons]]
id = "l1"
module_id = "m1"
title = "First"
order_index = 1

[[lessons]]
id = "l1"
module_id = "ghost"
title = "Second"
order_index = 1
"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.toml"), "[[modules]\nid = ").unwrap();

    learnfil(dir.path())
        .args(["validate", "--curriculum", "dup.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 modules, 2 lessons"))
        .stdout(predicate::str::contains("duplicate lesson ID"))
        .stdout(predicate::str::contains("warning(s) found"));

    learnfil(dir.path())
        .args(["validate", "--curriculum", "broken.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));

    learnfil(dir.path())
        .args(["validate", "--curriculum", "missing.toml"])
        .assert()
        .failure();
}

#[test]
fn certificate_requires_every_module() {
    let dir = workspace();
    learnfil(dir.path())
        .arg("certificate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("0/9 lessons complete"));
}

#[test]
fn certificate_after_track_complete() {
    let dir = workspace();
    let lessons = [
        "what-is-filecoin",
        "content-addressing",
        "storage-deal-cost",
        "storage-providers",
        "deal-proposal",
        "chunking-for-retrieval",
        "hello-fvm",
        "fil-units",
        "deal-status",
    ];
    for lesson in lessons {
        learnfil(dir.path())
            .args(["complete", "--lesson", lesson])
            .assert()
            .success();
    }

    learnfil(dir.path())
        .args(["certificate", "--wallet", "f1ada", "--output", "certs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("This certifies that Ada"))
        .stdout(predicate::str::contains("Wallet: f1ada"))
        .stdout(predicate::str::contains("Certificate written to"));

    let html = dir
        .path()
        .join("certs/certificate-learnfil-core-developer-track-ada.html");
    assert!(std::fs::read_to_string(html).unwrap().contains("Certificate of Completion"));
}

#[test]
fn explicit_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    learnfil(dir.path())
        .args(["modules", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

use fpscan::cli::{execute, Command};
use fpscan::config::{Backend, Settings};
use fpscan::enroll::EnrollPlan;
use fpscan::identify::IdentifyPlan;
use fpscan::reader::Priority;
use fpscan::retry::RetryPolicy;
use fpscan::session::{run_session, SessionConfig};
use fpscan::simulated::SimulatedSdk;
use fpscan::store::TemplateStore;
use fpscan::template::TemplateFormat;
use fpscan::ScanError;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn config(default_dir: &Path) -> SessionConfig {
    let retry = RetryPolicy {
        attempts: 3,
        timeout: Duration::from_millis(10),
    };

    SessionConfig {
        default_dir: default_dir.to_path_buf(),
        reader_index: 0,
        priority: Priority::Cooperative,
        capture: retry,
        enroll: EnrollPlan {
            captures: 2,
            retry,
        },
        identify: IdentifyPlan {
            retry,
            ..IdentifyPlan::default()
        },
        template_format: TemplateFormat::Raw,
    }
}

fn settings(dir: &Path) -> Settings {
    Settings {
        backend: Backend::Simulated,
        reader: 0,
        priority: Priority::Cooperative,
        database: dir.join("fingerprints.db"),
        output_dir: Some(dir.join("captures")),
        attempts: 2,
        timeout_ms: 10,
        enroll_captures: 2,
        threshold: fpscan::identify::DEFAULT_THRESHOLD,
        template_format: TemplateFormat::Text,
    }
}

fn session(sdk: &SimulatedSdk, store: &TemplateStore, config: &SessionConfig, input: &str) -> String {
    let mut input = Cursor::new(input.as_bytes().to_vec());
    let mut out = Vec::new();
    run_session(sdk, store, config, &mut input, &mut out).unwrap();

    String::from_utf8(out).unwrap()
}

#[test]
fn menu_captures_enrolls_and_identifies() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("prints");
    let store = TemplateStore::open_in_memory().unwrap();
    let input = format!("{}\n1\n2\nalice\n3\nq\n", target.display());

    let text = session(&SimulatedSdk::default(), &store, &config(dir.path()), &input);

    assert!(text.contains(&format!("Created directory: {}", target.display())));
    assert!(text.contains("[0] Simulated Fingerprint Reader"));
    assert!(target.join("fingerprint.png").exists());
    assert!(target.join("fingerprint.fmd").exists());
    assert!(text.contains("Fingerprint template for alice saved"));
    assert!(text.contains("Match found: alice"));
    assert!(text.ends_with("Done.\n"));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn blank_directory_uses_default_and_eof_quits() {
    let dir = tempfile::tempdir().unwrap();
    let store = TemplateStore::open_in_memory().unwrap();

    let text = session(&SimulatedSdk::default(), &store, &config(dir.path()), "\n1\n");

    assert!(dir.path().join("fingerprint.png").exists());
    assert!(text.ends_with("Done.\n"));
}

#[test]
fn invalid_choices_and_errors_keep_the_menu_running() {
    let dir = tempfile::tempdir().unwrap();
    let store = TemplateStore::open_in_memory().unwrap();

    let text = session(
        &SimulatedSdk::default(),
        &store,
        &config(dir.path()),
        "\n7\n2\n \n3\nquit\n",
    );

    assert!(text.contains("Invalid option '7'"));
    assert!(text.contains("Error: User name must not be blank"));
    assert!(text.contains("No enrolled fingerprints; no match."));
    assert!(text.ends_with("Done.\n"));
}

#[test]
fn session_stops_when_directory_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let store = TemplateStore::open_in_memory().unwrap();
    let input = format!("{}\n1\n", blocker.join("prints").display());

    let text = session(&SimulatedSdk::default(), &store, &config(dir.path()), &input);

    assert!(text.contains("Failed to create directory"));
    assert!(!text.contains("Using reader"));
    assert!(!text.ends_with("Done.\n"));
}

#[test]
fn session_without_readers_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = TemplateStore::open_in_memory().unwrap();
    let mut input = Cursor::new(b"\n".to_vec());
    let mut out = Vec::new();

    let result = run_session(
        &SimulatedSdk::new(Vec::new()),
        &store,
        &config(dir.path()),
        &mut input,
        &mut out,
    );

    assert!(matches!(result, Err(ScanError::NoReaders)));
}

#[test]
fn commands_enroll_list_identify_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    let sdk = SimulatedSdk::default().with_finger(4);

    let run = |command: Command| -> String {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        execute(Some(command), &settings, &sdk, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    };

    assert!(run(Command::Devices).contains("[0] Simulated Fingerprint Reader"));
    assert!(run(Command::Enroll {
        name: "dana".to_string()
    })
    .contains("saved"));
    assert_eq!(run(Command::Users), "dana (1 template(s))\n");
    assert!(run(Command::Identify).contains("Match found: dana"));

    let captured = run(Command::Capture { dir: None });
    assert!(captured.contains("Created directory"));
    assert!(captured.ends_with("Done.\n"));
    let captures: PathBuf = dir.path().join("captures");
    assert!(captures.join("fingerprint.fmd.txt").exists());

    assert_eq!(run(Command::Remove {
        name: "dana".to_string()
    }), "Removed 1 template(s) for dana.\n");
    assert_eq!(run(Command::Users), "No enrolled users.\n");
}

use fpscan::capture::{capture_to_directory, IMAGE_FILE};
use fpscan::enroll::{collect_and_build, enroll_user, EnrollPlan};
use fpscan::identify::{identify_user, Identification, IdentifyPlan};
use fpscan::reader::{
    open_reader, Candidate, Capture, CaptureStatus, ImageView, Priority, Reader, ReaderInfo,
    Sample,
};
use fpscan::retry::RetryPolicy;
use fpscan::simulated::{SimulatedReader, SimulatedSdk};
use fpscan::store::TemplateStore;
use fpscan::template::{Template, TemplateFormat};
use fpscan::{Operation, ScanError};
use std::time::Duration;

fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}

fn quick_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        attempts,
        timeout: Duration::from_millis(10),
    }
}

#[test]
fn capture_writes_png_and_raw_template() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = SimulatedReader::new("test").script(vec![CaptureStatus::TimedOut]);
    let mut out = Vec::new();

    let saved = capture_to_directory(
        &mut reader,
        &RetryPolicy::default(),
        dir.path(),
        TemplateFormat::Raw,
        &mut out,
    )
    .unwrap()
    .unwrap();

    let image_path = dir.path().join(IMAGE_FILE);
    assert_eq!(saved.image.as_deref(), Some(image_path.as_path()));
    let image = image::open(&image_path).unwrap().to_luma8();
    assert_eq!(image.dimensions(), (120, 160));

    let template_path = dir.path().join("fingerprint.fmd");
    assert_eq!(saved.template.as_deref(), Some(template_path.as_path()));
    let sample = reader
        .capture(Duration::from_secs(1))
        .unwrap()
        .into_sample()
        .unwrap();
    let expected = reader.extract(&sample).unwrap();
    assert_eq!(std::fs::read(&template_path).unwrap(), expected.as_bytes());

    let text = output(out);
    assert!(text.contains("Attempt 2 of 3"));
    assert!(text.contains("Fingerprint image saved to:"));
    assert!(text.contains("Fingerprint template saved to:"));
}

#[test]
fn capture_writes_text_template() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = SimulatedReader::new("test");
    let mut out = Vec::new();

    let saved = capture_to_directory(
        &mut reader,
        &RetryPolicy::default(),
        dir.path(),
        TemplateFormat::Text,
        &mut out,
    )
    .unwrap()
    .unwrap();

    let path = saved.template.unwrap();
    assert!(path.ends_with("fingerprint.fmd.txt"));
    let text = std::fs::read_to_string(path).unwrap();
    assert!(Template::from_text(&text).is_ok());
}

/// Hands out one fixed view and, unless told otherwise, a fixed template.
struct FixedReader {
    info: ReaderInfo,
    view: ImageView,
    extract_fails: bool,
}

impl FixedReader {
    fn new(view: ImageView, extract_fails: bool) -> Self {
        FixedReader {
            info: ReaderInfo {
                index: 0,
                name: "fixed".to_string(),
                description: "test reader".to_string(),
            },
            view,
            extract_fails,
        }
    }
}

impl Reader for FixedReader {
    fn info(&self) -> &ReaderInfo {
        &self.info
    }

    fn capture(&mut self, _timeout: Duration) -> fpscan::Result<Capture> {
        Ok(Capture {
            status: CaptureStatus::Good,
            sample: Some(Sample {
                views: vec![self.view.clone()],
                resolution: None,
            }),
        })
    }

    fn extract(&mut self, _sample: &Sample) -> fpscan::Result<Template> {
        if self.extract_fails {
            return Err(ScanError::Sdk {
                operation: Operation::Extraction,
                code: 0x05ba_000d,
            });
        }

        Template::new(vec![1, 2, 3])
    }

    fn create_enrollment(&mut self, templates: &[Template]) -> fpscan::Result<Template> {
        Ok(templates[0].clone())
    }

    fn identify(
        &mut self,
        _probe: &Template,
        _gallery: &[Template],
        _threshold: u32,
    ) -> fpscan::Result<Vec<Candidate>> {
        Ok(Vec::new())
    }
}

fn square_view(pixels: usize) -> ImageView {
    ImageView {
        width: 4,
        height: 4,
        pixels: vec![128; pixels],
    }
}

#[test]
fn invalid_image_still_saves_template() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = FixedReader::new(square_view(3), false);
    let mut out = Vec::new();

    let saved = capture_to_directory(
        &mut reader,
        &RetryPolicy::default(),
        dir.path(),
        TemplateFormat::Raw,
        &mut out,
    )
    .unwrap()
    .unwrap();

    assert!(saved.image.is_none());
    assert!(!dir.path().join(IMAGE_FILE).exists());
    let template_path = dir.path().join("fingerprint.fmd");
    assert_eq!(saved.template.as_deref(), Some(template_path.as_path()));
    assert_eq!(std::fs::read(template_path).unwrap(), vec![1, 2, 3]);

    let text = output(out);
    assert!(text.contains("Invalid fingerprint image data."));
    assert!(text.contains("Fingerprint template saved to:"));
}

#[test]
fn unwritable_image_still_saves_template() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(IMAGE_FILE)).unwrap();
    let mut reader = FixedReader::new(square_view(16), false);
    let mut out = Vec::new();

    let saved = capture_to_directory(
        &mut reader,
        &RetryPolicy::default(),
        dir.path(),
        TemplateFormat::Raw,
        &mut out,
    )
    .unwrap()
    .unwrap();

    assert!(saved.image.is_none());
    assert!(saved.template.is_some());
    assert!(output(out).contains("Failed to save fingerprint image:"));
}

#[test]
fn failed_extraction_still_saves_image() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = FixedReader::new(square_view(16), true);
    let mut out = Vec::new();

    let saved = capture_to_directory(
        &mut reader,
        &RetryPolicy::default(),
        dir.path(),
        TemplateFormat::Raw,
        &mut out,
    )
    .unwrap()
    .unwrap();

    let image_path = dir.path().join(IMAGE_FILE);
    assert_eq!(saved.image.as_deref(), Some(image_path.as_path()));
    assert_eq!(image::open(&image_path).unwrap().to_luma8().dimensions(), (4, 4));
    assert!(saved.template.is_none());
    assert!(!dir.path().join("fingerprint.fmd").exists());
    assert!(output(out).contains("Failed to extract template:"));
}

#[test]
fn opening_a_missing_reader_fails() {
    let mut out = Vec::new();

    let result = open_reader(&SimulatedSdk::default(), 3, Priority::Cooperative, &mut out);

    assert!(matches!(
        result,
        Err(ScanError::ReaderNotFound { index: 3, count: 1 })
    ));
    assert!(output(out).contains("[0] Simulated Fingerprint Reader"));
}

#[test]
fn capture_writes_nothing_when_attempts_run_out() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = SimulatedReader::new("test").script(vec![CaptureStatus::Canceled; 4]);
    let mut out = Vec::new();

    let saved = capture_to_directory(
        &mut reader,
        &quick_retry(4),
        dir.path(),
        TemplateFormat::Raw,
        &mut out,
    )
    .unwrap();

    assert!(saved.is_none());
    assert_eq!(reader.calls().captures, 4);
    assert_eq!(reader.calls().extractions, 0);
    assert!(!dir.path().join(IMAGE_FILE).exists());
    assert!(output(out).contains("Failed to capture fingerprint after 4 attempts."));
}

#[test]
fn enrollment_aggregates_configured_number_of_captures() {
    let mut reader = SimulatedReader::new("test").script(vec![
        CaptureStatus::Good,
        CaptureStatus::CenterFinger,
        CaptureStatus::Good,
        CaptureStatus::TimedOut,
    ]);
    let plan = EnrollPlan {
        captures: 3,
        retry: quick_retry(3),
    };
    let mut out = Vec::new();

    let template = collect_and_build(&mut reader, &plan, &mut out).unwrap();

    assert!(template.is_some());
    let calls = reader.calls();
    assert_eq!(calls.captures, 5);
    assert_eq!(calls.extractions, 3);
    assert_eq!(calls.enrollments, 1);

    let text = output(out);
    assert_eq!(text.matches("Enroll stage passed.").count(), 3);
    assert!(text.contains("please center your finger"));
}

#[test]
fn enrollment_is_abandoned_when_a_stage_runs_out() {
    let mut reader = SimulatedReader::new("test").script(vec![
        CaptureStatus::Good,
        CaptureStatus::Retry,
        CaptureStatus::Retry,
    ]);
    let plan = EnrollPlan {
        captures: 4,
        retry: quick_retry(2),
    };
    let mut out = Vec::new();

    let template = collect_and_build(&mut reader, &plan, &mut out).unwrap();

    assert!(template.is_none());
    assert_eq!(reader.calls().enrollments, 0);
    assert!(output(out).contains("Enrollment failed: no usable scan after 2 attempts."));
}

#[test]
fn enroll_user_rejects_blank_names() {
    let store = TemplateStore::open_in_memory().unwrap();
    let mut reader = SimulatedReader::new("test");
    let mut out = Vec::new();

    let result = enroll_user(&mut reader, &store, "   ", &EnrollPlan::default(), &mut out);

    assert!(matches!(result, Err(ScanError::InvalidName)));
    assert_eq!(reader.calls().captures, 0);
}

#[test]
fn identification_without_enrollments_skips_reader() {
    let store = TemplateStore::open_in_memory().unwrap();
    let mut reader = SimulatedReader::new("test");
    let mut out = Vec::new();

    let result = identify_user(&mut reader, &store, &IdentifyPlan::default(), &mut out).unwrap();

    assert_eq!(result, Identification::NoCandidates);
    assert_eq!(reader.calls().captures, 0);
    assert_eq!(reader.calls().identifications, 0);
    assert!(output(out).contains("no match"));
}

#[test]
fn enrolled_finger_is_identified_by_name() {
    let store = TemplateStore::open_in_memory().unwrap();
    let mut reader = SimulatedReader::new("test").with_finger(2);
    let mut out = Vec::new();
    enroll_user(&mut reader, &store, "alice", &EnrollPlan::default(), &mut out).unwrap();

    reader.place_finger(5);
    enroll_user(&mut reader, &store, "bob", &EnrollPlan::default(), &mut out).unwrap();

    reader.place_finger(2);
    let result = identify_user(&mut reader, &store, &IdentifyPlan::default(), &mut out).unwrap();

    match result {
        Identification::Match { name, score, .. } => {
            assert_eq!(name, "alice");
            assert_eq!(score, 0);
        }
        other => panic!("expected a match, got {:?}", other),
    }
    assert_eq!(reader.calls().identifications, 1);
}

#[test]
fn unknown_finger_reports_no_match() {
    let store = TemplateStore::open_in_memory().unwrap();
    let mut reader = SimulatedReader::new("test").with_finger(1);
    let mut out = Vec::new();
    enroll_user(&mut reader, &store, "alice", &EnrollPlan::default(), &mut out).unwrap();

    reader.place_finger(3);
    let result = identify_user(&mut reader, &store, &IdentifyPlan::default(), &mut out).unwrap();

    assert_eq!(result, Identification::NoMatch);
    assert!(output(out).ends_with("No match.\n"));
}

#[test]
fn identification_without_usable_probe() {
    let store = TemplateStore::open_in_memory().unwrap();
    let mut reader = SimulatedReader::new("test");
    let mut out = Vec::new();
    enroll_user(&mut reader, &store, "alice", &EnrollPlan::default(), &mut out).unwrap();

    let mut reader = reader.script(vec![CaptureStatus::RemoveFinger; 3]);
    let result = identify_user(&mut reader, &store, &IdentifyPlan::default(), &mut out).unwrap();

    assert_eq!(result, Identification::NoCapture);
    assert_eq!(reader.calls().identifications, 0);
}

#[test]
fn stored_enrollment_decodes_to_the_same_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fingerprints.db");
    let mut reader = SimulatedReader::new("test").with_finger(6);
    let mut out = Vec::new();

    let enrolled = collect_and_build(&mut reader, &EnrollPlan::default(), &mut out)
        .unwrap()
        .unwrap();
    TemplateStore::open(&path)
        .unwrap()
        .insert("erin", &enrolled)
        .unwrap();

    let loaded = TemplateStore::open(&path).unwrap().load_all().unwrap();
    assert_eq!(loaded[0].template.as_bytes(), enrolled.as_bytes());
    assert_eq!(loaded[0].template, enrolled);
}

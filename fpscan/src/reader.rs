//! The seam between the command-line flows and a fingerprint SDK.
//!
//! An [`Sdk`] enumerates and opens readers. A [`Reader`] exposes the primitive
//! SDK calls (capture, extraction, enrollment, identification) plus two
//! composite flows with default implementations built on those primitives.
//! Backends whose SDK fuses capturing and matching override the composites.

use crate::enroll::{self, EnrollPlan};
use crate::identify::{self, IdentifyPlan};
use crate::template::Template;
use std::fmt::{self, Display, Formatter};
use std::io::Write;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
}

/// Capture priority requested when opening a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Priority {
    /// Share the reader with other applications.
    Cooperative,
    /// Take the reader for this process only.
    Exclusive,
}

/// SDK result of a single capture call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    Good,
    TimedOut,
    Canceled,
    /// Poor scan quality or another general scanning problem.
    Retry,
    TooShort,
    CenterFinger,
    RemoveFinger,
    /// Any other SDK result code.
    Failed(i32),
}

impl Display for CaptureStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            CaptureStatus::Good => write!(f, "Good"),
            CaptureStatus::TimedOut => write!(f, "TimedOut"),
            CaptureStatus::Canceled => write!(f, "Canceled"),
            CaptureStatus::Retry => write!(f, "Retry"),
            CaptureStatus::TooShort => write!(f, "Retry: too short"),
            CaptureStatus::CenterFinger => write!(f, "Retry: center finger"),
            CaptureStatus::RemoveFinger => write!(f, "Retry: remove finger"),
            CaptureStatus::Failed(code) => write!(f, "Failed ({:#x})", code),
        }
    }
}

/// One raw 8-bit grayscale view of a captured finger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A captured fingerprint (Fid): the raw views returned by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sample {
    pub views: Vec<ImageView>,
    /// Capture resolution in dpi, when the SDK reports one.
    pub resolution: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub status: CaptureStatus,
    pub sample: Option<Sample>,
}

impl Capture {
    pub fn failed(status: CaptureStatus) -> Self {
        Capture {
            status,
            sample: None,
        }
    }

    /// The sample of a good capture that carries at least one view.
    pub fn into_sample(self) -> Option<Sample> {
        match (self.status, self.sample) {
            (CaptureStatus::Good, Some(sample)) if !sample.views.is_empty() => Some(sample),
            _ => None,
        }
    }
}

/// Identification hit: an index into the gallery and its dissimilarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    pub score: u32,
}

pub trait Sdk {
    fn readers(&self) -> crate::Result<Vec<ReaderInfo>>;

    /// Opens a reader. The handle is released when the returned value drops.
    fn open(&self, index: usize, priority: Priority) -> crate::Result<Box<dyn Reader>>;
}

pub trait Reader {
    fn info(&self) -> &ReaderInfo;

    /// One blocking capture. Unusable scans are reported through the status,
    /// `Err` means the reader itself failed.
    fn capture(&mut self, timeout: Duration) -> crate::Result<Capture>;

    fn extract(&mut self, sample: &Sample) -> crate::Result<Template>;

    /// Builds one enrollment template out of per-capture templates.
    fn create_enrollment(&mut self, templates: &[Template]) -> crate::Result<Template>;

    /// Compares `probe` against `gallery`, returning candidates best first.
    fn identify(
        &mut self,
        probe: &Template,
        gallery: &[Template],
        threshold: u32,
    ) -> crate::Result<Vec<Candidate>>;

    /// Runs a whole enrollment. `None` when it was abandoned.
    fn enroll(&mut self, plan: &EnrollPlan, out: &mut dyn Write) -> crate::Result<Option<Template>> {
        enroll::collect_and_build(self, plan, out)
    }

    /// Captures a probe and identifies it. `None` when no usable capture was made.
    fn identify_finger(
        &mut self,
        gallery: &[Template],
        plan: &IdentifyPlan,
        out: &mut dyn Write,
    ) -> crate::Result<Option<Vec<Candidate>>> {
        identify::capture_and_match(self, gallery, plan, out)
    }
}

/// Lists the readers, then opens the one at `index`.
pub fn open_reader(
    sdk: &dyn Sdk,
    index: usize,
    priority: Priority,
    out: &mut dyn Write,
) -> crate::Result<Box<dyn Reader>> {
    let readers = sdk.readers()?;
    if readers.is_empty() {
        return Err(crate::ScanError::NoReaders);
    }

    writeln!(out, "Found {} reader(s):", readers.len())?;
    for reader in &readers {
        writeln!(out, "[{}] {}", reader.index, reader.name)?;
    }

    let chosen = readers
        .get(index)
        .ok_or(crate::ScanError::ReaderNotFound {
            index,
            count: readers.len(),
        })?;
    writeln!(out, "Using reader: {}", chosen.name)?;
    info!(reader = %chosen.name, ?priority, "opening reader");

    sdk.open(index, priority)
}

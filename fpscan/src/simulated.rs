//! A software reader that renders a synthetic finger. It backs the
//! `simulated` CLI backend and stands in for hardware in tests.
//!
//! Every finger number renders a different ridge pattern; the template of a
//! rendering is a digest of its pixels, so two captures of the same finger
//! always produce equal templates and identification is an exact comparison.

use crate::reader::{
    Candidate, Capture, CaptureStatus, ImageView, Priority, Reader, ReaderInfo, Sample, Sdk,
};
use crate::template::Template;
use crate::{Operation, ScanError};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

const IMAGE_WIDTH: u32 = 120;
const IMAGE_HEIGHT: u32 = 160;
const IMAGE_RESOLUTION: u32 = 500;
const TEMPLATE_MAGIC: &[u8; 4] = b"SFMD";
const SIGNATURE_LEN: usize = 16;

/// Result code reported when a sample cannot be turned into a template.
pub const INVALID_SAMPLE: i32 = 0x05ba_000d;
/// Result code reported when enrollment templates disagree or are missing.
pub const INVALID_ENROLLMENT: i32 = 0x05ba_0014;

/// Readers served by the simulated backend. All of them scan the same finger.
#[derive(Debug, Clone)]
pub struct SimulatedSdk {
    names: Vec<String>,
    finger: u8,
}

impl Default for SimulatedSdk {
    fn default() -> Self {
        SimulatedSdk::new(vec!["Simulated Fingerprint Reader".to_string()])
    }
}

impl SimulatedSdk {
    pub fn new(names: Vec<String>) -> Self {
        SimulatedSdk { names, finger: 1 }
    }

    pub fn with_finger(mut self, finger: u8) -> Self {
        self.finger = finger;
        self
    }
}

impl Sdk for SimulatedSdk {
    fn readers(&self) -> crate::Result<Vec<ReaderInfo>> {
        Ok(self
            .names
            .iter()
            .enumerate()
            .map(|(index, name)| ReaderInfo {
                index,
                name: name.clone(),
                description: "software reader".to_string(),
            })
            .collect())
    }

    fn open(&self, index: usize, priority: Priority) -> crate::Result<Box<dyn Reader>> {
        let name = self.names.get(index).ok_or(ScanError::ReaderNotFound {
            index,
            count: self.names.len(),
        })?;
        debug!(index, ?priority, "opening simulated reader");

        let mut reader = SimulatedReader::new(name).with_finger(self.finger);
        reader.info.index = index;

        Ok(Box::new(reader))
    }
}

/// Number of calls made into each primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub captures: usize,
    pub extractions: usize,
    pub enrollments: usize,
    pub identifications: usize,
}

#[derive(Debug, Clone)]
pub struct SimulatedReader {
    info: ReaderInfo,
    finger: u8,
    script: VecDeque<CaptureStatus>,
    empty_samples: bool,
    calls: CallCounts,
}

impl SimulatedReader {
    pub fn new(name: &str) -> Self {
        SimulatedReader {
            info: ReaderInfo {
                index: 0,
                name: name.to_string(),
                description: "software reader".to_string(),
            },
            finger: 1,
            script: VecDeque::new(),
            empty_samples: false,
            calls: CallCounts::default(),
        }
    }

    pub fn with_finger(mut self, finger: u8) -> Self {
        self.finger = finger;
        self
    }

    /// Queues capture results; once the queue is drained every capture is good.
    pub fn script(mut self, statuses: impl IntoIterator<Item = CaptureStatus>) -> Self {
        self.script.extend(statuses);
        self
    }

    /// Good captures come back without any image view.
    pub fn with_empty_samples(mut self) -> Self {
        self.empty_samples = true;
        self
    }

    /// Switches the finger placed on the reader for the following captures.
    pub fn place_finger(&mut self, finger: u8) {
        self.finger = finger;
    }

    pub fn calls(&self) -> CallCounts {
        self.calls
    }

    fn render(&self) -> ImageView {
        let spacing = 4 + u32::from(self.finger % 7);
        let (cx, cy) = (
            IMAGE_WIDTH / 2 + u32::from(self.finger % 5),
            IMAGE_HEIGHT / 2 - u32::from(self.finger % 3),
        );

        let mut pixels = Vec::with_capacity((IMAGE_WIDTH * IMAGE_HEIGHT) as usize);
        for y in 0..IMAGE_HEIGHT {
            for x in 0..IMAGE_WIDTH {
                let dx = x as i64 - cx as i64;
                let dy = (y as i64 - cy as i64) * 3 / 4;
                let ring = ((dx * dx + dy * dy) as f64).sqrt() as u32 / spacing;
                let ridge = (ring + u32::from(self.finger)) % 2 == 0;
                pixels.push(if ridge { 40 } else { 220 });
            }
        }

        ImageView {
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            pixels,
        }
    }
}

impl Reader for SimulatedReader {
    fn info(&self) -> &ReaderInfo {
        &self.info
    }

    fn capture(&mut self, _timeout: Duration) -> crate::Result<Capture> {
        self.calls.captures += 1;
        let status = self.script.pop_front().unwrap_or(CaptureStatus::Good);
        if status != CaptureStatus::Good {
            return Ok(Capture::failed(status));
        }

        let views = if self.empty_samples {
            Vec::new()
        } else {
            vec![self.render()]
        };

        Ok(Capture {
            status,
            sample: Some(Sample {
                views,
                resolution: Some(IMAGE_RESOLUTION),
            }),
        })
    }

    fn extract(&mut self, sample: &Sample) -> crate::Result<Template> {
        self.calls.extractions += 1;
        let invalid = ScanError::Sdk {
            operation: Operation::Extraction,
            code: INVALID_SAMPLE,
        };

        let view = match sample.views.first() {
            Some(view) if view.pixels.len() == view.width as usize * view.height as usize => view,
            _ => return Err(invalid),
        };
        let (width, height) = match (u16::try_from(view.width), u16::try_from(view.height)) {
            (Ok(width), Ok(height)) if !view.pixels.is_empty() => (width, height),
            _ => return Err(invalid),
        };

        let mut signature = [0u8; SIGNATURE_LEN];
        for (offset, pixel) in view.pixels.iter().enumerate() {
            let slot = offset % SIGNATURE_LEN;
            signature[slot] = signature[slot]
                .rotate_left(3)
                .wrapping_add(*pixel)
                .wrapping_add(offset as u8);
        }

        let mut bytes = Vec::with_capacity(TEMPLATE_MAGIC.len() + 4 + SIGNATURE_LEN);
        bytes.extend_from_slice(TEMPLATE_MAGIC);
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.extend_from_slice(&signature);

        Template::new(bytes)
    }

    fn create_enrollment(&mut self, templates: &[Template]) -> crate::Result<Template> {
        self.calls.enrollments += 1;
        let invalid = ScanError::Sdk {
            operation: Operation::Enrollment,
            code: INVALID_ENROLLMENT,
        };

        let first = match templates.first() {
            Some(first) => first,
            None => return Err(invalid),
        };
        if templates.iter().any(|template| template != first) {
            return Err(invalid);
        }

        Ok(first.clone())
    }

    fn identify(
        &mut self,
        probe: &Template,
        gallery: &[Template],
        threshold: u32,
    ) -> crate::Result<Vec<Candidate>> {
        self.calls.identifications += 1;

        let mut candidates = gallery
            .iter()
            .enumerate()
            .map(|(index, template)| Candidate {
                index,
                score: dissimilarity(probe, template),
            })
            .filter(|candidate| candidate.score <= threshold)
            .collect::<Vec<_>>();
        candidates.sort_by_key(|candidate| candidate.score);

        Ok(candidates)
    }
}

/// Zero for identical templates, grows with every differing signature byte.
fn dissimilarity(left: &Template, right: &Template) -> u32 {
    if left.len() != right.len() {
        return i32::MAX as u32;
    }

    let differing = left
        .as_bytes()
        .iter()
        .zip(right.as_bytes())
        .filter(|(a, b)| a != b)
        .count() as u32;

    differing.saturating_mul((i32::MAX as u32) / SIGNATURE_LEN as u32)
}

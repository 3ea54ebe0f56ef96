//! Hardware readers through libfprint 0.x.
//!
//! libfprint does not hand out templates for a bare image: prints only come
//! out of its enrollment stages, and identification scans and matches in one
//! call. The primitive `extract`, `create_enrollment` and `identify` are
//! therefore unsupported here and the composite flows are overridden.

use crate::enroll::{retry_hint, EnrollPlan};
use crate::identify::IdentifyPlan;
use crate::reader::{
    Candidate, Capture, CaptureStatus, ImageView, Priority, Reader, ReaderInfo, Sample, Sdk,
};
use crate::template::Template;
use crate::{Operation, ScanError};
use fprint_rs::{Device, EnrollResult, FPrint, FPrintError, IdentifyResult, PrintData, VerifyResult};
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct LibfprintSdk {
    context: Rc<FPrint>,
}

impl LibfprintSdk {
    pub fn new() -> crate::Result<Self> {
        let context = FPrint::new().map_err(backend)?;
        debug!("libfprint initialised");

        Ok(LibfprintSdk {
            context: Rc::new(context),
        })
    }
}

impl Sdk for LibfprintSdk {
    fn readers(&self) -> crate::Result<Vec<ReaderInfo>> {
        let discovered = self.context.discover().map_err(backend)?;

        Ok(discovered
            .iter()
            .enumerate()
            .map(|(index, device)| {
                let driver = device.driver();
                ReaderInfo {
                    index,
                    name: driver.full_name(),
                    description: driver.name(),
                }
            })
            .collect())
    }

    fn open(&self, index: usize, priority: Priority) -> crate::Result<Box<dyn Reader>> {
        let discovered = self.context.discover().map_err(backend)?;
        let found = discovered.get(index).ok_or(ScanError::ReaderNotFound {
            index,
            count: discovered.len(),
        })?;
        let driver = found.driver();
        let info = ReaderInfo {
            index,
            name: driver.full_name(),
            description: driver.name(),
        };

        // libfprint has no notion of shared access; a device is always exclusive
        if priority == Priority::Cooperative {
            debug!("libfprint opens devices exclusively, ignoring cooperative priority");
        }
        let device = found.open().map_err(|error| {
            warn!(%error, reader = %info.name, "open failed");
            ScanError::Sdk {
                operation: Operation::Open,
                code: error_code(&error),
            }
        })?;
        info!(
            reader = %info.name,
            stages = device.nr_enroll_stages(),
            imaging = device.supports_imaging(),
            identification = device.supports_identification(),
            "reader opened"
        );

        Ok(Box::new(LibfprintReader {
            info,
            device,
            _context: Rc::clone(&self.context),
        }))
    }
}

pub struct LibfprintReader {
    info: ReaderInfo,
    device: Device,
    // dropped after `device`
    _context: Rc<FPrint>,
}

impl Reader for LibfprintReader {
    fn info(&self) -> &ReaderInfo {
        &self.info
    }

    fn capture(&mut self, timeout: Duration) -> crate::Result<Capture> {
        if !self.device.supports_imaging() {
            return Err(ScanError::NotSupported(Operation::Capture));
        }
        debug!(?timeout, "libfprint capture blocks until a finger is present");

        match self.device.capture_image(false) {
            Ok(image) => {
                let view = ImageView {
                    width: image.width().max(0) as u32,
                    height: image.height().max(0) as u32,
                    pixels: image.pixels(),
                };

                Ok(Capture {
                    status: CaptureStatus::Good,
                    // fp_img carries no resolution
                    sample: Some(Sample {
                        views: vec![view],
                        resolution: None,
                    }),
                })
            }
            Err(FPrintError::Other(code)) => Ok(Capture::failed(CaptureStatus::Failed(code))),
            Err(error) => Err(backend(error)),
        }
    }

    fn extract(&mut self, _sample: &Sample) -> crate::Result<Template> {
        Err(ScanError::NotSupported(Operation::Extraction))
    }

    fn create_enrollment(&mut self, _templates: &[Template]) -> crate::Result<Template> {
        Err(ScanError::NotSupported(Operation::Enrollment))
    }

    fn identify(
        &mut self,
        _probe: &Template,
        _gallery: &[Template],
        _threshold: u32,
    ) -> crate::Result<Vec<Candidate>> {
        Err(ScanError::NotSupported(Operation::Identification))
    }

    /// The device decides how many stages make an enrollment; `plan.captures`
    /// is not used. Each stage gets `plan.retry.attempts` scans.
    fn enroll(&mut self, plan: &EnrollPlan, out: &mut dyn Write) -> crate::Result<Option<Template>> {
        writeln!(
            out,
            "You will need to successfully scan your finger {} times to complete the process.",
            self.device.nr_enroll_stages()
        )?;

        let mut enrollment = self.device.enroll();
        let mut stage = 1;
        let mut failures = 0;
        loop {
            writeln!(out, "Scan your finger now (time: {}).", stage)?;
            let result = match enrollment.next() {
                Some(result) => result.map_err(backend)?,
                None => return Ok(None),
            };

            let status = match result {
                EnrollResult::Complete(print) => {
                    writeln!(out, "Enrollment complete!")?;
                    let bytes = print.to_bytes().map_err(backend)?;

                    return Template::new(bytes).map(Some);
                }
                EnrollResult::Fail => {
                    writeln!(out, "Enroll failed, something went wrong :(")?;
                    return Ok(None);
                }
                EnrollResult::Pass => {
                    writeln!(out, "Enroll stage passed.")?;
                    stage += 1;
                    failures = 0;
                    continue;
                }
                EnrollResult::Retry => CaptureStatus::Retry,
                EnrollResult::RetryTooShort => CaptureStatus::TooShort,
                EnrollResult::RetryCenterFinger => CaptureStatus::CenterFinger,
                EnrollResult::RetryRemoveFinger => CaptureStatus::RemoveFinger,
            };

            writeln!(out, "{}", retry_hint(status))?;
            failures += 1;
            if failures >= plan.retry.attempts {
                writeln!(
                    out,
                    "Enrollment failed: no usable scan after {} attempts.",
                    plan.retry.attempts
                )?;
                return Ok(None);
            }
        }
    }

    fn identify_finger(
        &mut self,
        gallery: &[Template],
        plan: &IdentifyPlan,
        out: &mut dyn Write,
    ) -> crate::Result<Option<Vec<Candidate>>> {
        if !self.device.supports_identification() {
            return Err(ScanError::NotSupported(Operation::Identification));
        }

        let prints = gallery
            .iter()
            .map(|template| PrintData::from_bytes(template.as_bytes()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(backend)?;
        let device = &self.device;

        let candidates = plan.retry.run(|attempt| {
            writeln!(
                out,
                "Attempt {} of {}: Place your finger on the scanner...",
                attempt, plan.retry.attempts
            )?;

            match device.identify_finger_image(&prints).map_err(backend)? {
                // libfprint only reports that a print matched, not how well
                IdentifyResult::Matched(index) => Ok(Some(vec![Candidate { index, score: 0 }])),
                IdentifyResult::NoMatch => Ok(Some(Vec::new())),
                IdentifyResult::Retry(reason) => {
                    writeln!(out, "{}", retry_hint(verify_status(reason)))?;
                    Ok(None)
                }
            }
        })?;

        if candidates.is_none() {
            writeln!(
                out,
                "Failed to capture fingerprint after {} attempts.",
                plan.retry.attempts
            )?;
        }

        Ok(candidates)
    }
}

fn verify_status(result: VerifyResult) -> CaptureStatus {
    match result {
        VerifyResult::RetryTooShort => CaptureStatus::TooShort,
        VerifyResult::RetryCenterFinger => CaptureStatus::CenterFinger,
        VerifyResult::RetryRemoveFinger => CaptureStatus::RemoveFinger,
        _ => CaptureStatus::Retry,
    }
}

fn error_code(error: &FPrintError) -> i32 {
    match error {
        FPrintError::InitError(code)
        | FPrintError::Other(code)
        | FPrintError::UnexpectedAbort(code)
        | FPrintError::IdentifyFailed(code) => *code,
        _ => -1,
    }
}

fn backend(error: FPrintError) -> ScanError {
    ScanError::Backend(error.to_string())
}

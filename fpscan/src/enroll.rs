use crate::reader::{CaptureStatus, Reader};
use crate::retry::RetryPolicy;
use crate::store::TemplateStore;
use crate::template::Template;
use crate::ScanError;
use std::io::Write;
use tracing::{info, warn};

pub const DEFAULT_CAPTURES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollPlan {
    /// Successful captures aggregated into one enrollment template.
    pub captures: usize,
    /// Budget for each of those captures.
    pub retry: RetryPolicy,
}

impl Default for EnrollPlan {
    fn default() -> Self {
        EnrollPlan {
            captures: DEFAULT_CAPTURES,
            retry: RetryPolicy::default(),
        }
    }
}

/// Collects `plan.captures` per-capture templates, then asks the reader to
/// merge them. Returns `None` when a capture stage ran out of attempts.
pub fn collect_and_build<R: Reader + ?Sized>(
    reader: &mut R,
    plan: &EnrollPlan,
    out: &mut dyn Write,
) -> crate::Result<Option<Template>> {
    writeln!(
        out,
        "You will need to successfully scan your finger {} times to complete the process.",
        plan.captures
    )?;

    let mut templates = Vec::with_capacity(plan.captures);
    while templates.len() < plan.captures {
        let stage = templates.len() + 1;
        let template = plan.retry.run(|attempt| {
            writeln!(
                out,
                "Scan your finger now (scan {} of {}, attempt {} of {}).",
                stage, plan.captures, attempt, plan.retry.attempts
            )?;

            let capture = reader.capture(plan.retry.timeout)?;
            let status = capture.status;
            let sample = match capture.into_sample() {
                Some(sample) => sample,
                None => {
                    writeln!(out, "{}", retry_hint(status))?;
                    return Ok(None);
                }
            };

            match reader.extract(&sample) {
                Ok(template) => Ok(Some(template)),
                Err(error) if error.is_retryable() => {
                    writeln!(out, "Failed to extract template: {}", error)?;
                    Ok(None)
                }
                Err(error) => Err(error),
            }
        })?;

        match template {
            Some(template) => {
                writeln!(out, "Enroll stage passed.")?;
                templates.push(template);
            }
            None => {
                warn!(stage, "enrollment abandoned");
                writeln!(
                    out,
                    "Enrollment failed: no usable scan after {} attempts.",
                    plan.retry.attempts
                )?;
                return Ok(None);
            }
        }
    }

    let enrollment = reader.create_enrollment(&templates)?;
    writeln!(out, "Enrollment complete!")?;

    Ok(Some(enrollment))
}

/// Enrolls a finger and stores it under `name`. Returns the row id, or `None`
/// when the enrollment was abandoned.
pub fn enroll_user<R: Reader + ?Sized>(
    reader: &mut R,
    store: &TemplateStore,
    name: &str,
    plan: &EnrollPlan,
    out: &mut dyn Write,
) -> crate::Result<Option<i64>> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ScanError::InvalidName);
    }

    let template = match reader.enroll(plan, out)? {
        Some(template) => template,
        None => return Ok(None),
    };

    let id = store.insert(name, &template)?;
    info!(id, name, "user enrolled");
    writeln!(out, "Fingerprint template for {} saved (id {}).", name, id)?;

    Ok(Some(id))
}

pub(crate) fn retry_hint(status: CaptureStatus) -> &'static str {
    match status {
        CaptureStatus::TooShort => "Your swipe was too short, please try again.",
        CaptureStatus::CenterFinger => {
            "Didn't catch that, please center your finger on the sensor and try again."
        }
        CaptureStatus::RemoveFinger => {
            "Scan failed, please remove your finger and then try again."
        }
        CaptureStatus::TimedOut => "No finger detected before the timeout, please try again.",
        _ => "Didn't quite catch that. Please try again.",
    }
}

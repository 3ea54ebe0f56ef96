use crate::reader::{Reader, Sample};
use std::io::Write;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Bounded retry of a blocking SDK call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// Timeout handed to every capture call.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: DEFAULT_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Calls `attempt` with 1-based attempt numbers until it yields a value or
    /// `attempts` calls were made. An error stops the loop at once.
    pub fn run<T, F>(&self, mut attempt: F) -> crate::Result<Option<T>>
    where
        F: FnMut(u32) -> crate::Result<Option<T>>,
    {
        for number in 1..=self.attempts {
            if let Some(value) = attempt(number)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }
}

/// Captures until the reader hands back a usable sample, at most `policy.attempts` times.
pub fn capture_with_retries<R: Reader + ?Sized>(
    reader: &mut R,
    policy: &RetryPolicy,
    out: &mut dyn Write,
) -> crate::Result<Option<Sample>> {
    let sample = policy.run(|attempt| {
        writeln!(
            out,
            "Attempt {} of {}: Place your finger on the scanner...",
            attempt, policy.attempts
        )?;
        let capture = reader.capture(policy.timeout)?;
        writeln!(out, "Capture result code: {}", capture.status)?;
        let views = capture.sample.as_ref().map_or(0, |sample| sample.views.len());
        let image_len = capture
            .sample
            .as_ref()
            .and_then(|sample| sample.views.first())
            .map_or(0, |view| view.pixels.len());
        debug!(
            attempt,
            status = %capture.status,
            has_sample = capture.sample.is_some(),
            views,
            image_len,
            "capture finished"
        );

        match capture.into_sample() {
            Some(sample) => Ok(Some(sample)),
            None => {
                writeln!(out, "No fingerprint data captured. Please try again.")?;
                if attempt < policy.attempts {
                    writeln!(out, "Retrying...")?;
                }
                Ok(None)
            }
        }
    })?;

    if sample.is_none() {
        writeln!(
            out,
            "Failed to capture fingerprint after {} attempts.",
            policy.attempts
        )?;
    }

    Ok(sample)
}

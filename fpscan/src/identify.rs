use crate::reader::{Candidate, Reader};
use crate::retry::{capture_with_retries, RetryPolicy};
use crate::store::TemplateStore;
use crate::template::Template;
use std::io::Write;
use tracing::{debug, info};

/// Dissimilarity threshold: a false match rate of one in 100 000.
pub const DEFAULT_THRESHOLD: u32 = (i32::MAX / 100_000) as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyPlan {
    pub retry: RetryPolicy,
    /// Candidates scoring above this are not reported.
    pub threshold: u32,
}

impl Default for IdentifyPlan {
    fn default() -> Self {
        IdentifyPlan {
            retry: RetryPolicy::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identification {
    /// Nothing enrolled; the reader was not used.
    NoCandidates,
    /// No usable probe could be captured.
    NoCapture,
    NoMatch,
    Match { id: i64, name: String, score: u32 },
}

pub fn capture_and_match<R: Reader + ?Sized>(
    reader: &mut R,
    gallery: &[Template],
    plan: &IdentifyPlan,
    out: &mut dyn Write,
) -> crate::Result<Option<Vec<Candidate>>> {
    let sample = match capture_with_retries(reader, &plan.retry, out)? {
        Some(sample) => sample,
        None => return Ok(None),
    };

    let probe = reader.extract(&sample)?;
    let candidates = reader.identify(&probe, gallery, plan.threshold)?;
    debug!(gallery = gallery.len(), hits = candidates.len(), "identify finished");

    Ok(Some(candidates))
}

/// Identifies the finger on the reader against every stored template.
pub fn identify_user<R: Reader + ?Sized>(
    reader: &mut R,
    store: &TemplateStore,
    plan: &IdentifyPlan,
    out: &mut dyn Write,
) -> crate::Result<Identification> {
    let enrolled = store.load_all()?;
    if enrolled.is_empty() {
        writeln!(out, "No enrolled fingerprints; no match.")?;
        return Ok(Identification::NoCandidates);
    }

    let gallery = enrolled
        .iter()
        .map(|stored| stored.template.clone())
        .collect::<Vec<_>>();
    writeln!(out, "Comparing against {} stored template(s).", gallery.len())?;

    let candidates = match reader.identify_finger(&gallery, plan, out)? {
        Some(candidates) => candidates,
        None => return Ok(Identification::NoCapture),
    };

    let best = candidates
        .into_iter()
        .filter(|candidate| candidate.index < enrolled.len())
        .min_by_key(|candidate| candidate.score);

    match best {
        Some(candidate) => {
            let stored = &enrolled[candidate.index];
            info!(id = stored.id, name = %stored.name, score = candidate.score, "finger identified");
            writeln!(
                out,
                "Match found: {} (id {}, score {}).",
                stored.name, stored.id, candidate.score
            )?;

            Ok(Identification::Match {
                id: stored.id,
                name: stored.name.clone(),
                score: candidate.score,
            })
        }
        None => {
            writeln!(out, "No match.")?;
            Ok(Identification::NoMatch)
        }
    }
}

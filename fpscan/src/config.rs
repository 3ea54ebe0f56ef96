use crate::enroll::{EnrollPlan, DEFAULT_CAPTURES};
use crate::identify::{IdentifyPlan, DEFAULT_THRESHOLD};
use crate::reader::{Priority, Sdk};
use crate::retry::{RetryPolicy, DEFAULT_ATTEMPTS};
use crate::session::SessionConfig;
use crate::simulated::SimulatedSdk;
use crate::template::TemplateFormat;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Where readers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Hardware readers through libfprint.
    Libfprint,
    /// A software reader that renders a synthetic finger.
    Simulated,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "libfprint") {
            Backend::Libfprint
        } else {
            Backend::Simulated
        }
    }
}

/// Runtime settings, from flags or `FPSCAN_*` environment variables.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Reader backend
    #[arg(long, value_enum, env = "FPSCAN_BACKEND", default_value_t = Backend::default(), global = true)]
    pub backend: Backend,

    /// Index of the reader to use, as listed by `devices`
    #[arg(long, env = "FPSCAN_READER", default_value_t = 0, global = true)]
    pub reader: usize,

    /// Capture priority used when opening the reader
    #[arg(long, value_enum, env = "FPSCAN_PRIORITY", default_value_t = Priority::Cooperative, global = true)]
    pub priority: Priority,

    /// SQLite database holding enrolled templates
    #[arg(long, env = "FPSCAN_DB", default_value = "fingerprints.db", global = true, value_name = "PATH")]
    pub database: PathBuf,

    /// Directory for captured files [default: desktop or current directory]
    #[arg(long, env = "FPSCAN_OUTPUT_DIR", global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Capture attempts before giving up
    #[arg(long, env = "FPSCAN_ATTEMPTS", default_value_t = DEFAULT_ATTEMPTS,
          value_parser = clap::value_parser!(u32).range(1..), global = true)]
    pub attempts: u32,

    /// Timeout of a single capture, in milliseconds
    #[arg(long = "timeout-ms", env = "FPSCAN_TIMEOUT_MS", default_value_t = 20_000, global = true)]
    pub timeout_ms: u64,

    /// Successful scans aggregated into one enrollment
    #[arg(long, env = "FPSCAN_ENROLL_CAPTURES", default_value_t = DEFAULT_CAPTURES as u32,
          value_parser = clap::value_parser!(u32).range(1..), global = true)]
    pub enroll_captures: u32,

    /// Highest dissimilarity score still reported as a match
    #[arg(long, env = "FPSCAN_THRESHOLD", default_value_t = DEFAULT_THRESHOLD, global = true)]
    pub threshold: u32,

    /// Format of the template file written by `capture`
    #[arg(long, value_enum, env = "FPSCAN_TEMPLATE_FORMAT", default_value_t = TemplateFormat::Raw, global = true)]
    pub template_format: TemplateFormat,
}

impl Settings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.attempts,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    pub fn enroll_plan(&self) -> EnrollPlan {
        EnrollPlan {
            captures: self.enroll_captures as usize,
            retry: self.retry_policy(),
        }
    }

    pub fn identify_plan(&self) -> IdentifyPlan {
        IdentifyPlan {
            retry: self.retry_policy(),
            threshold: self.threshold,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            default_dir: self.output_dir(),
            reader_index: self.reader,
            priority: self.priority,
            capture: self.retry_policy(),
            enroll: self.enroll_plan(),
            identify: self.identify_plan(),
            template_format: self.template_format,
        }
    }

    pub fn build_sdk(&self) -> crate::Result<Box<dyn Sdk>> {
        match self.backend {
            Backend::Simulated => Ok(Box::new(SimulatedSdk::default())),
            #[cfg(feature = "libfprint")]
            Backend::Libfprint => Ok(Box::new(crate::libfprint::LibfprintSdk::new()?)),
            #[cfg(not(feature = "libfprint"))]
            Backend::Libfprint => Err(crate::ScanError::BackendUnavailable(
                "fpscan was built without the `libfprint` feature".to_string(),
            )),
        }
    }
}

/// The user's desktop, falling back to the working directory.
pub fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.desktop_dir().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

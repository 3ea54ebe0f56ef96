//! Command-line surface and the non-interactive commands.

use crate::capture::{capture_to_directory, ensure_directory};
use crate::config::Settings;
use crate::enroll::enroll_user;
use crate::identify::identify_user;
use crate::reader::{open_reader, Sdk};
use crate::session::run_session;
use crate::store::TemplateStore;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Capture, enroll and identify fingerprints.
///
/// Without a command an interactive session starts: it asks for a save
/// directory and then offers capture, enrollment and identification.
#[derive(Parser, Debug)]
#[command(name = "fpscan", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,

    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List detected readers
    Devices,
    /// Capture once and save the image and template
    Capture {
        /// Target directory [default: --output-dir]
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Enroll a finger under a user name
    Enroll { name: String },
    /// Identify the finger on the reader
    Identify,
    /// List enrolled users
    Users,
    /// Remove every template of a user
    Remove { name: String },
}

/// Runs `command`, or the interactive session when there is none.
pub fn execute(
    command: Option<Command>,
    settings: &Settings,
    sdk: &dyn Sdk,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> crate::Result<()> {
    let command = match command {
        Some(command) => command,
        None => {
            let store = TemplateStore::open(&settings.database)?;
            return run_session(sdk, &store, &settings.session_config(), input, out);
        }
    };

    match command {
        Command::Devices => {
            let readers = sdk.readers()?;
            if readers.is_empty() {
                writeln!(out, "{}", crate::ScanError::NoReaders)?;
            }
            for reader in readers {
                writeln!(out, "[{}] {} ({})", reader.index, reader.name, reader.description)?;
            }
        }
        Command::Capture { dir } => {
            let dir = dir.unwrap_or_else(|| settings.output_dir());
            ensure_directory(&dir, out)?;
            let mut reader = open_reader(sdk, settings.reader, settings.priority, out)?;
            capture_to_directory(
                reader.as_mut(),
                &settings.retry_policy(),
                &dir,
                settings.template_format,
                out,
            )?;
            writeln!(out, "Done.")?;
        }
        Command::Enroll { name } => {
            let store = TemplateStore::open(&settings.database)?;
            let mut reader = open_reader(sdk, settings.reader, settings.priority, out)?;
            enroll_user(reader.as_mut(), &store, &name, &settings.enroll_plan(), out)?;
        }
        Command::Identify => {
            let store = TemplateStore::open(&settings.database)?;
            let mut reader = open_reader(sdk, settings.reader, settings.priority, out)?;
            identify_user(reader.as_mut(), &store, &settings.identify_plan(), out)?;
        }
        Command::Users => {
            let store = TemplateStore::open(&settings.database)?;
            let names = store.names()?;
            if names.is_empty() {
                writeln!(out, "No enrolled users.")?;
            }
            for (name, count) in names {
                writeln!(out, "{} ({} template(s))", name, count)?;
            }
        }
        Command::Remove { name } => {
            let store = TemplateStore::open(&settings.database)?;
            let removed = store.delete(&name)?;
            writeln!(out, "Removed {} template(s) for {}.", removed, name)?;
        }
    }

    Ok(())
}

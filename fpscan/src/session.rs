//! Interactive prompt loop: save directory, then a menu until the user quits.

use crate::capture::{capture_to_directory, ensure_directory};
use crate::enroll::{enroll_user, EnrollPlan};
use crate::identify::{identify_user, IdentifyPlan};
use crate::reader::{open_reader, Priority, Sdk};
use crate::retry::RetryPolicy;
use crate::store::TemplateStore;
use crate::template::TemplateFormat;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Used when the directory prompt is left blank.
    pub default_dir: PathBuf,
    pub reader_index: usize,
    pub priority: Priority,
    pub capture: RetryPolicy,
    pub enroll: EnrollPlan,
    pub identify: IdentifyPlan,
    pub template_format: TemplateFormat,
}

pub fn run_session(
    sdk: &dyn Sdk,
    store: &TemplateStore,
    config: &SessionConfig,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> crate::Result<()> {
    writeln!(out, "Fingerprint Scanner App")?;
    let answer = prompt(
        input,
        out,
        &format!(
            "Enter directory to save fingerprint files (leave blank for {}): ",
            config.default_dir.display()
        ),
    )?;
    let dir = match answer {
        None => return Ok(()),
        Some(answer) if answer.is_empty() => config.default_dir.clone(),
        Some(answer) => PathBuf::from(answer),
    };

    if let Err(error) = ensure_directory(&dir, out) {
        writeln!(out, "Failed to create directory '{}': {}", dir.display(), error)?;
        return Ok(());
    }

    let mut reader = open_reader(sdk, config.reader_index, config.priority, out)?;

    loop {
        writeln!(out)?;
        writeln!(out, "1. Capture and save fingerprint")?;
        writeln!(out, "2. Enroll user")?;
        writeln!(out, "3. Identify user")?;
        writeln!(out, "q. Quit")?;

        let choice = match prompt(input, out, "Select an option: ")? {
            Some(choice) => choice,
            None => break,
        };

        let outcome = match choice.as_str() {
            "1" => capture_to_directory(
                reader.as_mut(),
                &config.capture,
                &dir,
                config.template_format,
                out,
            )
            .map(drop),
            "2" => {
                let name = match prompt(input, out, "Enter user name: ")? {
                    Some(name) => name,
                    None => break,
                };
                enroll_user(reader.as_mut(), store, &name, &config.enroll, out).map(drop)
            }
            "3" => identify_user(reader.as_mut(), store, &config.identify, out).map(drop),
            "q" | "quit" | "exit" => break,
            other => {
                writeln!(out, "Invalid option '{}'. Choose 1-3 or q.", other)?;
                continue;
            }
        };

        if let Err(error) = outcome {
            warn!(%error, "operation failed");
            writeln!(out, "Error: {}", error)?;
        }
    }

    writeln!(out, "Done.")?;

    Ok(())
}

/// Prints `message` and reads one trimmed line. `None` at end of input.
fn prompt(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    message: &str,
) -> crate::Result<Option<String>> {
    write!(out, "{}", message)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

use std::path::{Path, PathBuf};

/// An extracted fingerprint template (FMD). The bytes are opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template(Vec<u8>);

impl Template {
    pub fn new(bytes: Vec<u8>) -> crate::Result<Self> {
        if bytes.is_empty() {
            Err(crate::ScanError::EmptyTemplate)
        } else {
            Ok(Template(bytes))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized text form, lowercase hex.
    pub fn to_text(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_text(text: &str) -> crate::Result<Self> {
        Template::new(hex::decode(text.trim())?)
    }
}

/// How a template is written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TemplateFormat {
    /// The template bytes as returned by the SDK.
    Raw,
    /// Hex text, the same form stored in the database.
    Text,
}

impl TemplateFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TemplateFormat::Raw => "fmd",
            TemplateFormat::Text => "fmd.txt",
        }
    }
}

/// Writes `template` to `<dir>/<stem>.<ext>` and returns the path.
pub fn write_template(
    template: &Template,
    dir: &Path,
    stem: &str,
    format: TemplateFormat,
) -> crate::Result<PathBuf> {
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    match format {
        TemplateFormat::Raw => std::fs::write(&path, template.as_bytes())?,
        TemplateFormat::Text => std::fs::write(&path, template.to_text())?,
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScanError;

    #[test]
    fn text_form_survives_whitespace() {
        let template = Template::new(vec![0x00, 0x7f, 0xff, 0x10]).unwrap();
        let text = format!("  {}\n", template.to_text());

        assert_eq!(template.to_text(), "007fff10");
        assert_eq!(Template::from_text(&text).unwrap(), template);
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            Template::from_text("abc"),
            Err(ScanError::TemplateText(_))
        ));
        assert!(matches!(
            Template::from_text("zz"),
            Err(ScanError::TemplateText(_))
        ));
    }

    #[test]
    fn rejects_empty_templates() {
        assert!(matches!(Template::new(Vec::new()), Err(ScanError::EmptyTemplate)));
        assert!(matches!(Template::from_text(""), Err(ScanError::EmptyTemplate)));
    }

    #[test]
    fn writes_raw_and_text_files() {
        let dir = tempfile::tempdir().unwrap();
        let template = Template::new(vec![1, 2, 3]).unwrap();

        let raw = write_template(&template, dir.path(), "fingerprint", TemplateFormat::Raw).unwrap();
        let text =
            write_template(&template, dir.path(), "fingerprint", TemplateFormat::Text).unwrap();

        assert_eq!(raw, dir.path().join("fingerprint.fmd"));
        assert_eq!(std::fs::read(&raw).unwrap(), vec![1, 2, 3]);
        assert_eq!(text, dir.path().join("fingerprint.fmd.txt"));
        assert_eq!(std::fs::read_to_string(&text).unwrap(), "010203");
    }
}

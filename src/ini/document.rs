//! Order-preserving sectioned key/value document.

use super::line::Line;
use crate::runner::{
    Error, Result,
    utils::fs::write_atomic,
};
use std::{borrow::Cow, fmt, io, path::Path};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One `key=value` line of a section.
///
/// A line without `=` is kept as a *bare* entry: it has a key (the trimmed
/// line) but no value, and is written back exactly as read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    key: String,
    value: Option<String>,
}

impl Entry {
    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value, or `""` for a bare entry.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Returns `true` for lines that had no `=`.
    pub fn is_bare(&self) -> bool {
        self.value.is_none()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}

/// A named, ordered group of entries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    /// Returns the bracketed section name, e.g. `[/Script/Engine.Engine]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entries in file order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| !entry.is_bare() && entry.key == key)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => Self::CrLf,
            _ => Self::Lf,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// In-memory, order-preserving view of a sectioned key/value file such as
/// Unreal's `DefaultGame.ini`.
///
/// Reading then writing without mutation reproduces section order, entry
/// order and key/value text. Whitespace around keys and values is trimmed on
/// read; the writer emits the header, one line per entry, then one blank line
/// for every section. The source line ending (`\n` or `\r\n`) and a leading
/// byte order mark are kept.
///
/// Lines before the first section header have nowhere to live and are
/// dropped without error.
///
/// Section names may be given with or without brackets everywhere.
/// Duplicate headers are kept as separate sections; lookups search them in
/// file order and the first matching key wins.
///
/// # Examples
///
/// ```
/// use ue_build_orchestrator::ini::ConfigDocument;
///
/// let mut doc = ConfigDocument::parse_str(
///     "[/Script/EngineSettings.GeneralProjectSettings]\nProjectVersion=040125_dev_003\n",
/// );
/// let section = "/Script/EngineSettings.GeneralProjectSettings";
///
/// assert!(doc.has_entry(section, "ProjectVersion"));
/// doc.set_entry(section, "ProjectVersion", "040125_dev_004").unwrap();
/// assert_eq!(doc.get_entry(section, "ProjectVersion"), "040125_dev_004");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigDocument {
    sections: Vec<Section>,
    line_ending: LineEnding,
    byte_order_mark: bool,
}

impl ConfigDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] when the file does not exist,
    /// [`Error::ConfigRead`] for any other read failure.
    pub fn parse(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                Error::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let doc = Self::parse_str(&text);
        log::debug!(
            "Parsed {} ({} sections)",
            path.display(),
            doc.sections.len()
        );
        Ok(doc)
    }

    /// Parses in-memory text.
    pub fn parse_str(text: &str) -> Self {
        let (text, byte_order_mark) = match text.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        let mut doc = Self {
            sections: Vec::new(),
            line_ending: LineEnding::detect(text),
            byte_order_mark,
        };

        for raw in text.lines() {
            match Line::classify(raw) {
                Line::Blank => {}
                Line::Header(name) => doc.sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                }),
                Line::Entry { key, value } => doc.push_entry(Entry {
                    key: key.to_string(),
                    value: Some(value.to_string()),
                }),
                Line::Bare(bare) => doc.push_entry(Entry {
                    key: bare.to_string(),
                    value: None,
                }),
            }
        }

        doc
    }

    fn push_entry(&mut self, entry: Entry) {
        match self.sections.last_mut() {
            Some(section) => section.entries.push(entry),
            None => log::trace!("Dropping line outside any section: {entry}"),
        }
    }

    /// Returns all sections in file order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the first section with the given name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        let name = normalize_section_name(name);
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns `true` if the section exists and holds `key`.
    pub fn has_entry(&self, section: &str, key: &str) -> bool {
        self.find(section, key).is_some()
    }

    /// Returns the value stored under `key`, or an empty string when the
    /// section or key is absent.
    ///
    /// Use [`has_entry`](Self::has_entry) to tell "absent" from "empty".
    pub fn get_entry(&self, section: &str, key: &str) -> String {
        self.find(section, key)
            .map(|(s, e)| self.sections[s].entries[e].value().to_string())
            .unwrap_or_default()
    }

    /// Replaces the value of an existing entry, keeping its position.
    ///
    /// # Errors
    ///
    /// [`Error::SectionNotFound`] if no section has that name and
    /// [`Error::EntryNotFound`] if the key is missing; the document is left
    /// unchanged in both cases. Use [`add_entry`](Self::add_entry) to create.
    pub fn set_entry(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        let name = normalize_section_name(section);
        if !self.sections.iter().any(|s| s.name == name) {
            return Err(Error::SectionNotFound {
                section: name.into_owned(),
            });
        }

        let (s, e) = self.find(section, key).ok_or_else(|| Error::EntryNotFound {
            section: name.to_string(),
            key: key.to_string(),
        })?;
        self.sections[s].entries[e].value = Some(value.to_string());
        Ok(())
    }

    /// Sets `key` in `section`, creating whatever is missing.
    ///
    /// An existing key is updated in place. A new key is appended to the
    /// first section with that name; a new section is appended to the end of
    /// the document.
    pub fn add_entry(&mut self, section: &str, key: &str, value: &str) {
        if let Some((s, e)) = self.find(section, key) {
            self.sections[s].entries[e].value = Some(value.to_string());
            return;
        }

        let name = normalize_section_name(section);
        let entry = Entry {
            key: key.to_string(),
            value: Some(value.to_string()),
        };

        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.entries.push(entry),
            None => self.sections.push(Section {
                name: name.into_owned(),
                entries: vec![entry],
            }),
        }
    }

    /// Writes the document to `path`, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// [`Error::WriteFailure`] if the destination cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_string().as_bytes())?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn find(&self, section: &str, key: &str) -> Option<(usize, usize)> {
        let name = normalize_section_name(section);
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.name == name)
            .find_map(|(i, s)| s.position(key).map(|e| (i, e)))
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eol = self.line_ending.as_str();
        if self.byte_order_mark {
            write!(f, "{BYTE_ORDER_MARK}")?;
        }
        for section in &self.sections {
            write!(f, "{}{eol}", section.name)?;
            for entry in &section.entries {
                write!(f, "{entry}{eol}")?;
            }
            f.write_str(eol)?;
        }
        Ok(())
    }
}

/// Adds surrounding brackets to a section name when they are missing.
///
/// ```
/// use ue_build_orchestrator::ini::normalize_section_name;
///
/// assert_eq!(normalize_section_name("Foo"), "[Foo]");
/// assert_eq!(normalize_section_name("[Foo]"), "[Foo]");
/// ```
pub fn normalize_section_name(name: &str) -> Cow<'_, str> {
    let name = name.trim();
    if name.starts_with('[') && name.ends_with(']') {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!(
            "[{}]",
            name.trim_start_matches('[').trim_end_matches(']')
        ))
    }
}

//! Line classification for sectioned key/value files.

/// One classified line of a configuration file.
///
/// Every line is trimmed before it is classified, so a header or entry may be
/// indented or carry trailing whitespace.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Line<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// `[Section.Name]`, kept with its brackets.
    Header(&'a str),
    /// `key=value`, split on the first `=` with both halves trimmed.
    Entry { key: &'a str, value: &'a str },
    /// A non-blank line without `=` (comments, stray text).
    Bare(&'a str),
}

impl<'a> Line<'a> {
    pub(crate) fn classify(raw: &'a str) -> Self {
        let line = raw.trim();

        if line.is_empty() {
            return Self::Blank;
        }

        if line.starts_with('[') && line.ends_with(']') {
            return Self::Header(line);
        }

        match line.split_once('=') {
            Some((key, value)) => Self::Entry {
                key: key.trim(),
                value: value.trim(),
            },
            None => Self::Bare(line),
        }
    }
}

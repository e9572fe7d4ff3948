// TraceSweep - core/pattern.rs
//
// Pattern normalisation shared by the finder and the filter.
//
// Patterns are `/`-separated and matched one segment at a time: `*`, `?` and
// `[...]` never cross a separator, and `**` is not recursive (as a whole
// segment it behaves like `*`). A single leading separator is presentational
// only; `/abs/*.log` and `abs/*.log` are the same pattern.

use crate::util::constants::{MAX_PATTERN_LENGTH, SEPARATOR};
use crate::util::error::PatternError;
use glob::MatchOptions;

/// Options for matching one segment against one entry name.
const SEGMENT_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Strip a single leading separator, if present.
pub fn strip_leading_separator(pattern: &str) -> &str {
    pattern.strip_prefix(SEPARATOR).unwrap_or(pattern)
}

/// True if `segment` contains glob metacharacters.
pub fn contains_glob_meta(segment: &str) -> bool {
    segment.contains(&['*', '?', '['][..])
}

/// Render a root-relative path in canonical form (`/` + relative path).
pub fn canonical_path(relative: &str) -> String {
    let mut out = String::with_capacity(relative.len() + 1);
    out.push(SEPARATOR);
    out.push_str(strip_leading_separator(relative));
    out
}

/// Join a root-relative directory and an entry name. The root is `""`.
pub fn join_relative(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}

/// One `/`-delimited piece of a parsed pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Looked up directly, no listing needed.
    Literal(String),
    /// Matched against every entry of the parent directory.
    Glob(glob::Pattern),
}

impl Segment {
    /// Match a single entry name against this segment.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == name,
            Self::Glob(pattern) => pattern.matches_with(name, SEGMENT_MATCH),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(literal) => literal,
            Self::Glob(pattern) => pattern.as_str(),
        }
    }
}

/// A validated, normalised pattern split into segments.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl SearchPattern {
    /// Validate and normalise `raw`.
    ///
    /// Empty segments (`a//b`, trailing `/`) are collapsed. `.` and `..`
    /// segments are rejected so a pattern can never leave the root.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.len() > MAX_PATTERN_LENGTH {
            return Err(PatternError::TooLong {
                length: raw.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        let mut segments = Vec::new();
        for piece in strip_leading_separator(raw)
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
        {
            if piece == "." || piece == ".." {
                return Err(PatternError::EscapesRoot {
                    pattern: raw.to_string(),
                });
            }
            let segment = if contains_glob_meta(piece) {
                let compiled = glob::Pattern::new(piece).map_err(|source| PatternError::Syntax {
                    pattern: raw.to_string(),
                    source,
                })?;
                Segment::Glob(compiled)
            } else {
                Segment::Literal(piece.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern as the caller wrote it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Canonical rendering, e.g. `abs//*.log` becomes `/abs/*.log`.
    pub fn canonical(&self) -> String {
        let joined = self
            .segments
            .iter()
            .map(Segment::as_str)
            .collect::<Vec<_>>()
            .join("/");
        canonical_path(&joined)
    }

    /// Match a whole path, segment by segment. The path may be given with or
    /// without its leading separator.
    pub fn matches_path(&self, path: &str) -> bool {
        let mut names = strip_leading_separator(path)
            .split(SEPARATOR)
            .filter(|s| !s.is_empty());
        for segment in &self.segments {
            match names.next() {
                Some(name) if segment.matches(name) => {}
                _ => return false,
            }
        }
        names.next().is_none()
    }
}

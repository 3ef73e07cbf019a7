//! Usage classifications, data kinds, job states, and tree tabs.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and provide `as_str()` for the TEXT representation stored in SQL columns.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

/// Audience classification attached to projects, analyses, and jobs.
///
/// `Internal` entries are staff-only, `User` entries belong to the creating
/// account, `Public` entries are readable by every authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    Internal,
    User,
    Public,
}

impl Usage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::User => "user",
            Self::Public => "public",
        }
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DataKind
// ---------------------------------------------------------------------------

/// Typed classification of a data entry's backing file.
///
/// Documents ingested with an unrecognized `data_type` land on `Unknown`
/// rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Fasta,
    Fastq,
    Sam,
    Bam,
    Bed,
    Gff,
    Csv,
    Tsv,
    Text,
    Directory,
    Unknown,
}

impl DataKind {
    /// Resolve a declared `data_type` label through the fixed registry.
    /// Unrecognized labels classify as `Unknown`, never an error.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::to_ascii_lowercase).as_deref() {
            Some("fasta" | "fa") => Self::Fasta,
            Some("fastq" | "fq") => Self::Fastq,
            Some("sam") => Self::Sam,
            Some("bam") => Self::Bam,
            Some("bed") => Self::Bed,
            Some("gff" | "gtf") => Self::Gff,
            Some("csv") => Self::Csv,
            Some("tsv") => Self::Tsv,
            Some("text" | "txt") => Self::Text,
            Some("directory" | "dir") => Self::Directory,
            _ => Self::Unknown,
        }
    }

    /// Classify a file by its extension, for deposits that carry no declared
    /// type.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str());
        Self::from_label(ext)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fasta => "fasta",
            Self::Fastq => "fastq",
            Self::Sam => "sam",
            Self::Bam => "bam",
            Self::Bed => "bed",
            Self::Gff => "gff",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Text => "text",
            Self::Directory => "directory",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// JobState
// ---------------------------------------------------------------------------

/// Lifecycle state of a job. Galley only ever creates `Queued` jobs; the
/// transitions beyond that are driven by the external execution engine.
///
/// ```text
/// queued → running → finished
///                  → error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Running,
    Finished,
    Error,
}

impl JobState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Queued => &[Self::Running],
            Self::Running => &[Self::Finished, Self::Error],
            Self::Finished | Self::Error => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

/// The sub-collection of a project addressed by the second virtual path
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Analyses,
    Jobs,
    Data,
}

impl Tab {
    /// All tabs in the order they are listed under a project directory.
    pub const ALL: [Self; 3] = [Self::Analyses, Self::Jobs, Self::Data];

    /// Parse a path segment into a tab label. Unknown labels return `None`;
    /// callers decide how to reply.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "analyses" => Some(Self::Analyses),
            "jobs" => Some(Self::Jobs),
            "data" => Some(Self::Data),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analyses => "analyses",
            Self::Jobs => "jobs",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use std::path::PathBuf;

/// What happened to a single enclosure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnclosureOutcome {
    /// Body written to `path`
    Stored { path: PathBuf, bytes: u64 },
    /// A file with the derived name was already present; nothing was written
    AlreadyExists { path: PathBuf },
    /// Skipped because of an error; the task carries on
    Failed { url: String, reason: String },
}

impl EnclosureOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }
}

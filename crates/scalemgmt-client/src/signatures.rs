//! Typed extraction of the storage manager's vendor error signatures.
//!
//! The GUI embeds domain error codes (`EFSSP1102C`, `EFSSG0762C`, ...) and
//! diagnostic fragments ("Invalid value in 'filesetName'") inside otherwise
//! opaque message and stderr text. Scanning happens exactly once, at the
//! response-parsing boundary; everything downstream (idempotency tables,
//! existence checks) matches against [`ErrorSignature`] values instead of
//! re-running substring searches on raw text.

use std::fmt;

/// A recognized fragment of remote error text, lifted into a typed value.
///
/// Each variant carries one or more literal tokens the GUI is known to emit.
/// Unrecognized text simply produces no signatures; it is never an error to
/// scan arbitrary output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSignature {
    /// The target object already exists (filesets, snapshots).
    AlreadyExists,
    /// The target path already exists (directories, symlinks).
    PathAlreadyExists,
    /// The target was already removed (symlinks).
    AlreadyRemoved,
    /// The named fileset does not exist.
    FilesetAbsent,
    /// The named snapshot does not exist.
    SnapshotAbsent,
    /// The named nodeclass does not exist.
    NodeclassAbsent,
    /// The named file or directory does not exist.
    FileAbsent,
    /// The named storage pool does not exist.
    StoragePoolAbsent,
}

impl ErrorSignature {
    /// Every signature the scanner knows about.
    pub const ALL: [ErrorSignature; 8] = [
        ErrorSignature::AlreadyExists,
        ErrorSignature::PathAlreadyExists,
        ErrorSignature::AlreadyRemoved,
        ErrorSignature::FilesetAbsent,
        ErrorSignature::SnapshotAbsent,
        ErrorSignature::NodeclassAbsent,
        ErrorSignature::FileAbsent,
        ErrorSignature::StoragePoolAbsent,
    ];

    /// The literal tokens that identify this signature in remote text.
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::AlreadyExists => &["EFSSP1102C"],
            Self::PathAlreadyExists => &["EFSSG0762C"],
            Self::AlreadyRemoved => &["EFSSG2006C"],
            // The GUI names the offending parameter differently depending on
            // the endpoint; both spellings mean the fileset is not there.
            Self::FilesetAbsent => &[
                "Invalid value in 'filesetName'",
                "Invalid value in 'fsetName'",
            ],
            Self::SnapshotAbsent => &["Invalid value in 'snapshotName'"],
            Self::NodeclassAbsent => &["Invalid value in nodeclassName"],
            Self::FileAbsent => &["File not found"],
            Self::StoragePoolAbsent => &["Invalid value in 'storagePool'"],
        }
    }

    /// Whether `text` contains any of this signature's tokens.
    pub fn matches(self, text: &str) -> bool {
        self.tokens().iter().any(|token| text.contains(token))
    }

    /// Scan a single piece of text for all recognized signatures.
    pub fn scan(text: &str) -> Vec<ErrorSignature> {
        Self::ALL
            .into_iter()
            .filter(|signature| signature.matches(text))
            .collect()
    }

    /// Scan several lines (e.g. a job's stderr) for all recognized
    /// signatures, deduplicated.
    pub fn scan_lines<'a, I>(lines: I) -> Vec<ErrorSignature>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = Vec::new();
        for line in lines {
            for signature in Self::scan(line) {
                if !found.contains(&signature) {
                    found.push(signature);
                }
            }
        }
        found
    }
}

impl fmt::Display for ErrorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "already exists"),
            Self::PathAlreadyExists => write!(f, "path already exists"),
            Self::AlreadyRemoved => write!(f, "already removed"),
            Self::FilesetAbsent => write!(f, "fileset absent"),
            Self::SnapshotAbsent => write!(f, "snapshot absent"),
            Self::NodeclassAbsent => write!(f, "nodeclass absent"),
            Self::FileAbsent => write!(f, "file absent"),
            Self::StoragePoolAbsent => write!(f, "storage pool absent"),
        }
    }
}

//! Per-operation tables of benign failures.
//!
//! A mutating command whose goal state is already satisfied fails on the
//! remote side ("snapshot already exists", "symlink already removed"). For
//! idempotent callers that failure is a success. The tables below register,
//! per operation kind, exactly which [`ErrorSignature`]s may be absorbed;
//! everything else propagates unchanged. This is best-effort idempotency
//! over vendor-defined codes, not a guarantee.

use std::fmt;

use tracing::info;

use crate::errors::ClientError;
use crate::signatures::ErrorSignature;

/// The domain operation a command performs, used to select its benign table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateFileset,
    UpdateFileset,
    DeleteFileset,
    LinkFileset,
    UnlinkFileset,
    CreateSnapshot,
    DeleteSnapshot,
    MakeDirectory,
    DeleteDirectory,
    StatDirectory,
    CreateSymlink,
    DeleteSymlink,
    MountFilesystem,
    UnmountFilesystem,
    SetFilesetQuota,
    SetFilesystemPolicy,
}

impl OperationKind {
    /// The failure signatures this operation treats as "goal already
    /// satisfied". Kinds without an entry return an empty slice and absorb
    /// nothing.
    pub fn benign_signatures(self) -> &'static [ErrorSignature] {
        match self {
            Self::CreateFileset | Self::CreateSnapshot => &[ErrorSignature::AlreadyExists],
            Self::MakeDirectory | Self::CreateSymlink => &[ErrorSignature::PathAlreadyExists],
            Self::DeleteSymlink => &[ErrorSignature::AlreadyRemoved],
            Self::DeleteFileset => &[ErrorSignature::FilesetAbsent],
            _ => &[],
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateFileset => "create fileset",
            Self::UpdateFileset => "update fileset",
            Self::DeleteFileset => "delete fileset",
            Self::LinkFileset => "link fileset",
            Self::UnlinkFileset => "unlink fileset",
            Self::CreateSnapshot => "create snapshot",
            Self::DeleteSnapshot => "delete snapshot",
            Self::MakeDirectory => "make directory",
            Self::DeleteDirectory => "delete directory",
            Self::StatDirectory => "stat directory",
            Self::CreateSymlink => "create symlink",
            Self::DeleteSymlink => "delete symlink",
            Self::MountFilesystem => "mount filesystem",
            Self::UnmountFilesystem => "unmount filesystem",
            Self::SetFilesetQuota => "set fileset quota",
            Self::SetFilesystemPolicy => "set filesystem policy",
        };
        write!(f, "{name}")
    }
}

/// Decide whether a failure is benign for `kind`.
///
/// Returns `Ok(())` when the error carries a signature registered for the
/// operation kind — the caller reports success. Every other error, and every
/// error variant that can never carry signatures (`Protocol`, `Transport`,
/// `Unauthenticated`, ...), is returned unchanged.
pub fn absorb_benign_failure(kind: OperationKind, err: ClientError) -> Result<(), ClientError> {
    let benign = kind.benign_signatures();
    if !benign.is_empty() && err.signatures().iter().any(|s| benign.contains(s)) {
        info!(operation = %kind, error = %err, "treating failure as already-satisfied");
        return Ok(());
    }
    Err(err)
}

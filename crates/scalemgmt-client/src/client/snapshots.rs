//! Snapshot operations.

use tracing::debug;

use crate::client::{absent_on, json_body, GuiClient};
use crate::errors::{ClientError, Result};
use crate::executor::{CommandExecutor, HttpVerb};
use crate::idempotency::OperationKind;
use crate::requests::{encode_rel_path, CopyPathRequest, SnapshotRequest};
use crate::resources::{InfoReply, Snapshot, SnapshotsReply};
use crate::signatures::ErrorSignature;

impl<E: CommandExecutor> GuiClient<E> {
    /// Create a fileset snapshot. Succeeds when the snapshot already exists.
    pub async fn create_snapshot(
        &self,
        filesystem: &str,
        fileset: &str,
        snapshot: &str,
    ) -> Result<()> {
        debug!(filesystem, fileset, snapshot, "create snapshot");
        let path =
            format!("scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/snapshots");
        let body = json_body(&SnapshotRequest {
            snapshot_name: snapshot.to_string(),
        })?;
        self.run_job_operation(OperationKind::CreateSnapshot, HttpVerb::Post, &path, body)
            .await?;
        Ok(())
    }

    /// Delete a fileset snapshot.
    pub async fn delete_snapshot(
        &self,
        filesystem: &str,
        fileset: &str,
        snapshot: &str,
    ) -> Result<()> {
        debug!(filesystem, fileset, snapshot, "delete snapshot");
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/snapshots/{snapshot}"
        );
        self.run_job_operation(OperationKind::DeleteSnapshot, HttpVerb::Delete, &path, None)
            .await?;
        Ok(())
    }

    /// Details of one snapshot.
    pub async fn snapshot_details(
        &self,
        filesystem: &str,
        fileset: &str,
        snapshot: &str,
    ) -> Result<Snapshot> {
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/snapshots/{snapshot}"
        );
        let reply: SnapshotsReply = self.fetch(&path).await?;
        reply.snapshots.into_iter().next().ok_or_else(|| {
            ClientError::protocol(format!("no snapshot returned for {snapshot}"))
        })
    }

    /// The snapshot's numeric id as an opaque string handle.
    pub async fn snapshot_uid(
        &self,
        filesystem: &str,
        fileset: &str,
        snapshot: &str,
    ) -> Result<String> {
        let snapshot = self.snapshot_details(filesystem, fileset, snapshot).await?;
        Ok(snapshot.snap_id.to_string())
    }

    /// The snapshot's creation timestamp as reported by the GUI.
    pub async fn snapshot_create_timestamp(
        &self,
        filesystem: &str,
        fileset: &str,
        snapshot: &str,
    ) -> Result<String> {
        let snapshot = self.snapshot_details(filesystem, fileset, snapshot).await?;
        Ok(snapshot.created)
    }

    /// Whether the snapshot exists. A recognized absence reply is
    /// `Ok(false)`, never an error.
    pub async fn snapshot_exists(
        &self,
        filesystem: &str,
        fileset: &str,
        snapshot: &str,
    ) -> Result<bool> {
        match self.snapshot_details(filesystem, fileset, snapshot).await {
            Ok(_) => Ok(true),
            Err(err) => absent_on(err, ErrorSignature::SnapshotAbsent),
        }
    }

    /// All snapshots of a fileset.
    pub async fn list_fileset_snapshots(
        &self,
        filesystem: &str,
        fileset: &str,
    ) -> Result<Vec<Snapshot>> {
        let path =
            format!("scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/snapshots");
        let reply: SnapshotsReply = self.fetch(&path).await?;
        Ok(reply.snapshots)
    }

    /// The most recent snapshots of a fileset.
    pub async fn latest_fileset_snapshots(
        &self,
        filesystem: &str,
        fileset: &str,
    ) -> Result<Vec<Snapshot>> {
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/snapshots/latest"
        );
        let reply: SnapshotsReply = self.fetch(&path).await?;
        Ok(reply.snapshots)
    }

    /// Whether the server advertises the snapshot-copy capability.
    pub async fn is_snapshot_supported(&self) -> Result<bool> {
        let reply: InfoReply = self.fetch("scalemgmt/v2/info").await?;
        Ok(!reply.info.paths.snap_copy_op.is_empty())
    }

    /// Start copying a path out of a snapshot into `target_path`.
    ///
    /// Returns the numeric status and job handle; pass both to
    /// [`GuiClient::wait_for_job_completion`] once ready to block.
    pub async fn copy_fset_snapshot_path(
        &self,
        filesystem: &str,
        fileset: &str,
        snapshot: &str,
        src_path: &str,
        target_path: &str,
        node_class: Option<&str>,
    ) -> Result<(u16, u64)> {
        debug!(
            filesystem,
            fileset, snapshot, src_path, target_path, "copy snapshot path"
        );
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/snapshotCopy/{snapshot}/path/{}",
            encode_rel_path(src_path)
        );
        let body = json_body(&CopyPathRequest::new(target_path, node_class))?;
        self.submit_deferred(HttpVerb::Put, &path, body).await
    }
}

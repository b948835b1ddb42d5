//! Fileset operations: lifecycle, linking and quotas.

use tracing::debug;

use crate::client::{absent_on, json_body, GuiClient};
use crate::errors::{ClientError, Result};
use crate::executor::{CommandExecutor, HttpVerb};
use crate::idempotency::OperationKind;
use crate::requests::{FilesetOptions, FilesetRequest, LinkFilesetRequest, SetQuotaRequest};
use crate::resources::{Fileset, FilesetsReply, Quota, QuotasReply};
use crate::signatures::ErrorSignature;

impl<E: CommandExecutor> GuiClient<E> {
    /// Create a fileset. Succeeds when the fileset already exists.
    pub async fn create_fileset(
        &self,
        filesystem: &str,
        fileset: &str,
        opts: &FilesetOptions,
    ) -> Result<()> {
        debug!(filesystem, fileset, "create fileset");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/filesets");
        let body = json_body(&FilesetRequest::create(fileset, opts))?;
        self.run_job_operation(OperationKind::CreateFileset, HttpVerb::Post, &path, body)
            .await?;
        Ok(())
    }

    /// Update a fileset's inode limit.
    pub async fn update_fileset(
        &self,
        filesystem: &str,
        fileset: &str,
        opts: &FilesetOptions,
    ) -> Result<()> {
        debug!(filesystem, fileset, "update fileset");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}");
        let body = json_body(&FilesetRequest::update(opts))?;
        self.run_job_operation(OperationKind::UpdateFileset, HttpVerb::Put, &path, body)
            .await?;
        Ok(())
    }

    /// Delete a fileset. Succeeds when the fileset is already gone.
    pub async fn delete_fileset(&self, filesystem: &str, fileset: &str) -> Result<()> {
        debug!(filesystem, fileset, "delete fileset");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}");
        self.run_job_operation(OperationKind::DeleteFileset, HttpVerb::Delete, &path, None)
            .await?;
        Ok(())
    }

    /// Link a fileset at `link_path`.
    pub async fn link_fileset(
        &self,
        filesystem: &str,
        fileset: &str,
        link_path: &str,
    ) -> Result<()> {
        debug!(filesystem, fileset, link_path, "link fileset");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/link");
        let body = json_body(&LinkFilesetRequest {
            path: link_path.to_string(),
        })?;
        self.run_job_operation(OperationKind::LinkFileset, HttpVerb::Post, &path, body)
            .await?;
        Ok(())
    }

    /// Forcibly unlink a fileset from the filesystem namespace.
    pub async fn unlink_fileset(&self, filesystem: &str, fileset: &str) -> Result<()> {
        debug!(filesystem, fileset, "unlink fileset");
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/link?force=True"
        );
        self.run_job_operation(OperationKind::UnlinkFileset, HttpVerb::Delete, &path, None)
            .await?;
        Ok(())
    }

    /// Details of one fileset.
    pub async fn fileset_details(&self, filesystem: &str, fileset: &str) -> Result<Fileset> {
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}");
        let reply: FilesetsReply = self.fetch(&path).await?;
        reply.filesets.into_iter().next().ok_or_else(|| {
            ClientError::protocol(format!("no fileset returned for {fileset}"))
        })
    }

    /// Look a fileset up by its numeric id.
    pub async fn fileset_by_id(&self, filesystem: &str, id: u64) -> Result<Fileset> {
        let path =
            format!("scalemgmt/v2/filesystems/{filesystem}/filesets?filter=config.id={id}");
        let reply: FilesetsReply = self.fetch(&path).await?;
        reply.filesets.into_iter().next().ok_or_else(|| {
            ClientError::protocol(format!("no fileset found for id {id}"))
        })
    }

    /// All filesets sharing an inode space.
    pub async fn filesets_in_inode_space(
        &self,
        filesystem: &str,
        inode_space: u64,
    ) -> Result<Vec<Fileset>> {
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/filesets?filter=config.inodeSpace={inode_space}"
        );
        let reply: FilesetsReply = self.fetch(&path).await?;
        Ok(reply.filesets)
    }

    /// Whether the fileset exists. A recognized absence reply is `Ok(false)`,
    /// never an error.
    pub async fn fileset_exists(&self, filesystem: &str, fileset: &str) -> Result<bool> {
        match self.fileset_details(filesystem, fileset).await {
            Ok(_) => Ok(true),
            Err(err) => absent_on(err, ErrorSignature::FilesetAbsent),
        }
    }

    /// Whether the fileset is linked into the namespace.
    pub async fn is_fileset_linked(&self, filesystem: &str, fileset: &str) -> Result<bool> {
        let fileset = self.fileset_details(filesystem, fileset).await?;
        Ok(fileset.is_linked())
    }

    /// Set the fileset's block quota (hard and soft limit alike).
    pub async fn set_fileset_quota(
        &self,
        filesystem: &str,
        fileset: &str,
        quota: &str,
    ) -> Result<()> {
        debug!(filesystem, fileset, quota, "set fileset quota");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/quotas");
        let body = json_body(&SetQuotaRequest::fileset(fileset, quota))?;
        self.run_job_operation(OperationKind::SetFilesetQuota, HttpVerb::Post, &path, body)
            .await?;
        Ok(())
    }

    /// Quota record for one fileset, if any is set.
    pub async fn fileset_quota_details(
        &self,
        filesystem: &str,
        fileset: &str,
    ) -> Result<Option<Quota>> {
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/quotas?filter=objectName={fileset}"
        );
        let reply: QuotasReply = self.fetch(&path).await?;
        Ok(reply.quotas.into_iter().next())
    }

    /// The fileset's hard block limit formatted in KiB, `None` when unset.
    pub async fn list_fileset_quota(
        &self,
        filesystem: &str,
        fileset: &str,
    ) -> Result<Option<String>> {
        let quota = self.fileset_quota_details(filesystem, fileset).await?;
        Ok(quota
            .filter(|quota| quota.block_limit > 0)
            .map(|quota| format!("{}K", quota.block_limit)))
    }

    /// Probe that the quota endpoint answers for this filesystem.
    pub async fn check_quota_enabled(&self, filesystem: &str) -> Result<()> {
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/quotas");
        let _: QuotasReply = self.fetch(&path).await?;
        Ok(())
    }
}

//! Filesystem-level operations: mount state, details, policies, pools.

use tracing::debug;

use crate::client::{absent_on, json_body, GuiClient};
use crate::errors::{ClientError, Result};
use crate::executor::{CommandExecutor, HttpVerb};
use crate::idempotency::OperationKind;
use crate::requests::{NodesRequest, PolicyRequest};
use crate::resources::{
    Filesystem, FilesystemsReply, MountInfo, StoragePool, StoragePoolsReply,
};
use crate::signatures::ErrorSignature;

impl<E: CommandExecutor> GuiClient<E> {
    /// Mount a filesystem on one node.
    pub async fn mount_filesystem(&self, filesystem: &str, node: &str) -> Result<()> {
        debug!(filesystem, node, "mount filesystem");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/mount");
        let body = json_body(&NodesRequest::single(node))?;
        self.run_job_operation(OperationKind::MountFilesystem, HttpVerb::Put, &path, body)
            .await?;
        Ok(())
    }

    /// Unmount a filesystem on one node.
    pub async fn unmount_filesystem(&self, filesystem: &str, node: &str) -> Result<()> {
        debug!(filesystem, node, "unmount filesystem");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/unmount");
        let body = json_body(&NodesRequest::single(node))?;
        self.run_job_operation(OperationKind::UnmountFilesystem, HttpVerb::Put, &path, body)
            .await?;
        Ok(())
    }

    /// Details of one filesystem.
    pub async fn filesystem_details(&self, filesystem: &str) -> Result<Filesystem> {
        let path = format!("scalemgmt/v2/filesystems/{filesystem}");
        let reply: FilesystemsReply = self.fetch(&path).await?;
        reply.filesystems.into_iter().next().ok_or_else(|| {
            ClientError::protocol(format!("no filesystem returned for {filesystem}"))
        })
    }

    /// Mount information of one filesystem.
    pub async fn filesystem_mount_details(&self, filesystem: &str) -> Result<MountInfo> {
        Ok(self.filesystem_details(filesystem).await?.mount)
    }

    /// The filesystem's mount point.
    pub async fn filesystem_mountpoint(&self, filesystem: &str) -> Result<String> {
        Ok(self.filesystem_details(filesystem).await?.mount.mount_point)
    }

    /// The filesystem's UUID.
    pub async fn filesystem_uuid(&self, filesystem: &str) -> Result<String> {
        Ok(self.filesystem_details(filesystem).await?.uuid)
    }

    /// Resolve a filesystem name from its UUID.
    pub async fn filesystem_name_by_uuid(&self, uuid: &str) -> Result<String> {
        let path = format!("scalemgmt/v2/filesystems?filter=uuid={uuid}");
        let reply: FilesystemsReply = self.fetch(&path).await?;
        reply
            .filesystems
            .into_iter()
            .next()
            .map(|filesystem| filesystem.name)
            .ok_or_else(|| {
                ClientError::protocol(format!("no filesystem found for uuid {uuid}"))
            })
    }

    /// Names of all filesystems known to the GUI.
    pub async fn list_filesystems(&self) -> Result<Vec<String>> {
        let reply: FilesystemsReply = self.fetch("scalemgmt/v2/filesystems").await?;
        Ok(reply
            .filesystems
            .into_iter()
            .map(|filesystem| filesystem.name)
            .collect())
    }

    /// Whether the filesystem is mounted on the GUI node. Any mount status
    /// other than "mounted"/"not mounted" is a malformed reply.
    pub async fn is_filesystem_mounted_on_gui_node(&self, filesystem: &str) -> Result<bool> {
        let mount = self.filesystem_mount_details(filesystem).await?;
        match mount.status.as_str() {
            "mounted" => Ok(true),
            "not mounted" => Ok(false),
            other => Err(ClientError::protocol(format!(
                "cannot determine mount status of {filesystem}: '{other}'"
            ))),
        }
    }

    /// Install a placement/migration policy on the filesystem.
    pub async fn set_filesystem_policy(
        &self,
        filesystem: &str,
        policy: &PolicyRequest,
    ) -> Result<()> {
        debug!(filesystem, "set filesystem policy");
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/policies");
        let body = json_body(policy)?;
        self.run_job_operation(
            OperationKind::SetFilesystemPolicy,
            HttpVerb::Put,
            &path,
            body,
        )
        .await?;
        Ok(())
    }

    /// Details of one storage pool.
    pub async fn pool_info(&self, pool: &str, filesystem: &str) -> Result<StoragePool> {
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/pools/{pool}");
        let reply: StoragePoolsReply = self.fetch(&path).await?;
        reply.storage_pools.into_iter().next().ok_or_else(|| {
            ClientError::protocol(format!("no storage pool returned for {filesystem}"))
        })
    }

    /// Whether the named pool exists on the filesystem. A recognized absence
    /// reply is `Ok(false)`, never an error.
    pub async fn does_pool_exist(&self, pool: &str, filesystem: &str) -> Result<bool> {
        match self.pool_info(pool, filesystem).await {
            Ok(_) => Ok(true),
            Err(err) => absent_on(err, ErrorSignature::StoragePoolAbsent),
        }
    }

    /// The first non-system pool holding data, falling back to `system`.
    pub async fn first_data_pool(&self, filesystem: &str) -> Result<String> {
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/pools");
        let reply: StoragePoolsReply = self.fetch(&path).await?;

        for pool in &reply.storage_pools {
            if pool.name == "system" {
                continue;
            }
            let info = self.pool_info(&pool.name, &pool.filesystem_name).await?;
            if info.total_data_in_kb > 0 {
                debug!(pool = %info.name, "selected default data pool");
                return Ok(info.name);
            }
        }

        debug!("defaulting to system pool");
        Ok("system".to_string())
    }

    /// Whether a policy partition with this name is already installed.
    /// Errors count as "not installed": the caller overrides by re-applying.
    pub async fn default_policy_partition_exists(
        &self,
        partition: &str,
        filesystem: &str,
    ) -> bool {
        let path = format!("scalemgmt/v2/filesystems/{filesystem}/partition/{partition}");
        self.fetch::<serde_json::Value>(&path).await.is_ok()
    }
}

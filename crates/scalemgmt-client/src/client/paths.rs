//! Directory, symlink and path-copy operations.

use tracing::debug;

use crate::client::{absent_on, json_body, GuiClient};
use crate::errors::{ClientError, Result};
use crate::executor::{CommandExecutor, HttpVerb};
use crate::idempotency::OperationKind;
use crate::requests::{
    encode_rel_path, CopyPathRequest, DirOwner, MakeDirRequest, SymlinkRequest,
};
use crate::resources::OwnerReply;
use crate::signatures::ErrorSignature;

impl<E: CommandExecutor> GuiClient<E> {
    /// Create a directory. Succeeds when the path already exists.
    pub async fn make_directory(
        &self,
        filesystem: &str,
        rel_path: &str,
        owner: &DirOwner,
    ) -> Result<()> {
        debug!(filesystem, rel_path, "make directory");
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/directory/{}",
            encode_rel_path(rel_path)
        );
        let body = json_body(&MakeDirRequest::from_owner(owner))?;
        self.run_job_operation(OperationKind::MakeDirectory, HttpVerb::Post, &path, body)
            .await?;
        Ok(())
    }

    /// Delete a directory; `safe` refuses non-empty directories remotely.
    pub async fn delete_directory(
        &self,
        filesystem: &str,
        rel_path: &str,
        safe: bool,
    ) -> Result<()> {
        debug!(filesystem, rel_path, safe, "delete directory");
        let encoded = encode_rel_path(rel_path);
        let path = if safe {
            format!("scalemgmt/v2/filesystems/{filesystem}/directory/{encoded}?safe=True")
        } else {
            format!("scalemgmt/v2/filesystems/{filesystem}/directory/{encoded}")
        };
        self.run_job_operation(OperationKind::DeleteDirectory, HttpVerb::Delete, &path, None)
            .await?;
        Ok(())
    }

    /// Stat a directory; returns the first line of the job's stdout.
    pub async fn stat_directory(&self, filesystem: &str, rel_path: &str) -> Result<String> {
        debug!(filesystem, rel_path, "stat directory");
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/directory/{}",
            encode_rel_path(rel_path)
        );
        let job = self
            .run_job_operation(OperationKind::StatDirectory, HttpVerb::Get, &path, None)
            .await?
            .ok_or_else(|| {
                ClientError::protocol(format!("stat of {rel_path} produced no job output"))
            })?;
        job.result.stdout.first().cloned().ok_or_else(|| {
            ClientError::protocol(format!("stat of {rel_path} returned empty output"))
        })
    }

    /// Whether a file or directory exists under the filesystem. A
    /// recognized absence reply is `Ok(false)`, never an error.
    pub async fn file_dir_exists(&self, filesystem: &str, rel_path: &str) -> Result<bool> {
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/owner/{}",
            encode_rel_path(rel_path)
        );
        match self.fetch::<OwnerReply>(&path).await {
            Ok(_) => Ok(true),
            Err(err) => absent_on(err, ErrorSignature::FileAbsent),
        }
    }

    /// Create a symlink in `link_filesystem` pointing at a path of
    /// `target_filesystem`. Succeeds when the link already exists.
    pub async fn create_symlink(
        &self,
        link_filesystem: &str,
        target_filesystem: &str,
        rel_path: &str,
        link_path: &str,
    ) -> Result<()> {
        debug!(
            link_filesystem,
            target_filesystem, rel_path, link_path, "create symlink"
        );
        let path = format!(
            "scalemgmt/v2/filesystems/{link_filesystem}/symlink/{}",
            encode_rel_path(link_path)
        );
        let body = json_body(&SymlinkRequest {
            filesystem_name: target_filesystem.to_string(),
            relative_path: rel_path.to_string(),
        })?;
        self.run_job_operation(OperationKind::CreateSymlink, HttpVerb::Post, &path, body)
            .await?;
        Ok(())
    }

    /// Delete a symlink. Succeeds when the link was already removed.
    pub async fn delete_symlink(&self, filesystem: &str, link_path: &str) -> Result<()> {
        debug!(filesystem, link_path, "delete symlink");
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/symlink/{}",
            encode_rel_path(link_path)
        );
        self.run_job_operation(OperationKind::DeleteSymlink, HttpVerb::Delete, &path, None)
            .await?;
        Ok(())
    }

    /// Start copying a fileset-relative path. Returns status and job handle
    /// for a later [`GuiClient::wait_for_job_completion`].
    pub async fn copy_fileset_path(
        &self,
        filesystem: &str,
        fileset: &str,
        src_path: &str,
        target_path: &str,
        node_class: Option<&str>,
    ) -> Result<(u16, u64)> {
        debug!(filesystem, fileset, src_path, target_path, "copy fileset path");
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/filesets/{fileset}/directoryCopy/{}",
            encode_rel_path(src_path)
        );
        let body = json_body(&CopyPathRequest::new(target_path, node_class))?;
        self.submit_deferred(HttpVerb::Put, &path, body).await
    }

    /// Start copying a filesystem-relative directory. Returns status and job
    /// handle for a later [`GuiClient::wait_for_job_completion`].
    pub async fn copy_directory_path(
        &self,
        filesystem: &str,
        src_path: &str,
        target_path: &str,
        node_class: Option<&str>,
    ) -> Result<(u16, u64)> {
        debug!(filesystem, src_path, target_path, "copy directory path");
        let path = format!(
            "scalemgmt/v2/filesystems/{filesystem}/directoryCopy/{}",
            encode_rel_path(src_path)
        );
        let body = json_body(&CopyPathRequest::new(target_path, node_class))?;
        self.submit_deferred(HttpVerb::Put, &path, body).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::executor::{ApiReply, MockCommandExecutor};
    use crate::poller::PollPolicy;

    fn client(mock: MockCommandExecutor) -> GuiClient<MockCommandExecutor> {
        GuiClient::with_executor(mock, PollPolicy::default())
    }

    #[tokio::test]
    async fn test_file_dir_exists_translates_not_found() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute()
            .withf(|_, path, _| path.contains("/owner/data%2Fvol1"))
            .returning(|_, _, _| {
                Err(ClientError::Remote {
                    http_status: 400,
                    code: 400,
                    message: "File not found".into(),
                    signatures: vec![ErrorSignature::FileAbsent],
                })
            });
        assert!(!client(mock).file_dir_exists("fs1", "data/vol1").await.unwrap());
    }

    #[tokio::test]
    async fn test_stat_directory_returns_first_stdout_line() {
        let mut mock = MockCommandExecutor::new();
        // Submission is accepted; the first poll already observes COMPLETED.
        mock.expect_execute().returning(|_, _, _| {
            Ok(ApiReply {
                http_status: 202,
                body: json!({
                    "status": { "code": 202, "message": "" },
                    "jobs": [{ "jobId": 3, "status": "COMPLETED",
                               "result": { "stdout": ["uid=0 gid=0 mode=0755"], "stderr": [] } }]
                }),
            })
        });
        let stat = client(mock).stat_directory("fs1", "vol1").await.unwrap();
        assert_eq!(stat, "uid=0 gid=0 mode=0755");
    }
}

//! Typed models for the read-only resource endpoints.
//!
//! Each GET endpoint answers with its own envelope (a list of filesystems,
//! filesets, quotas, ...). Fields default liberally: the GUI omits parts of
//! an object depending on the `fields=` selection, and a partial object must
//! still decode.

use serde::{Deserialize, Serialize};

/// Mount state of a filesystem as seen from the GUI node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountInfo {
    #[serde(default)]
    pub mount_point: String,
    /// "mounted" or "not mounted" in GUI wording.
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filesystem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub mount: MountInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesystemsReply {
    #[serde(default)]
    pub filesystems: Vec<Filesystem>,
}

/// Configuration block of a fileset.
///
/// `path` is `""` or `"--"` while the fileset is unlinked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesetConfig {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub inode_space: u64,
    #[serde(default)]
    pub max_num_inodes: u64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fileset {
    #[serde(default)]
    pub fileset_name: String,
    #[serde(default)]
    pub config: FilesetConfig,
}

impl Fileset {
    /// Whether the fileset is linked into the filesystem namespace.
    pub fn is_linked(&self) -> bool {
        !(self.config.path.is_empty() || self.config.path == "--")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesetsReply {
    #[serde(default)]
    pub filesets: Vec<Fileset>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub snapshot_name: String,
    #[serde(default, rename = "snapID")]
    pub snap_id: u64,
    #[serde(default)]
    pub created: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotsReply {
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    #[serde(default)]
    pub object_name: String,
    #[serde(default)]
    pub quota_type: String,
    /// Hard limit in KiB; 0 when no quota is set.
    #[serde(default)]
    pub block_limit: u64,
    #[serde(default)]
    pub block_quota: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotasReply {
    #[serde(default)]
    pub quotas: Vec<Quota>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    #[serde(default)]
    pub cluster_id: u64,
    #[serde(default)]
    pub cluster_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    #[serde(default)]
    pub cluster_summary: ClusterSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterReply {
    #[serde(default)]
    pub cluster: ClusterInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default)]
    pub time_zone_offset: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInfo {
    #[serde(default)]
    pub cluster_config: ClusterConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigReply {
    #[serde(default)]
    pub config: ConfigInfo,
}

/// Capability paths advertised by the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPaths {
    #[serde(default)]
    pub snap_copy_op: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub server_version: String,
    #[serde(default)]
    pub paths: ServerPaths,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoReply {
    #[serde(default)]
    pub info: ServerInfo,
}

/// Ownership record of a file or directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerInfo {
    #[serde(default)]
    pub uid: u64,
    #[serde(default)]
    pub gid: u64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub group: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerReply {
    #[serde(default)]
    pub owner: Option<OwnerInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeState {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub component: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeHealthReply {
    #[serde(default)]
    pub states: Vec<NodeState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoragePool {
    #[serde(default, rename = "poolName")]
    pub name: String,
    #[serde(default)]
    pub filesystem_name: String,
    #[serde(default)]
    pub total_data_in_kb: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoragePoolsReply {
    #[serde(default)]
    pub storage_pools: Vec<StoragePool>,
}

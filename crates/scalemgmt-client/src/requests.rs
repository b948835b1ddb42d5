//! Request payloads for the state-changing endpoints, plus the caller-facing
//! option types they are assembled from.

use serde::Serialize;

/// Comment stamped on filesets this client creates.
pub const FILESET_COMMENT: &str = "Fileset created by the container storage provisioner";

/// How a new fileset allocates inodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilesetType {
    /// Own inode space.
    #[default]
    Independent,
    /// Shares the inode space of a parent fileset.
    Dependent,
}

/// Caller-facing options for creating or updating a fileset.
#[derive(Debug, Clone, Default)]
pub struct FilesetOptions {
    pub fileset_type: FilesetType,
    /// Parent for dependent filesets; `root` when unset.
    pub parent_fileset: Option<String>,
    /// Inode limit for independent filesets.
    pub inode_limit: Option<String>,
    pub uid: Option<String>,
    pub gid: Option<String>,
    pub permissions: Option<String>,
}

/// Wire payload for fileset create/update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fileset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inode_space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_inodes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alloc_inodes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

impl FilesetRequest {
    /// Assemble the create payload.
    ///
    /// Dependent filesets inherit the parent's inode space (`root` when no
    /// parent is named); independent filesets get a fresh one, with the
    /// inode limit and a fixed initial allocation when a limit is given.
    pub fn create(fileset_name: &str, opts: &FilesetOptions) -> Self {
        let mut request = FilesetRequest {
            fileset_name: Some(fileset_name.to_string()),
            comment: Some(FILESET_COMMENT.to_string()),
            ..Default::default()
        };

        match opts.fileset_type {
            FilesetType::Dependent => {
                request.inode_space = Some(
                    opts.parent_fileset
                        .clone()
                        .unwrap_or_else(|| "root".to_string()),
                );
            }
            FilesetType::Independent => {
                request.inode_space = Some("new".to_string());
                if let Some(limit) = &opts.inode_limit {
                    request.max_num_inodes = Some(limit.clone());
                    request.alloc_inodes = Some("1024".to_string());
                }
            }
        }

        request.owner = match (&opts.uid, &opts.gid) {
            (Some(uid), Some(gid)) => Some(format!("{uid}:{gid}")),
            (Some(uid), None) => Some(uid.clone()),
            _ => None,
        };
        request.permissions = opts.permissions.clone();

        request
    }

    /// Assemble the update payload; only the inode limit is mutable.
    pub fn update(opts: &FilesetOptions) -> Self {
        FilesetRequest {
            max_num_inodes: opts.inode_limit.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    pub snapshot_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkFilesetRequest {
    pub path: String,
}

/// Payload shared by the directory/fileset/snapshot copy endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPathRequest {
    pub target_path: String,
    #[serde(rename = "nodeclass", skip_serializing_if = "Option::is_none")]
    pub node_class: Option<String>,
}

impl CopyPathRequest {
    pub fn new(target_path: &str, node_class: Option<&str>) -> Self {
        Self {
            target_path: target_path.to_string(),
            node_class: node_class
                .filter(|nc| !nc.is_empty())
                .map(str::to_string),
        }
    }
}

/// Caller-facing ownership of a new directory.
#[derive(Debug, Clone)]
pub struct DirOwner {
    /// Numeric uid or user name; `0` when empty.
    pub uid: String,
    /// Numeric gid or group name; `0` when empty.
    pub gid: String,
    pub permissions: Option<String>,
}

impl Default for DirOwner {
    fn default() -> Self {
        Self {
            uid: String::new(),
            gid: String::new(),
            permissions: None,
        }
    }
}

/// Wire payload for directory creation. The GUI takes numeric ids and
/// symbolic names through different fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MakeDirRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

impl MakeDirRequest {
    pub fn from_owner(owner: &DirOwner) -> Self {
        let mut request = MakeDirRequest::default();

        if owner.uid.is_empty() {
            request.uid = Some("0".to_string());
        } else if owner.uid.parse::<u32>().is_ok() {
            request.uid = Some(owner.uid.clone());
        } else {
            request.user = Some(owner.uid.clone());
        }

        if owner.gid.is_empty() {
            request.gid = Some("0".to_string());
        } else if owner.gid.parse::<u32>().is_ok() {
            request.gid = Some(owner.gid.clone());
        } else {
            request.group = Some(owner.gid.clone());
        }

        request.permissions = owner.permissions.clone();
        request
    }
}

/// Payload for mount/unmount: the nodes the action applies to.
#[derive(Debug, Clone, Serialize)]
pub struct NodesRequest {
    pub nodes: Vec<String>,
}

impl NodesRequest {
    pub fn single(node: &str) -> Self {
        Self {
            nodes: vec![node.to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetQuotaRequest {
    pub block_hard_limit: String,
    pub block_soft_limit: String,
    pub operation_type: String,
    pub quota_type: String,
    pub object_name: String,
}

impl SetQuotaRequest {
    /// Fileset block quota with hard and soft limits set to the same value.
    pub fn fileset(fileset_name: &str, quota: &str) -> Self {
        Self {
            block_hard_limit: quota.to_string(),
            block_soft_limit: quota.to_string(),
            operation_type: "setQuota".to_string(),
            quota_type: "fileset".to_string(),
            object_name: fileset_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRequest {
    pub policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymlinkRequest {
    pub filesystem_name: String,
    pub relative_path: String,
}

/// Percent-encode the path separators of a relative path for use inside a
/// URL segment.
pub(crate) fn encode_rel_path(path: &str) -> String {
    path.replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_fileset_request() {
        let opts = FilesetOptions {
            inode_limit: Some("100000".into()),
            uid: Some("1000".into()),
            gid: Some("1000".into()),
            ..Default::default()
        };
        let request = FilesetRequest::create("fset1", &opts);
        assert_eq!(request.inode_space.as_deref(), Some("new"));
        assert_eq!(request.max_num_inodes.as_deref(), Some("100000"));
        assert_eq!(request.alloc_inodes.as_deref(), Some("1024"));
        assert_eq!(request.owner.as_deref(), Some("1000:1000"));
    }

    #[test]
    fn test_dependent_fileset_defaults_to_root_inode_space() {
        let opts = FilesetOptions {
            fileset_type: FilesetType::Dependent,
            ..Default::default()
        };
        let request = FilesetRequest::create("fset1", &opts);
        assert_eq!(request.inode_space.as_deref(), Some("root"));
        assert!(request.max_num_inodes.is_none());
    }

    #[test]
    fn test_fileset_request_skips_unset_fields_on_wire() {
        let request = FilesetRequest::create("fset1", &FilesetOptions::default());
        let wire = serde_json::to_value(&request).unwrap();
        let object = wire.as_object().unwrap();
        assert!(object.contains_key("filesetName"));
        assert!(object.contains_key("inodeSpace"));
        assert!(!object.contains_key("owner"));
        assert!(!object.contains_key("maxNumInodes"));
    }

    #[test]
    fn test_make_dir_request_distinguishes_names_from_ids() {
        let numeric = MakeDirRequest::from_owner(&DirOwner {
            uid: "1000".into(),
            gid: "0".into(),
            permissions: Some("0755".into()),
        });
        assert_eq!(numeric.uid.as_deref(), Some("1000"));
        assert!(numeric.user.is_none());

        let symbolic = MakeDirRequest::from_owner(&DirOwner {
            uid: "appuser".into(),
            gid: "appgroup".into(),
            permissions: None,
        });
        assert_eq!(symbolic.user.as_deref(), Some("appuser"));
        assert_eq!(symbolic.group.as_deref(), Some("appgroup"));
        assert!(symbolic.uid.is_none());
    }

    #[test]
    fn test_make_dir_request_defaults_to_root_ownership() {
        let request = MakeDirRequest::from_owner(&DirOwner::default());
        assert_eq!(request.uid.as_deref(), Some("0"));
        assert_eq!(request.gid.as_deref(), Some("0"));
    }

    #[test]
    fn test_copy_request_drops_empty_nodeclass() {
        let request = CopyPathRequest::new("/target", Some(""));
        assert!(request.node_class.is_none());
        let request = CopyPathRequest::new("/target", Some("gui-nodes"));
        assert_eq!(request.node_class.as_deref(), Some("gui-nodes"));
    }

    #[test]
    fn test_quota_request_wire_shape() {
        let wire = serde_json::to_value(SetQuotaRequest::fileset("fset1", "10G")).unwrap();
        assert_eq!(wire["operationType"], "setQuota");
        assert_eq!(wire["quotaType"], "fileset");
        assert_eq!(wire["objectName"], "fset1");
        assert_eq!(wire["blockHardLimit"], "10G");
        assert_eq!(wire["blockSoftLimit"], "10G");
    }

    #[test]
    fn test_encode_rel_path() {
        assert_eq!(encode_rel_path("a/b/c"), "a%2Fb%2Fc");
        assert_eq!(encode_rel_path("flat"), "flat");
    }
}

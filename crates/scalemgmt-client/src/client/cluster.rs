//! Cluster-wide queries: identity, version, node health, maintenance tasks.

use tracing::debug;

use crate::client::{absent_on, GuiClient};
use crate::errors::{ClientError, Result};
use crate::executor::{CommandExecutor, HttpVerb};
use crate::resources::{
    ClusterReply, ClusterSummary, ConfigReply, InfoReply, NodeHealthReply,
};
use crate::signatures::ErrorSignature;

impl<E: CommandExecutor> GuiClient<E> {
    /// The cluster id, as an opaque string handle.
    pub async fn cluster_id(&self) -> Result<String> {
        Ok(self.cluster_summary().await?.cluster_id.to_string())
    }

    /// Identity block of the cluster.
    pub async fn cluster_summary(&self) -> Result<ClusterSummary> {
        let reply: ClusterReply = self.fetch("scalemgmt/v2/cluster").await?;
        Ok(reply.cluster.cluster_summary)
    }

    /// The cluster's time zone offset.
    pub async fn time_zone_offset(&self) -> Result<String> {
        let reply: ConfigReply = self.fetch("scalemgmt/v2/config").await?;
        Ok(reply.config.cluster_config.time_zone_offset)
    }

    /// The management server version. An empty version string is a
    /// malformed reply.
    pub async fn server_version(&self) -> Result<String> {
        let reply: InfoReply = self.fetch("scalemgmt/v2/info").await?;
        if reply.info.server_version.is_empty() {
            return Err(ClientError::protocol("server reported no version"));
        }
        Ok(reply.info.server_version)
    }

    /// Whether the node reports a HEALTHY state for `component`.
    pub async fn node_component_healthy(&self, node: &str, component: &str) -> Result<bool> {
        let path = format!(
            "scalemgmt/v2/nodes/{node}/health/states?filter=state=HEALTHY,entityType=NODE,component={component}"
        );
        let reply: NodeHealthReply = self.fetch(&path).await?;
        Ok(!reply.states.is_empty())
    }

    /// Whether the nodeclass exists. A recognized absence reply is
    /// `Ok(false)`, never an error.
    pub async fn is_valid_nodeclass(&self, nodeclass: &str) -> Result<bool> {
        let path = format!("scalemgmt/v2/nodeclasses/{nodeclass}");
        match self.fetch::<serde_json::Value>(&path).await {
            Ok(_) => Ok(true),
            Err(err) => absent_on(err, ErrorSignature::NodeclassAbsent),
        }
    }

    /// Ask the GUI to refresh its fileset inventory immediately.
    /// Fire-and-forget: no job is tracked.
    pub async fn fileset_refresh_task(&self) -> Result<()> {
        debug!("enqueue fileset refresh task");
        self.executor
            .execute(
                HttpVerb::Post,
                "scalemgmt/v2/refreshTask/enqueue?taskId=FILESETS&maxDelay=0",
                None,
            )
            .await?;
        Ok(())
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
    async fn test_cluster_id_is_stringified() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute()
            .withf(|method, path, _| {
                *method == HttpVerb::Get && path == "scalemgmt/v2/cluster"
            })
            .returning(|_, _, _| {
                Ok(ApiReply {
                    http_status: 200,
                    body: json!({
                        "cluster": { "clusterSummary": {
                            "clusterId": 1234567890u64, "clusterName": "storage-cluster"
                        }}
                    }),
                })
            });
        assert_eq!(client(mock).cluster_id().await.unwrap(), "1234567890");
    }

    #[tokio::test]
    async fn test_empty_server_version_is_protocol_error() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute().returning(|_, _, _| {
            Ok(ApiReply {
                http_status: 200,
                body: json!({ "info": {} }),
            })
        });
        assert!(matches!(
            client(mock).server_version().await,
            Err(ClientError::Protocol { .. })
        ));
    }

    #[tokio::test]
    async fn test_node_component_healthy_requires_a_state() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute().returning(|_, _, _| {
            Ok(ApiReply {
                http_status: 200,
                body: json!({ "states": [] }),
            })
        });
        assert!(!client(mock)
            .node_component_healthy("node1", "GUI")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unknown_nodeclass_is_false() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute().returning(|_, _, _| {
            Err(ClientError::Remote {
                http_status: 400,
                code: 400,
                message: "Invalid value in nodeclassName".into(),
                signatures: vec![ErrorSignature::NodeclassAbsent],
            })
        });
        assert!(!client(mock).is_valid_nodeclass("missing").await.unwrap());
    }
}

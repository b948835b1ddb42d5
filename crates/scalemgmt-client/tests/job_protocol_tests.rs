//! End-to-end protocol behavior of the submit → classify → poll pipeline,
//! driven through the public operation surface with a scripted executor.

mod common;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use common::{
    accepted, accepted_without_jobs, poll_completed, poll_running, sync_ok, ScriptedExecutor,
};
use scalemgmt_client::{ClientError, GuiClient, HttpVerb, PollPolicy};

fn client(executor: ScriptedExecutor) -> GuiClient<ScriptedExecutor> {
    GuiClient::with_executor(executor, PollPolicy::default())
}

#[tokio::test(start_paused = true)]
async fn accepted_command_polls_until_completed() {
    let executor = ScriptedExecutor::new(vec![
        accepted(11),
        poll_running(11),
        poll_running(11),
        poll_completed(11),
    ]);
    let client = client(executor);

    client
        .create_fileset("fs1", "fset1", &Default::default())
        .await
        .unwrap();

    // One submission plus exactly N+1 status fetches for N RUNNING replies.
    let requests = client_requests(&client);
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].0, HttpVerb::Post);
    assert!(requests[0].1.ends_with("filesystems/fs1/filesets"));
    for (method, path) in &requests[1..] {
        assert_eq!(*method, HttpVerb::Get);
        assert_eq!(path, "scalemgmt/v2/jobs/11?fields=:all:");
    }
}

#[tokio::test]
async fn synchronous_success_never_touches_the_job_endpoint() {
    let executor = ScriptedExecutor::new(vec![sync_ok(12)]);
    let client = client(executor);

    client.unlink_fileset("fs1", "fset1").await.unwrap();

    assert_eq!(client_requests(&client).len(), 1);
}

#[tokio::test]
async fn accepted_without_jobs_is_fatal_before_any_poll() {
    let executor = ScriptedExecutor::new(vec![accepted_without_jobs()]);
    let client = client(executor);

    let err = client
        .create_snapshot("fs1", "fset1", "snap1")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Protocol { .. }));
    assert_eq!(client_requests(&client).len(), 1);
}

#[tokio::test]
async fn unauthenticated_short_circuits_before_classification() {
    let executor = ScriptedExecutor::new(vec![Err(ClientError::Unauthenticated {
        method: HttpVerb::Post,
        path: "scalemgmt/v2/filesystems/fs1/filesets".into(),
    })]);
    let client = client(executor);

    let err = client
        .create_fileset("fs1", "fset1", &Default::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthenticated { .. }));
    assert_eq!(client_requests(&client).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn poll_deadline_yields_deadline_exceeded() {
    let executor = ScriptedExecutor::new(vec![
        accepted(13),
        poll_running(13),
        poll_running(13),
        poll_running(13),
        poll_running(13),
    ]);
    let client = GuiClient::with_executor(
        executor,
        PollPolicy::with_deadline(Duration::from_secs(5)),
    );

    let err = client.mount_filesystem("fs1", "node1").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::DeadlineExceeded { job_id: 13, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn cancellation_yields_cancelled_not_job_failed() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let executor = ScriptedExecutor::new(vec![accepted(14), poll_running(14)]);
    let client = GuiClient::with_executor(executor, PollPolicy::default())
        .with_cancellation(cancel);

    let err = client.delete_snapshot("fs1", "fset1", "snap1").await.unwrap_err();

    assert!(matches!(err, ClientError::Cancelled { job_id: 14 }));
}

#[tokio::test(start_paused = true)]
async fn deferred_copy_hands_back_the_job_handle() {
    let executor = ScriptedExecutor::new(vec![
        accepted(99),
        poll_running(99),
        poll_completed(99),
    ]);
    let client = client(executor);

    let (status, job_id) = client
        .copy_directory_path("fs1", "src/dir", "/target/dir", None)
        .await
        .unwrap();
    assert_eq!((status, job_id), (202, 99));
    // Submission only so far; the wait is the caller's move.
    assert_eq!(client_requests(&client).len(), 1);

    client.wait_for_job_completion(status, job_id).await.unwrap();
    assert_eq!(client_requests(&client).len(), 3);
}

#[tokio::test]
async fn wait_for_job_completion_is_a_no_op_after_sync_status() {
    let executor = ScriptedExecutor::new(vec![]);
    let client = client(executor);

    client.wait_for_job_completion(200, 77).await.unwrap();
    assert_eq!(client_requests(&client).len(), 0);
}

/// Peek at the requests recorded by the scripted executor inside a client.
fn client_requests(client: &GuiClient<ScriptedExecutor>) -> Vec<(HttpVerb, String)> {
    client.executor().requests()
}

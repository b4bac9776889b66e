//! Unit tests for the status prober.

#![allow(clippy::expect_used)]

use dev_lxc::application::services::probe;
use dev_lxc::domain::{InstanceError, InstanceStatus};

use crate::helpers::{FakeLxc, argv, provisioner};

#[tokio::test]
async fn running_instance_is_running() {
    let mp = provisioner(FakeLxc::new().with_instance("web-jammy", "RUNNING", None));
    let status = probe::status(&mp, "web-jammy").await.expect("status");
    assert_eq!(status, InstanceStatus::Running);
    assert_eq!(mp.runner().argvs(), vec![argv(&["info", "web-jammy"])]);
}

#[tokio::test]
async fn reported_status_is_normalized() {
    let mp = provisioner(FakeLxc::new().with_instance("web-jammy", "Stopped", None));
    let status = probe::status(&mp, "web-jammy").await.expect("status");
    assert_eq!(status, InstanceStatus::Stopped);
}

#[tokio::test]
async fn missing_instance_is_nonexistent_not_an_error() {
    let mp = provisioner(FakeLxc::new());
    let status = probe::status(&mp, "web-jammy").await.expect("status");
    assert_eq!(status, InstanceStatus::Nonexistent);
}

#[tokio::test]
async fn info_without_status_line_is_unknown() {
    let mp = provisioner(FakeLxc::new().with_instance("web-jammy", "", None));
    let status = probe::status(&mp, "web-jammy").await.expect("status");
    assert_eq!(status, InstanceStatus::Unknown);
}

#[tokio::test]
async fn other_info_failures_propagate() {
    let mp = provisioner(FakeLxc::new().info_error("Error: permission denied on socket"));
    let err = probe::status(&mp, "web-jammy")
        .await
        .expect_err("should fail");
    assert!(matches!(
        err.downcast_ref::<InstanceError>(),
        Some(InstanceError::ProbeFailed { .. })
    ));
    assert!(err.to_string().contains("permission denied"), "{err}");
}

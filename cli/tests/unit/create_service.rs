//! Unit tests for the create flow: name choice, launch, init wait, mount.

#![allow(clippy::expect_used)]

use std::path::Path;

use dev_lxc::application::services::lifecycle::{self, CreateRequest};
use dev_lxc::domain::{InstanceError, Project, Release};

use crate::helpers::{FakeLxc, RecordingReporter, argv, project, provisioner};

fn request<'a>(project: &'a Project, release: Release) -> CreateRequest<'a> {
    CreateRequest {
        project,
        release,
        host_uid: 1234,
        config: None,
        profile: None,
    }
}

const MUTATING: [&str; 5] = ["launch", "start", "stop", "delete", "device-add"];

#[tokio::test]
async fn fresh_create_launches_waits_and_mounts() {
    let mp = provisioner(FakeLxc::new());
    let reporter = RecordingReporter::default();
    let project = project("shop");

    let name = lifecycle::create(&mp, &reporter, &request(&project, Release::Jammy))
        .await
        .expect("create");

    assert_eq!(name, "shop-jammy");
    assert_eq!(
        mp.runner().argvs(),
        vec![
            argv(&["info", "shop-jammy"]),
            argv(&[
                "launch",
                "ubuntu:jammy",
                "shop-jammy",
                "--config",
                "raw.idmap=both 1234 1000",
            ]),
            argv(&["exec", "shop-jammy", "--", "cloud-init", "status", "--wait"]),
            argv(&[
                "config",
                "device",
                "add",
                "shop-jammy",
                "shop-jammy-src",
                "disk",
                "source=/work/shop",
                "path=/home/ubuntu/shop",
            ]),
        ]
    );
    assert_eq!(reporter.waits().len(), 1);
    assert!(reporter.waits()[0].contains("this might take a while"));
    assert!(reporter.warnings().is_empty());
    assert_eq!(
        mp.runner().instance("shop-jammy").expect("created").mount,
        Some("/work/shop".into())
    );
}

#[tokio::test]
async fn newest_release_launches_from_daily_remote() {
    let mp = provisioner(FakeLxc::new());
    let project = project("shop");
    lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Noble))
        .await
        .expect("create");
    assert_eq!(mp.runner().argvs()[1][1], "ubuntu-daily:noble");
}

#[tokio::test]
async fn existing_instance_of_same_project_fails_without_mutation() {
    let mp = provisioner(FakeLxc::new().with_instance(
        "shop-jammy",
        "STOPPED",
        Some("/work/shop"),
    ));
    let project = project("shop");

    let err = lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Jammy))
        .await
        .expect_err("already exists");

    let instance_err = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(instance_err, InstanceError::AlreadyExists(n) if n == "shop-jammy"));
    assert_eq!(instance_err.exit_code(), 4);
    for op in MUTATING {
        assert_eq!(mp.runner().count(op), 0, "unexpected {op}");
    }
}

#[tokio::test]
async fn existing_instance_without_known_mount_counts_as_ours() {
    let mp = provisioner(FakeLxc::new().with_instance("shop-jammy", "RUNNING", None));
    let project = project("shop");

    let err = lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Jammy))
        .await
        .expect_err("already exists");

    assert!(matches!(
        err.downcast_ref::<InstanceError>(),
        Some(InstanceError::AlreadyExists(_))
    ));
    assert_eq!(mp.runner().operations(), vec!["info", "device-get"]);
}

#[tokio::test]
async fn name_taken_by_other_directory_gets_variant() {
    let mp = provisioner(FakeLxc::new().with_instance(
        "shop-jammy",
        "RUNNING",
        Some("/home/me/old/shop"),
    ));
    let project = project("shop");

    let name = lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Jammy))
        .await
        .expect("create variant");

    let suffix = name.strip_prefix("shop-jammy-").expect("variant of base");
    assert!(suffix.len() >= 3, "{name}");
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()), "{name}");
    let launch = mp
        .runner()
        .argvs()
        .into_iter()
        .find(|a| a[0] == "launch")
        .expect("launch call");
    assert_eq!(launch[2], name, "launched under the variant");
    assert_eq!(
        mp.runner().instance("shop-jammy").expect("untouched").mount,
        Some("/home/me/old/shop".into())
    );
    assert_eq!(
        mp.runner().instance(&name).expect("created").mount,
        Some("/work/shop".into())
    );
}

#[tokio::test]
async fn existing_variant_of_same_project_fails_without_mutation() {
    let mp = provisioner(
        FakeLxc::new()
            .with_instance("shop-jammy", "RUNNING", Some("/home/me/old/shop"))
            .with_instance("shop-jammy-abc", "STOPPED", Some("/work/shop")),
    );
    let project = project("shop");

    let err = lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Jammy))
        .await
        .expect_err("variant already exists");

    let instance_err = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(instance_err, InstanceError::AlreadyExists(n) if n == "shop-jammy-abc"));
    assert_eq!(instance_err.exit_code(), 4);
    for op in MUTATING {
        assert_eq!(mp.runner().count(op), 0, "unexpected {op}");
    }
}

#[tokio::test]
async fn variant_of_another_directory_does_not_block_create() {
    let mp = provisioner(
        FakeLxc::new()
            .with_instance("shop-jammy", "RUNNING", Some("/home/me/old/shop"))
            .with_instance("shop-jammy-abc", "RUNNING", Some("/srv/shop")),
    );
    let project = project("shop");

    let name = lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Jammy))
        .await
        .expect("create variant");

    assert!(name.starts_with("shop-jammy-"));
    assert_ne!(name, "shop-jammy-abc");
    assert_eq!(mp.runner().count("launch"), 1);
}

#[tokio::test]
async fn config_bytes_are_piped_to_launch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("jammy.yaml");
    std::fs::write(&config, b"config:\n  security.nesting: \"true\"\n").expect("write config");

    let mp = provisioner(FakeLxc::new());
    let project = project("shop");
    let req = CreateRequest {
        config: Some(&config),
        profile: Some("gpu"),
        ..request(&project, Release::Jammy)
    };

    lifecycle::create(&mp, &RecordingReporter::default(), &req)
        .await
        .expect("create");

    let launch = &mp.runner().calls()[1];
    assert_eq!(
        launch.argv,
        argv(&[
            "launch",
            "ubuntu:jammy",
            "shop-jammy",
            "--config",
            "raw.idmap=both 1234 1000",
            "--profile",
            "gpu",
        ])
    );
    assert_eq!(
        launch.stdin.as_deref(),
        Some(b"config:\n  security.nesting: \"true\"\n".as_slice())
    );
}

#[tokio::test]
async fn unreadable_config_fails_with_exit_four_before_launch() {
    let mp = provisioner(FakeLxc::new());
    let project = project("shop");
    let missing = Path::new("/nonexistent/dev-lxc/config.yaml");
    let req = CreateRequest {
        config: Some(missing),
        ..request(&project, Release::Jammy)
    };

    let err = lifecycle::create(&mp, &RecordingReporter::default(), &req)
        .await
        .expect_err("unreadable config");

    let instance_err = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(instance_err, InstanceError::ConfigUnreadable { .. }));
    assert_eq!(instance_err.exit_code(), 4);
    assert_eq!(mp.runner().count("launch"), 0);
}

#[tokio::test]
async fn launch_failure_aborts_before_mount() {
    let mp = provisioner(FakeLxc::new().failing("launch"));
    let project = project("shop");

    let err = lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Jammy))
        .await
        .expect_err("launch fails");

    assert!(matches!(
        err.downcast_ref::<InstanceError>(),
        Some(InstanceError::LaunchFailed { .. })
    ));
    assert_eq!(mp.runner().operations(), vec!["info", "launch"]);
}

#[tokio::test]
async fn mount_failure_is_fatal_and_leaves_instance() {
    let mp = provisioner(FakeLxc::new().failing("device-add"));
    let project = project("shop");

    let err = lifecycle::create(&mp, &RecordingReporter::default(), &request(&project, Release::Jammy))
        .await
        .expect_err("mount fails");

    assert!(matches!(
        err.downcast_ref::<InstanceError>(),
        Some(InstanceError::MountFailed { .. })
    ));
    assert!(mp.runner().instance("shop-jammy").is_some(), "no rollback");
    assert_eq!(mp.runner().count("delete"), 0);
}

#[tokio::test]
async fn cloud_init_failure_is_only_a_warning() {
    let mp = provisioner(FakeLxc::new().cloud_init_exit(2));
    let reporter = RecordingReporter::default();
    let project = project("shop");

    let name = lifecycle::create(&mp, &reporter, &request(&project, Release::Focal))
        .await
        .expect("create continues");

    assert_eq!(name, "shop-focal");
    assert_eq!(reporter.warnings().len(), 1);
    assert_eq!(mp.runner().count("device-add"), 1);
}

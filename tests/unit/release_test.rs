//! Tests for cutting a release and publishing outputs

use crate::common::git_repo::CHANGELOG;
use crate::common::mocks::{BrokenOutputs, MemoryOutputs, MockVcs, RecordingReporter, VcsCall};
use crate::pipeline_test::{config, workspace};
use release_builder::core::models::ArchiveFormat;
use release_builder::core::services::{Stage, checksum};
use release_builder::{Project, ProjectConfig, ReleaseError};
use std::fs;

fn examined(config: ProjectConfig, vcs: MockVcs) -> Project<MockVcs> {
    let mut project = Project::with_vcs(config, vcs).unwrap();
    project.examine_project().unwrap();
    project
}

// =============================================================================
// RELEASE
// =============================================================================

#[test]
fn test_release_tags_archives_and_pushes_in_order() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::with_tags(&["v1.0.0"]));

    let artifacts = project.release().unwrap().expect("artifacts");
    assert_eq!(project.stage(), Stage::Released);

    assert_eq!(
        project.vcs().mutations(),
        [
            VcsCall::TagHead {
                tag: "v1.1.0".to_string(),
                message: "Releasing: v1.1.0".to_string(),
            },
            VcsCall::Archive {
                slug: "bar-1.1.0".to_string(),
                rev: "v1.1.0".to_string(),
                format: ArchiveFormat::Zip,
            },
            VcsCall::Archive {
                slug: "bar-1.1.0".to_string(),
                rev: "v1.1.0".to_string(),
                format: ArchiveFormat::TarGz,
            },
            VcsCall::PushTags {
                token: "secret".to_string(),
            },
        ]
    );

    let artifact_dir = dir.path().join("artifacts");
    assert_eq!(artifacts.dir, artifact_dir);
    assert_eq!(artifacts.zip, artifact_dir.join("bar-1.1.0.zip"));
    assert_eq!(artifacts.tarball, artifact_dir.join("bar-1.1.0.tar.gz"));
    assert!(artifacts.wrap.is_none());
}

#[test]
fn test_release_writes_sorted_manifest() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::new());

    let artifacts = project.release().unwrap().unwrap();
    let manifest = fs::read_to_string(&artifacts.checksums).unwrap();

    let expected = format!(
        "{}  bar-1.1.0.tar.gz\n{}  bar-1.1.0.zip\n",
        checksum::hash_hex(&artifacts.tarball).unwrap(),
        checksum::hash_hex(&artifacts.zip).unwrap(),
    );
    assert_eq!(manifest, expected);
    assert_eq!(artifacts.checksums, dir.path().join("artifacts/SHA256SUMS"));
}

#[test]
fn test_release_with_wrap_file() {
    let dir = workspace(CHANGELOG);
    let config = ProjectConfig {
        packaging_name: Some("default".to_string()),
        ..config(dir.path())
    };
    let mut project = examined(config, MockVcs::new());

    let artifacts = project.release().unwrap().unwrap();
    let wrap = artifacts.wrap.expect("wrap file");
    assert_eq!(wrap, dir.path().join("artifacts/bar.wrap"));

    let tar_hash = checksum::hash_hex(&artifacts.tarball).unwrap();
    let content = fs::read_to_string(&wrap).unwrap();
    assert!(content.starts_with("[wrap-file]\ndirectory = bar-1.1.0\n"));
    assert!(content.contains(
        "source_url = https://github.com/foo/bar/releases/download/v1.1.0/bar-1.1.0.tar.gz\n"
    ));
    assert!(content.contains(&format!("source_hash = {tar_hash}\n")));
    assert!(content.ends_with("[provide]\nlibbar = libbar_dep\n"));

    // The wrap file is written before the manifest, so it is checksummed too
    let manifest = fs::read_to_string(&artifacts.checksums).unwrap();
    let names: Vec<_> = manifest
        .lines()
        .map(|l| l.split_once("  ").unwrap().1)
        .collect();
    assert_eq!(names, ["bar-1.1.0.tar.gz", "bar-1.1.0.zip", "bar.wrap"]);
}

#[test]
fn test_release_with_named_wrap_and_custom_server() {
    let dir = workspace(CHANGELOG);
    let config = ProjectConfig {
        packaging_name: Some("widget".to_string()),
        server_url: "https://git.example.com/".to_string(),
        ..config(dir.path())
    };
    let mut project = examined(config, MockVcs::new());

    let wrap = project.release().unwrap().unwrap().wrap.unwrap();
    assert_eq!(wrap.file_name().unwrap(), "widget.wrap");
    let content = fs::read_to_string(wrap).unwrap();
    assert!(content.contains("https://git.example.com/foo/bar/releases/download/"));
    assert!(content.contains("libwidget = libwidget_dep"));
}

#[test]
fn test_dry_run_has_no_side_effects() {
    let dir = workspace(CHANGELOG);
    let config = ProjectConfig {
        token: String::new(),
        dry_run: true,
        packaging_name: Some("default".to_string()),
        ..config(dir.path())
    };
    let reporter = RecordingReporter::default();
    let mut project = Project::with_vcs(config, MockVcs::new())
        .unwrap()
        .with_reporter(reporter.clone());
    project.examine_project().unwrap();

    assert!(project.release().unwrap().is_none());
    assert!(project.vcs().mutations().is_empty());
    assert!(project.vcs().tags().is_empty());
    assert!(!dir.path().join("artifacts").exists());
    assert!(reporter.saw("dry run"));

    let mut sink = MemoryOutputs::default();
    project.output_data(&mut sink).unwrap();
    assert_eq!(sink.get("release-tag"), Some("v1.1.0"));
    assert!(!dir.path().join("release-notes.md").exists());
}

#[test]
fn test_nothing_due_releases_nothing() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::with_tags(&["v1.1.0", "v1.0.0"]));

    assert!(project.release().unwrap().is_none());
    assert!(project.vcs().mutations().is_empty());
    assert!(!dir.path().join("artifacts").exists());

    let mut sink = MemoryOutputs::default();
    project.output_data(&mut sink).unwrap();
    assert!(sink.values.is_empty());
    assert_eq!(project.stage(), Stage::OutputEmitted);
    assert!(!dir.path().join("release-notes.md").exists());
}

#[test]
fn test_push_failure_keeps_tag_and_artifacts() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::new().failing_push());

    let err = project.release().unwrap_err();
    assert!(matches!(err, ReleaseError::Repository { .. }));
    assert!(err.to_string().contains("push tags"));

    assert_eq!(project.vcs().tags(), ["v1.1.0"]);
    assert!(dir.path().join("artifacts/bar-1.1.0.zip").exists());
    assert!(dir.path().join("artifacts/SHA256SUMS").exists());
}

fn tag_call() -> VcsCall {
    VcsCall::TagHead {
        tag: "v1.1.0".to_string(),
        message: "Releasing: v1.1.0".to_string(),
    }
}

fn archive_call(format: ArchiveFormat) -> VcsCall {
    VcsCall::Archive {
        slug: "bar-1.1.0".to_string(),
        rev: "v1.1.0".to_string(),
        format,
    }
}

#[test]
fn test_tag_failure_stops_the_release() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::new().failing_tag_head());

    let err = project.release().unwrap_err();
    assert!(matches!(err, ReleaseError::Repository { .. }));
    assert!(err.to_string().contains("tag HEAD as 'v1.1.0'"));

    assert_eq!(project.vcs().mutations(), [tag_call()]);
    assert!(!dir.path().join("artifacts").exists());
    assert_eq!(project.stage(), Stage::Examined);
}

#[test]
fn test_zip_failure_skips_tarball_manifest_and_push() {
    let dir = workspace(CHANGELOG);
    let vcs = MockVcs::new().failing_archive(ArchiveFormat::Zip);
    let mut project = examined(config(dir.path()), vcs);

    let err = project.release().unwrap_err();
    match &err {
        ReleaseError::Archive { format, .. } => assert_eq!(format, "zip"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        format!("{:#}", anyhow::Error::from(err)),
        "unable to generate the zip archive: git archive --format=zip v1.1.0 \
         exited with exit status: 128: fatal: mock archive failure"
    );

    assert_eq!(
        project.vcs().mutations(),
        [tag_call(), archive_call(ArchiveFormat::Zip)]
    );
    assert!(!dir.path().join("artifacts/bar-1.1.0.tar.gz").exists());
    assert!(!dir.path().join("artifacts/SHA256SUMS").exists());
}

#[test]
fn test_tarball_failure_skips_manifest_and_push() {
    let dir = workspace(CHANGELOG);
    let config = ProjectConfig {
        packaging_name: Some("default".to_string()),
        ..config(dir.path())
    };
    let vcs = MockVcs::new().failing_archive(ArchiveFormat::TarGz);
    let mut project = examined(config, vcs);

    let err = project.release().unwrap_err();
    assert!(matches!(err, ReleaseError::Archive { ref format, .. } if format == "tar.gz"));

    assert_eq!(
        project.vcs().mutations(),
        [
            tag_call(),
            archive_call(ArchiveFormat::Zip),
            archive_call(ArchiveFormat::TarGz),
        ]
    );
    assert!(dir.path().join("artifacts/bar-1.1.0.zip").exists());
    assert!(!dir.path().join("artifacts/bar.wrap").exists());
    assert!(!dir.path().join("artifacts/SHA256SUMS").exists());
}

#[test]
fn test_artifact_path_that_is_a_file() {
    let dir = workspace(CHANGELOG);
    fs::write(dir.path().join("artifacts"), "not a directory").unwrap();
    let mut project = examined(config(dir.path()), MockVcs::new());

    let err = project.release().unwrap_err();
    assert!(matches!(err, ReleaseError::NotADirectory(_)));
    assert!(
        !project
            .vcs()
            .mutations()
            .iter()
            .any(|c| matches!(c, VcsCall::PushTags { .. }))
    );
}

#[test]
fn test_nested_artifact_dir_is_created() {
    let dir = workspace(CHANGELOG);
    let config = ProjectConfig {
        artifact_dir: "build/dist/release".to_string(),
        ..config(dir.path())
    };
    let mut project = examined(config, MockVcs::new());

    let artifacts = project.release().unwrap().unwrap();
    assert!(dir.path().join("build/dist/release/bar-1.1.0.zip").is_file());
    assert_eq!(artifacts.dir, dir.path().join("build/dist/release"));
}

// =============================================================================
// OUTPUT
// =============================================================================

#[test]
fn test_output_publishes_release_fields() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::new());
    project.release().unwrap();

    let mut sink = MemoryOutputs::default();
    project.output_data(&mut sink).unwrap();

    let notes_path = dir.path().join("release-notes.md");
    let notes_display = notes_path.display().to_string();
    assert_eq!(
        sink.values,
        [
            ("release-tag".to_string(), "v1.1.0".to_string()),
            ("release-name".to_string(), "v1.1.0 2024-03-02".to_string()),
            ("release-body-file".to_string(), notes_display),
            ("artifact-dir".to_string(), "artifacts".to_string()),
        ]
    );
    assert_eq!(
        fs::read_to_string(notes_path).unwrap(),
        "### Added\n- Meson wrap files\n"
    );
    assert_eq!(project.stage(), Stage::OutputEmitted);
}

#[test]
fn test_output_twice_is_rejected() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::new());
    project.release().unwrap();

    let mut sink = MemoryOutputs::default();
    project.output_data(&mut sink).unwrap();
    assert!(matches!(
        project.output_data(&mut sink),
        Err(ReleaseError::StepOrder { .. })
    ));
    assert_eq!(sink.values.len(), 4);
}

#[test]
fn test_output_sink_failure_names_the_output() {
    let dir = workspace(CHANGELOG);
    let mut project = examined(config(dir.path()), MockVcs::new());
    project.release().unwrap();

    let err = project.output_data(&mut BrokenOutputs).unwrap_err();
    match &err {
        ReleaseError::Output { name, .. } => assert_eq!(name, "release-tag"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        format!("{:#}", anyhow::Error::from(err)),
        "unable to set the 'release-tag' output: output file is read-only"
    );
}

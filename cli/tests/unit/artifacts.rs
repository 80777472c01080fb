//! Rendered artifacts: compose manifest structure and systemd unit content.

#![allow(clippy::expect_used)]

use kiosk_setup::application::services::artifacts::ArtifactWriter;
use kiosk_setup::domain::ArtifactError;
use std::path::Path;

use kiosk_setup::domain::artifacts::{
    BROWSERS, app_unit, hardware_unit, kiosk_command, loading_page_path,
};
use kiosk_setup::domain::config::ProvisionConfig;
use kiosk_setup::domain::template::Variables;
use kiosk_setup::infra::assets::EmbeddedTemplates;
use kiosk_setup::infra::fs::LocalFs;

use crate::helpers::Sandbox;
use crate::mocks::RecordingReporter;

#[test]
fn compose_manifest_is_valid_yaml_with_expected_shape() {
    let sb = Sandbox::with_project();
    let writer = ArtifactWriter::new(&EmbeddedTemplates, &LocalFs);
    let written = writer
        .generate_build_artifacts(&sb.config(), &RecordingReporter::default())
        .expect("render");
    assert_eq!(written.len(), 2);

    let doc: serde_yaml::Value =
        serde_yaml::from_str(&sb.read("project/docker-compose.yml")).expect("valid yaml");
    let services = doc["services"].as_mapping().expect("services");
    assert_eq!(services.len(), 1);

    let svc = &doc["services"]["booth"];
    assert_eq!(svc["build"].as_str(), Some("."));
    assert_eq!(svc["restart"].as_str(), Some("on-failure"));
    assert_eq!(svc["ports"][0].as_str(), Some("${APP_PORT:-5000}:5000"));
    assert_eq!(svc["env_file"][0].as_str(), Some(".env"));

    let env: Vec<_> = svc["environment"]
        .as_sequence()
        .expect("environment")
        .iter()
        .filter_map(serde_yaml::Value::as_str)
        .collect();
    assert!(env.contains(&"HOST=0.0.0.0"));
    assert!(env.contains(&"PORT=5000"));

    let resources = &svc["deploy"]["resources"];
    assert_eq!(resources["limits"]["memory"].as_str(), Some("2g"));
    assert_eq!(resources["limits"]["cpus"].as_str(), Some("2.0"));
    assert_eq!(resources["reservations"]["memory"].as_str(), Some("512m"));

    let health = &svc["healthcheck"];
    assert_eq!(health["interval"].as_str(), Some("30s"));
    assert_eq!(health["timeout"].as_str(), Some("10s"));
    assert_eq!(health["retries"].as_u64(), Some(3));
    assert!(
        health["test"][3]
            .as_str()
            .is_some_and(|t| t.ends_with(":5000/health"))
    );

    assert_eq!(doc["volumes"].as_mapping().expect("volumes").len(), 3);
    assert!(sb.path("project/.dockerignore").exists());
}

#[test]
fn custom_port_flows_into_mapping_and_health_check() {
    let sb = Sandbox::with_project();
    let mut cfg = sb.config();
    cfg.app_port = 8080;
    ArtifactWriter::new(&EmbeddedTemplates, &LocalFs)
        .generate_build_artifacts(&cfg, &RecordingReporter::default())
        .expect("render");

    let doc: serde_yaml::Value =
        serde_yaml::from_str(&sb.read("project/docker-compose.yml")).expect("valid yaml");
    assert_eq!(
        doc["services"]["booth"]["ports"][0].as_str(),
        Some("${APP_PORT:-8080}:8080")
    );
}

#[test]
fn units_render_lifecycle_and_logging() {
    let sb = Sandbox::with_project();
    let cfg = sb.config();
    let writer = ArtifactWriter::new(&EmbeddedTemplates, &LocalFs);

    writer.write_unit(&app_unit(&cfg), &cfg.unit_dir).expect("app unit");
    writer
        .write_unit(&hardware_unit(&cfg), &cfg.unit_dir)
        .expect("hardware unit");

    let app = sb.read("units/booth.service");
    assert!(app.contains("Type=oneshot"));
    assert!(app.contains("ExecStart=/usr/bin/docker compose up -d"));
    assert!(app.contains("ExecStop=/usr/bin/docker compose down"));
    assert!(app.contains("Requires=docker.service"));
    assert!(app.contains(&format!("WorkingDirectory={}", sb.project().display())));

    let hw = sb.read("units/booth-hardware.service");
    assert!(hw.contains("User=alice"));
    assert!(hw.contains("Restart=on-failure"));
    assert!(hw.contains("StandardOutput=append:/var/log/booth-hardware.log"));
    assert!(hw.contains("hardware_service.py"));
    assert!(!hw.contains("{{"), "no placeholder left unrendered");
}

#[test]
fn missing_variable_is_reported_and_nothing_written() {
    let sb = Sandbox::with_project();
    let writer = ArtifactWriter::new(&EmbeddedTemplates, &LocalFs);
    let dest = sb.path("project/docker-compose.yml");

    let err = writer
        .render("docker-compose.yml", &Variables::new(), &dest, 0o644)
        .expect_err("unbound");

    assert!(matches!(
        err,
        ArtifactError::UnboundVariable { ref template, .. } if template == "docker-compose.yml"
    ));
    assert!(!dest.exists());
}

#[test]
fn unwritable_destination_is_a_write_error() {
    let sb = Sandbox::with_project();
    std::fs::write(sb.path("blocker"), "file, not a dir").expect("seed");
    let writer = ArtifactWriter::new(&EmbeddedTemplates, &LocalFs);

    let err = writer
        .render(
            "dockerignore",
            &Variables::new(),
            &sb.path("blocker/.dockerignore"),
            0o644,
        )
        .expect_err("parent is a file");

    assert!(matches!(err, ArtifactError::Write { .. }));
}

#[test]
fn default_config_renders_absolute_paths_into_units_and_launcher() {
    let cfg = ProvisionConfig::default()
        .resolve(None)
        .anchored(Path::new("/home/pi/kiosk"));

    for unit in [app_unit(&cfg), hardware_unit(&cfg)] {
        let dir = unit.variables()["WORKING_DIR"].clone();
        assert!(
            Path::new(&dir).is_absolute(),
            "{} WorkingDirectory not absolute: {dir}",
            unit.name
        );
    }
    assert!(hardware_unit(&cfg).variables()["START_COMMAND"]
        .ends_with(" /home/pi/kiosk/hardware_service.py"));

    let exec = kiosk_command(
        Path::new("/usr/bin/chromium-browser"),
        &BROWSERS[0],
        &loading_page_path(&cfg),
    );
    assert!(
        exec.ends_with(" file:///home/pi/kiosk/kiosk/loading.html"),
        "{exec}"
    );
}

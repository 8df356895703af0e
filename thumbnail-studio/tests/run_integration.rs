//! Thumbnail Studio Integration Tests
//!
//! Runs the host end to end: script on disk, replay, export, files on disk.

use std::path::Path;

use thumbnail_renderer::ResvgCapture;
use thumbnail_studio::{run_with, StudioConfig};

fn capture() -> ResvgCapture {
    ResvgCapture::with_fontdb(usvg::fontdb::Database::new())
}

fn write_script(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("edits.json");
    std::fs::write(&path, json).expect("write script");
    path
}

// ============================================================================
// End-to-end runs
// ============================================================================

#[test]
fn test_run_writes_canonical_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(
        dir.path(),
        r##"[
            {"op": "add_text", "zone": "top-left", "as": "title"},
            {"op": "update_element", "id": "$title", "content": "Launch day"},
            {"op": "update_background", "solidColor": "#1e293b"}
        ]"##,
    );
    let config = StudioConfig {
        script: Some(script),
        output: dir.path().join("cover.png"),
        container_width: 640.0,
        ..StudioConfig::default()
    };

    let summary = run_with(&config, capture()).expect("run");

    assert_eq!(summary.replay.applied, 3, "{:?}", summary.replay.refused);
    assert!((summary.preview_scale - 0.5).abs() < f32::EPSILON);
    assert!(summary.svg.is_none());
    let decoded = image::open(&summary.png).expect("decode").to_rgba8();
    assert_eq!(decoded.dimensions(), (1280, 670));
    assert_eq!(decoded.get_pixel(1279, 669).0, [0x1e, 0x29, 0x3b, 255]);
}

#[test]
fn test_run_without_script_exports_default_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = StudioConfig {
        output: dir.path().join("blank.png"),
        write_svg: true,
        ..StudioConfig::default()
    };

    let summary = run_with(&config, capture()).expect("run");

    assert_eq!(summary.replay.applied, 0);
    let svg_path = summary.svg.expect("svg requested");
    assert_eq!(svg_path, dir.path().join("blank.svg"));
    let svg = std::fs::read_to_string(svg_path).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(!svg.contains("stroke-dasharray"));
}

#[test]
fn test_refused_edits_do_not_abort_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(
        dir.path(),
        r#"[
            {"op": "add_text"}, {"op": "add_text"}, {"op": "add_text"},
            {"op": "add_text"}, {"op": "add_text"}, {"op": "add_text"}
        ]"#,
    );
    let config = StudioConfig {
        script: Some(script),
        output: dir.path().join("full.png"),
        ..StudioConfig::default()
    };

    let summary = run_with(&config, capture()).expect("run");
    assert_eq!(summary.replay.applied, 5);
    assert_eq!(summary.replay.refused.len(), 1);
    assert!(summary.png.exists());
}

#[test]
fn test_malformed_script_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(dir.path(), "not json");
    let output = dir.path().join("never.png");
    let config = StudioConfig {
        script: Some(script),
        output: output.clone(),
        ..StudioConfig::default()
    };

    assert!(run_with(&config, capture()).is_err());
    assert!(!output.exists());
}

//! End-to-end export: profile JSON + icon SVG to files on disk.

use std::fs;
use std::sync::Arc;

use icon_styler::{
    Color, Configurable, DirectorySink, ExportFormat, GradientKind, RenderRoot, Shadow,
    StyleProfile, StyleSession, Styles, export_image, spawn_export,
};

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path fill="currentColor" d="M12 2L2 22h20z"/></svg>"#;

fn styled() -> Styles {
    Styles {
        background_colors: vec![Color::new("#3b82f6"), Color::new("#1e3a8a")],
        background_gradient: GradientKind::Linear,
        background_rotation: 135.0,
        border_colors: vec![Color::new("#ffffff")],
        shadows: vec![Shadow::new(0.0, 8.0, 24.0, 0.0, Color::new("rgba(0, 0, 0, 0.4)"))],
        icon_shadow: vec![Shadow::new(0.0, 4.0, 8.0, 0.0, Color::new("#00000080"))],
        ..Styles::default()
    }
}

#[tokio::test]
async fn every_format_lands_in_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());
    let root = RenderRoot::compose(&styled(), ICON).unwrap();

    for format in ExportFormat::ALL {
        let name = format.to_string().to_lowercase();
        let path = export_image(128, &name, format, Some(&root), &sink)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join(format!("{name}.{}", format.extension())));
    }

    let png = image::open(dir.path().join("png.png")).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (128, 128));
    // Center of the frame is covered by the opaque background gradient
    assert_eq!(png.get_pixel(64, 20)[3], 255);

    let jpeg = fs::read(dir.path().join("jpeg.jpeg")).unwrap();
    assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);

    let svg = fs::read_to_string(dir.path().join("svg.svg")).unwrap();
    assert!(svg.contains(r#"width="128" height="128" viewBox="0 0 512 512""#));

    let inner = fs::read_to_string(dir.path().join("inner-svg.svg")).unwrap();
    assert!(inner.starts_with("<svg"));
    assert!(inner.contains(r#"d="M12 2L2 22h20z""#));
    assert!(inner.contains(r##"color="#FFFFFF""##));
}

#[tokio::test]
async fn profile_file_drives_session_export() {
    let dir = tempfile::tempdir().unwrap();
    let profile_path = dir.path().join("profile.json");
    let profile = StyleProfile::new(styled()).with_image_size(64);
    fs::write(&profile_path, profile.to_json_pretty().unwrap()).unwrap();

    let json = fs::read_to_string(&profile_path).unwrap();
    let mut session = StyleSession::new();
    session.apply_profile(&StyleProfile::import(&json).unwrap());
    session.set_icon(Some(ICON.to_string()));

    let sink = DirectorySink::new(dir.path().join("out"));
    let path = session
        .export(ExportFormat::Png, "styled", &sink)
        .await
        .unwrap()
        .unwrap();

    let img = image::open(path).unwrap();
    assert_eq!((img.width(), img.height()), (64, 64));
}

#[tokio::test]
async fn snapshot_export_survives_later_edits() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = StyleSession::new();
    session.set_icon(Some(ICON.to_string()));

    let root = session.render_root().unwrap().unwrap();
    session.update(|s| s.icon_color = "#ff0000".to_string());

    let handle = spawn_export(
        96,
        "before-edit",
        ExportFormat::InnerSvg,
        Some(root),
        Arc::new(DirectorySink::new(dir.path())),
    );
    let path = handle.await.unwrap().unwrap();

    let inner = fs::read_to_string(path).unwrap();
    assert!(inner.contains(r##"color="#FFFFFF""##));
    assert!(!inner.contains("#ff0000"));
}

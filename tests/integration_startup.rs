//! Integration test to ensure scene files load, build and render end to end.

use blaze::{BlazeError, BlazeResult, SceneDescription, SpriteSettings, Stage};
use std::io::Write;

const SCENE: &str = r#"{
    "name": "startup",
    "root": {
        "width": 32,
        "height": 32,
        "fill": [10, 20, 30, 255],
        "children": [
            { "width": 4, "height": 4, "x": 2, "y": 2, "alpha": 0.5, "fill": [254, 254, 254, 255] },
            { "width": 4, "height": 4, "x": 8, "y": 8, "rotation": 90, "fill": [255, 0, 0, 255],
              "children": [ { "width": 1, "height": 1, "fill": [0, 255, 0, 255] } ] }
        ]
    }
}"#;

#[test]
fn test_scene_file_renders_to_stage() -> BlazeResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SCENE.as_bytes())?;

    let scene = SceneDescription::load(file.path())?;
    assert_eq!(scene.name, "startup");
    assert_eq!(scene.root.node_count(), 4);

    let mut root = scene.build()?;
    assert_eq!(root.child_count(), 2);

    let mut stage = Stage::new();
    root.render(Some(&mut stage))?;

    let frame = stage.last().expect("root attached a surface");
    assert_eq!(frame.size(), (32, 32));

    // Half-opaque light child over the backdrop, drawn at (2, 2) + (2, 2)
    assert_eq!(frame.get_pixel(4, 4), Some([132, 137, 142, 255]));
    assert_eq!(frame.get_pixel(3, 3), Some([10, 20, 30, 255]));
    assert_eq!(frame.get_pixel(0, 0), Some([10, 20, 30, 255]));

    Ok(())
}

#[test]
fn test_missing_scene_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SceneDescription::load(dir.path().join("missing.json"));
    assert!(matches!(result, Err(BlazeError::Io(_))));
}

#[test]
fn test_scene_survives_json_round_trip() -> BlazeResult<()> {
    let scene = SceneDescription::from_json(SCENE)?;
    let reparsed = SceneDescription::from_json(&scene.to_json()?)?;
    assert_eq!(reparsed, scene);
    Ok(())
}

#[test]
fn test_invalid_scene_builds_nothing() {
    let scene = SceneDescription {
        name: "broken".to_string(),
        root: SpriteSettings {
            rotation: f32::NAN,
            ..SpriteSettings::default()
        },
    };

    assert!(matches!(scene.build(), Err(BlazeError::InvalidScene(_))));
}

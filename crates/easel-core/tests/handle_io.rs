//! Save/open round trips through the filesystem.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use easel_core::{ImageConfig, ImageError, ImageFormat, ImageHandle, Size};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("easel_{}_{}_{}", prefix, std::process::id(), nanos))
}

fn cleanup(dir: &Path) {
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn save_then_open_keeps_size_and_format() {
    init_logging();
    let dir = unique_temp_dir("roundtrip");

    for token in ["png", "jpg", "webp", "bmp"] {
        let mut image = ImageHandle::solid("336699", (40, 20)).unwrap();
        image.convert(token).unwrap();
        image.rename(&format!("sample-{}", token));
        image.save(Some(&dir)).unwrap();

        let path = dir.join(image.name(true));
        assert!(path.is_file(), "{} was not written", path.display());

        let reopened = ImageHandle::open(&path).unwrap();
        assert_eq!(reopened.size(), Size::new(40, 20));
        assert_eq!(reopened.format(), ImageFormat::from_extension(token).unwrap());
        assert_eq!(reopened.name(false), format!("sample-{}", token));
        assert_eq!(reopened.output_dir(), Some(dir.as_path()));
    }

    cleanup(&dir);
}

#[test]
fn png_round_trip_is_lossless() {
    init_logging();
    let dir = unique_temp_dir("lossless");

    let mut image = ImageHandle::solid("0a141e", 8).unwrap();
    image.convert("png").unwrap();
    image.save(Some(&dir)).unwrap();

    let reopened = ImageHandle::open(dir.join(image.name(true))).unwrap();
    assert_eq!(reopened.raster().pixel(3, 3), image.raster().pixel(3, 3));
    assert_eq!(reopened.content_hash().unwrap(), image.content_hash().unwrap());

    cleanup(&dir);
}

#[test]
fn open_missing_file_is_not_found() {
    init_logging();
    let path = unique_temp_dir("missing").join("nothing.png");

    match ImageHandle::open(&path) {
        Err(ImageError::ResourceNotFound(message)) => assert!(message.contains("nothing.png")),
        other => panic!("expected ResourceNotFound, got {:?}", other.map(|h| h.name(true))),
    }
}

#[test]
fn open_rejects_non_image_files() {
    init_logging();
    let dir = unique_temp_dir("notimage");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("notes.png");
    std::fs::write(&path, b"just some text").unwrap();

    assert!(matches!(ImageHandle::open(&path), Err(ImageError::UnsupportedFormat(_))));

    cleanup(&dir);
}

#[test]
fn open_enforces_size_limit() {
    init_logging();
    let dir = unique_temp_dir("limit");

    let mut image = ImageHandle::solid("fff", 32).unwrap();
    image.save(Some(&dir)).unwrap();

    let mut config = ImageConfig::default();
    config.max_file_size = 16;
    let result = config.open(dir.join(image.name(true)));
    assert!(matches!(result, Err(ImageError::ResourceLimit(_))));

    cleanup(&dir);
}

#[test]
fn save_without_directory_is_a_configuration_error() {
    init_logging();
    let mut image = ImageHandle::solid("fff", 4).unwrap();

    match image.save(None) {
        Err(ImageError::Configuration(message)) => assert_eq!(message, "Set a path to save the file"),
        Err(other) => panic!("expected Configuration, got {}", other),
        Ok(_) => panic!("save without a directory succeeded"),
    }
}

#[test]
fn save_falls_back_to_configured_directory() {
    init_logging();
    let dir = unique_temp_dir("fallback");

    let config = ImageConfig::default().with_output_dir(&dir);
    let mut image = config.solid("f00", (3, 2)).unwrap();
    image.save(None).unwrap();

    assert!(dir.join("color-ff0000-3-2.jpg").is_file());
    assert_eq!(image.output_dir(), Some(dir.as_path()));

    cleanup(&dir);
}

#[test]
fn opened_image_saves_next_to_its_source() {
    init_logging();
    let dir = unique_temp_dir("sibling");

    let mut image = ImageHandle::solid("00f", 10).unwrap();
    image.rename("source.png");
    image.convert("png").unwrap();
    image.save(Some(&dir)).unwrap();

    let mut reopened = ImageHandle::open(dir.join("source.png")).unwrap();
    reopened.rename("derived").resize(5);
    reopened.save(None).unwrap();

    let derived = ImageHandle::open(dir.join("derived.png")).unwrap();
    assert_eq!(derived.size(), Size::new(5, 5));

    cleanup(&dir);
}

#[test]
fn set_path_joins_segments() {
    init_logging();
    let root = unique_temp_dir("segments");

    let mut image = ImageHandle::solid("123", 2).unwrap();
    image.set_path([root.as_path(), Path::new("a"), Path::new("b")]);
    image.save(None).unwrap();

    assert!(root.join("a").join("b").join(image.name(true)).is_file());

    cleanup(&root);
}

#[test]
fn resize_then_crop_end_to_end() {
    init_logging();
    let dir = unique_temp_dir("resize_crop");

    let mut image = ImageHandle::solid("808080", (100, 50)).unwrap();
    image.resize(50);
    assert_eq!(image.size(), Size::new(50, 25));

    image.crop((60, 60), 0);
    assert_eq!(image.size(), Size::new(25, 25));

    image.save(Some(&dir)).unwrap();
    let reopened = ImageHandle::open(dir.join(image.name(true))).unwrap();
    assert_eq!(reopened.size(), Size::new(25, 25));

    cleanup(&dir);
}

#[test]
fn transparent_quarter_turn_writes_webp() {
    init_logging();
    let dir = unique_temp_dir("rotate");

    let mut image = ImageHandle::solid("fff", (30, 10)).unwrap();
    image.rotate(90, true);
    assert_eq!(image.format(), ImageFormat::Webp);
    assert_eq!(image.size(), Size::new(10, 30));

    image.save(Some(&dir)).unwrap();
    let path = dir.join(image.name(true));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("webp"));

    let reopened = ImageHandle::open(&path).unwrap();
    assert_eq!(reopened.size(), Size::new(10, 30));

    cleanup(&dir);
}

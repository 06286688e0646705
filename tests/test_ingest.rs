mod common;

use footsize::ingest::{allowed_file, decode_image, load_image};

use common::*;

#[test]
fn test_allowed_extensions() {
    for name in ["foot.png", "foot.JPG", "scan.jpeg", "anim.gif", "a.b.Png"] {
        assert!(allowed_file(name), "{name} should be accepted");
    }
    for name in ["foot.bmp", "foot", "png", "foot.png.exe", "foot."] {
        assert!(!allowed_file(name), "{name} should be rejected");
    }
}

#[test]
fn test_disallowed_extension_is_rejected_before_reading() {
    let err = load_image(std::path::Path::new("/nonexistent/foot.bmp")).unwrap_err();
    assert!(matches!(err, FootError::UnsupportedFormat { ref file_name } if file_name == "foot.bmp"));
    assert!(!err.is_detection());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_image(std::path::Path::new("/nonexistent/foot.png")).unwrap_err();
    assert!(matches!(err, FootError::Io { .. }));
}

#[test]
fn test_garbage_bytes_are_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, FootError::Decode { .. }));
    assert!(!err.is_detection());
    assert_eq!(err.user_message(), "Failed to read the uploaded image");
}

#[test]
fn test_png_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("photo.png");
    let photo = synthetic_photo();
    photo.save_with_format(&path, image::ImageFormat::Png)?;

    let loaded = load_image(&path)?;
    assert_eq!(loaded, photo);

    let from_bytes = decode_image(&std::fs::read(&path)?)?;
    assert_eq!(from_bytes, photo);
    Ok(())
}

#[test]
fn test_grayscale_upload_becomes_rgb() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("gray.png");
    let gray = image::GrayImage::from_pixel(8, 6, image::Luma([90]));
    gray.save_with_format(&path, image::ImageFormat::Png)?;

    let loaded = load_image(&path)?;
    assert_eq!(loaded.dimensions(), (8, 6));
    assert_eq!(loaded.get_pixel(3, 3).0, [90, 90, 90]);
    Ok(())
}

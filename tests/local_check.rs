//! `LocalDirCheck` against a temporary site tree, including a full discovery run.

use std::fs;
use std::path::Path;

use property_gallery::check::{self, LocalDirCheck};
use property_gallery::config::Configuration;
use property_gallery::gallery::{GallerySource, StopReason, discover_gallery};
use property_gallery::{ExistenceCheck, ImageRef, ProbeOptions, discover};
use tempfile::tempdir;

/// A valid minimal 1x1 RGBA PNG.
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8, 0xCF, 0xC0, 0x00,
    0x00, 0x03, 0x01, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x78, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E,
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// JPEG start-of-image marker followed by an APP0 segment header.
const JPEG_HEAD: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn recognises_images_and_rejects_everything_else() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "img/g01.png", PNG_BYTES);
    write(root, "img/g02.jpg", JPEG_HEAD);
    write(root, "img/g03.jpg", b"<html>not an image</html>");
    write(root, "img/g04.jpg", b"");
    fs::create_dir_all(root.join("img/g05.jpg")).unwrap();

    let check = LocalDirCheck::new(root);
    assert!(check.exists("/img/g01.png").await);
    assert!(check.exists("img/g02.jpg").await);
    assert!(!check.exists("/img/g03.jpg").await, "html body");
    assert!(!check.exists("/img/g04.jpg").await, "empty file");
    assert!(!check.exists("/img/g05.jpg").await, "directory");
    assert!(!check.exists("/img/missing.jpg").await);
    assert!(!check.exists("../outside.png").await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn discovers_site_directory_on_disk() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "assets/images/properties/ABC/g01.jpg", JPEG_HEAD);
    write(root, "assets/images/properties/ABC/g02.jpg", JPEG_HEAD);
    write(root, "assets/images/properties/ABC/g5.png", PNG_BYTES);
    // Decoy: right name, wrong content.
    write(root, "assets/images/properties/ABC/g03.webp", b"nope");
    write(root, "assets/images/properties/ABC/notes.txt", b"x");

    let check = LocalDirCheck::new(root);
    let res = discover(
        "/assets/images/properties/ABC/",
        "ABC",
        &ProbeOptions::default(),
        &check,
    )
    .await;

    assert_eq!(
        res.images,
        vec![
            ImageRef::new("/assets/images/properties/ABC/g01.jpg", "ABC photo 1"),
            ImageRef::new("/assets/images/properties/ABC/g02.jpg", "ABC photo 2"),
            ImageRef::new("/assets/images/properties/ABC/g5.png", "ABC photo 3"),
        ]
    );
    assert_eq!(res.stop, StopReason::MissStreak);
    assert_eq!(res.last_index, 13);
}

fn config_for(yaml: &str) -> Configuration {
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    cfg.validated().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn default_base_dir_finds_images_under_local_root() {
    let tmp = tempdir().unwrap();
    write(tmp.path(), "assets/images/properties/ABC/g01.jpg", JPEG_HEAD);
    let cfg = config_for(&format!(
        "property-code: ABC\nsource:\n  type: local\n  root: {}\n",
        tmp.path().display()
    ));

    let checker = check::from_source(&cfg.source).unwrap();
    let gallery = discover_gallery(&cfg, &*checker).await.unwrap();
    assert_eq!(gallery.source, GallerySource::Discovered);
    assert_eq!(
        gallery.images,
        vec![ImageRef::new(
            "/assets/images/properties/ABC/g01.jpg",
            "ABC photo 1"
        )]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn page_relative_default_base_dir_resolves_on_disk() {
    let tmp = tempdir().unwrap();
    write(tmp.path(), "assets/images/properties/ABC/g1.png", PNG_BYTES);
    write(tmp.path(), "properties/abc/index.html", b"<html></html>");
    let cfg = config_for(&format!(
        "property-code: ABC\nsource:\n  type: local\n  root: {}\n  page: properties/abc/index.html\n",
        tmp.path().display()
    ));

    let checker = check::from_source(&cfg.source).unwrap();
    let gallery = discover_gallery(&cfg, &*checker).await.unwrap();
    assert_eq!(
        gallery.images,
        vec![ImageRef::new(
            "../../assets/images/properties/ABC/g1.png",
            "ABC photo 1"
        )]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_property_code_renders_fallback_list() {
    let tmp = tempdir().unwrap();
    write(tmp.path(), "assets/images/properties/ABC/g01.jpg", JPEG_HEAD);
    let cfg = config_for(&format!(
        "source:\n  type: local\n  root: {}\nfallback-images:\n  - src: /static/front.jpg\n",
        tmp.path().display()
    ));
    assert!(cfg.property_code().is_none());

    let checker = check::from_source(&cfg.source).unwrap();
    let gallery = discover_gallery(&cfg, &*checker).await.unwrap();
    assert_eq!(gallery.source, GallerySource::Fallback);
    assert_eq!(
        gallery.images,
        vec![ImageRef::new("/static/front.jpg", "Property photo")]
    );

    let bare = config_for("property-code: ''\n");
    assert!(discover_gallery(&bare, &*checker).await.is_none());
}

use std::path::Path;

fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_readme_is_shipped_and_utf8() {
    let readme = std::fs::read(manifest_dir().join("README.md")).expect("README.md is missing");
    let text = String::from_utf8(readme).expect("README.md is not UTF-8");
    assert!(!text.trim().is_empty());
}

#[test]
fn test_manifest_metadata() {
    assert_eq!(env!("CARGO_PKG_VERSION"), "0.0.1");
    assert_eq!(env!("CARGO_PKG_NAME"), "aurora-connector");
    assert_eq!(
        env!("CARGO_PKG_DESCRIPTION"),
        "A Rust AWS Aurora Serverless Connector."
    );
    assert_eq!(env!("CARGO_PKG_README"), "README.md");
}

#[test]
fn test_declared_modules_exist_on_disk() {
    let src = manifest_dir().join("src");
    assert!(src.join("lib.rs").is_file());
    assert!(src.join("helpers").join("mod.rs").is_file());
}

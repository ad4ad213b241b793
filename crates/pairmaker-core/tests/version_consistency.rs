//! Ensures all workspace crates use `version.workspace = true` and that
//! the workspace version matches the compiled package version.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("crate lives two levels below the workspace root")
        .to_path_buf()
}

fn read_toml(path: &Path) -> toml::Table {
    let raw = std::fs::read_to_string(path).expect("read Cargo.toml");
    raw.parse().expect("parse Cargo.toml")
}

#[test]
fn all_crates_use_workspace_version() {
    let root = workspace_root();
    for krate in ["crates/pairmaker-core", "crates/pairmaker-cli"] {
        let doc = read_toml(&root.join(krate).join("Cargo.toml"));
        let inherited = doc["package"]["version"]
            .as_table()
            .and_then(|t| t.get("workspace"))
            .and_then(|v| v.as_bool());
        assert_eq!(
            inherited,
            Some(true),
            "{krate} should use version.workspace = true"
        );
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    let doc = read_toml(&workspace_root().join("Cargo.toml"));
    let ws_version = doc["workspace"]["package"]["version"]
        .as_str()
        .expect("workspace version");
    assert_eq!(ws_version, env!("CARGO_PKG_VERSION"));
    assert_eq!(ws_version, pairmaker_core::VERSION);
}

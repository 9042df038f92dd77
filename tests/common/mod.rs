use assert_cmd::Command;
use std::path::PathBuf;

pub fn convert_cmd() -> Command {
    let mut cmd = Command::cargo_bin("journal-convert").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

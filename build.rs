use std::process::Command;
use anyhow::{self, Context};

fn main() {
    let git_version = describe_head().unwrap_or_else(|_| "unknown".to_owned());
    println!("cargo:rustc-env=GIT_VERSION={}", git_version);
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn describe_head() -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(&["describe", "--always"])
        .output().context("Failed to get git version")?;
    if !output.status.success() {
        anyhow::bail!("git describe exited with status {}", output.status.code().unwrap_or(-1));
    }
    let version = String::from_utf8(output.stdout)?.trim().to_owned();
    if version.is_empty() {
        anyhow::bail!("git describe returned nothing");
    }
    Ok(version)
}

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=APP_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    // Version priority: APP_VERSION env, then the latest git tag, then the
    // crate version from Cargo.toml
    let version = std::env::var("APP_VERSION")
        .ok()
        .or_else(latest_git_tag)
        .map(|v| v.strip_prefix('v').unwrap_or(&v).to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=APP_VERSION={}", version);
}

fn latest_git_tag() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let tag = String::from_utf8(output.stdout).ok()?;
    Some(tag.trim().to_string())
}

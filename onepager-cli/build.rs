// Build script: expose ONEPAGER_VERSION for `onepager --version`
//
// Uses `git describe` when a tag is reachable, otherwise the crate version
// suffixed with the short commit. Builds outside a git checkout fall back to
// CARGO_PKG_VERSION unchanged.

use std::process::Command;

fn main() {
    let package_version = env!("CARGO_PKG_VERSION");
    let version = describe_version(package_version).unwrap_or_else(|| package_version.to_string());

    println!("cargo:rustc-env=ONEPAGER_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

fn describe_version(package_version: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    if described.is_empty() {
        return None;
    }

    match described.strip_prefix('v') {
        // "v0.2.0" or "v0.2.0-3-gabc1234[-dirty]": keep the tag's version
        Some(tagged) => Some(tagged.split('-').next().unwrap_or(tagged).to_string()),
        // Untagged history: "abc1234" or "abc1234-dirty"
        None => Some(format!("{}-{}", package_version, described)),
    }
}

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let package_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();

    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output();

    let version = match output {
        Ok(o) if o.status.success() => {
            let git_output = String::from_utf8(o.stdout)
                .unwrap_or_default()
                .trim()
                .to_string();

            // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
            let version = git_output.strip_prefix('v').unwrap_or(&git_output);

            // Only trust release-looking tags; bare commit hashes keep the package version
            if version.starts_with(|c: char| c.is_ascii_digit()) && version.contains('.') {
                version.to_string()
            } else {
                package_version
            }
        }
        _ => package_version,
    };

    println!("cargo:rustc-env=MIDTRANS_CLIENT_VERSION={}", version);
}

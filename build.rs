use std::process::Command;

/// Trimmed stdout of a command, or `None` if it is missing or fails.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    let commit_sha = command_stdout("git", &["rev-parse", "--short", "HEAD"]);
    let build_date = command_stdout("date", &["-u", "+%Y-%m-%d"]);

    // "rustc 1.80.0 (051478957 2024-07-21)" -> "1.80.0"
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version = command_stdout(&rustc, &["--version"]).and_then(|s| {
        s.strip_prefix("rustc ")
            .and_then(|v| v.split_whitespace().next())
            .map(str::to_string)
    });

    for (key, value) in [
        ("PROCMAP_COMMIT_SHA", commit_sha),
        ("PROCMAP_BUILD_DATE", build_date),
        ("PROCMAP_RUSTC_VERSION", rustc_version),
    ] {
        println!(
            "cargo:rustc-env={}={}",
            key,
            value.unwrap_or_else(|| "unknown".to_string())
        );
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}

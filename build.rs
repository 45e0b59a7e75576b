//! Embeds the commit and compiler that produced the `orchestrator` binary

use std::process::Command;

fn main() {
    let commit = first_output_line("git", &["describe", "--always", "--dirty"]);
    println!("cargo:rustc-env=ORCHESTRATOR_GIT_COMMIT={}", commit);

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let compiler = first_output_line(&rustc, &["--version"]);
    println!("cargo:rustc-env=ORCHESTRATOR_RUSTC={}", compiler);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=RUSTC");
}

/// First line of a command's stdout, or "unknown" when it cannot run
fn first_output_line(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|stdout| stdout.lines().next().map(|line| line.trim().to_string()))
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

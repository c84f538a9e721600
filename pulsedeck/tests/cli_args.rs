//! CLI arg parsing tests for pulsedeck
use assert_cmd::Command;

fn run(args: &[&str]) -> (bool, String) {
    let out = Command::cargo_bin("pulsedeck")
        .expect("binary built")
        .args(args)
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("pulsedeck-cli-tests"))
        .output()
        .expect("run pulsedeck");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    (out.status.success(), text)
}

#[test]
fn help_mentions_short_and_long_flags() {
    let (ok, text) = run(&["--help"]);
    assert!(ok);
    for flag in ["--profile", "-P", "--interval", "-i", "--token", "-k", "--dry-run"] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn flags_accepted_before_help() {
    let (ok, text) = run(&["--interval", "5", "--help"]);
    assert!(ok, "--interval 5 --help did not succeed");
    assert!(text.contains("Usage:"));

    let (ok, text) = run(&["-k", "123456", "--profile", "dev", "--help"]);
    assert!(ok, "-k … --profile dev --help did not succeed");
    assert!(text.contains("Usage:"));
}

#[test]
fn invalid_interval_fails() {
    let (ok, text) = run(&["--interval", "soon", "http://h:1"]);
    assert!(!ok);
    assert!(text.contains("--interval"));
}

#[test]
fn dry_run_strips_magic_token() {
    let (ok, text) = run(&["--dry-run", "http://pi:3000/?token=123456"]);
    assert!(ok, "{text}");
    assert!(text.contains("http://pi:3000/"), "{text}");
    assert!(!text.contains("123456"), "token leaked into output: {text}");
}

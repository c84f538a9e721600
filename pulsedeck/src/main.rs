//! Entry point for the pulsedeck TUI. Parses args and runs the App.

use std::env;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use pulsedeck::client::split_magic_token;
use pulsedeck::credential::{session_path, CredentialStore};
use pulsedeck::profiles::{
    config_dir, load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile,
};
use pulsedeck::scheduler::DEFAULT_INTERVAL;
use pulsedeck::{logging, App, RemoteClient};

const USAGE_ARGS: &str = "[--profile NAME|-P NAME] [--save] [--interval SECS|-i SECS] [--token KEY|-k KEY] [--dry-run] [http://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    profile: Option<String>,
    interval_secs: Option<u64>,
    token: Option<String>,
    save: bool,
    dry_run: bool,
}

#[derive(Debug)]
enum ArgsError {
    Help(String),
    Invalid(String),
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgsError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "pulsedeck".into());
    let usage = format!("Usage: {prog} {USAGE_ARGS}");
    let mut out = ParsedArgs::default();

    let parse_secs = |v: Option<String>, usage: &str| -> Result<u64, ArgsError> {
        v.as_deref()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| ArgsError::Invalid(format!("--interval expects seconds > 0. {usage}")))
    };

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(ArgsError::Help(usage)),
            "--profile" | "-P" => out.profile = it.next(),
            "--interval" | "-i" => out.interval_secs = Some(parse_secs(it.next(), &usage)?),
            "--token" | "-k" => out.token = it.next(),
            "--save" => out.save = true,
            "--dry-run" => out.dry_run = true,
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        out.profile = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--interval=") => {
                let v = arg.split_once('=').map(|(_, v)| v.to_string());
                out.interval_secs = Some(parse_secs(v, &usage)?);
            }
            _ if arg.starts_with("--token=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        out.token = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with('-') => {
                return Err(ArgsError::Invalid(format!("Unknown flag {arg}. {usage}")));
            }
            _ => {
                if out.url.is_none() {
                    out.url = Some(arg);
                } else {
                    return Err(ArgsError::Invalid(format!("Unexpected argument. {usage}")));
                }
            }
        }
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgsError::Help(msg)) => {
            println!("{msg}");
            return Ok(());
        }
        Err(ArgsError::Invalid(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    // A `?token=` on the URL is a one-time credential; never persist it in a profile.
    if let Some(raw) = parsed.url.take() {
        let (clean, magic) = split_magic_token(&raw)?;
        parsed.url = Some(clean);
        if parsed.token.is_none() {
            parsed.token = magic;
        }
    }

    let Some((url, interval_secs)) = resolve_target(&parsed)? else {
        return Ok(());
    };

    if parsed.dry_run {
        println!("pulsedeck: would connect to {url}");
        return Ok(());
    }

    let _guard = logging::init(&config_dir()).context("init logging")?;

    let credential = CredentialStore::load(session_path());
    if let Some(token) = parsed.token.as_deref() {
        credential.store(token).context("store session credential")?;
    }

    let interval = interval_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_INTERVAL);
    info!(%url, interval_ms = interval.as_millis() as u64, "starting");

    let client = RemoteClient::new(&url, credential)?;
    let mut app = App::new(client, interval, "/");
    app.run().await
}

/// Profile resolution with the interactive prompts. `None` means the user
/// aborted.
fn resolve_target(parsed: &ParsedArgs) -> anyhow::Result<Option<(String, Option<u64>)>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        interval_secs: parsed.interval_secs,
    };
    let mut profiles_mut = profiles_file.clone();

    let target = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(u, i) => {
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry {
                    url: u.clone(),
                    interval_secs: i,
                };
                match profiles_mut.profiles.get(name) {
                    None => {
                        // New profile: auto-save immediately
                        profiles_mut.profiles.insert(name.clone(), entry);
                        save_profiles(&profiles_mut)?;
                    }
                    Some(existing) if *existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ));
                        if overwrite {
                            profiles_mut.profiles.insert(name.clone(), entry);
                            save_profiles(&profiles_mut)?;
                        }
                    }
                    Some(_) => {}
                }
            }
            (u, i)
        }
        ResolveProfile::Loaded(u, i) => (u, i),
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|idx| (1..=names.len()).contains(idx))
                .and_then(|idx| profiles_mut.profiles.get(&names[idx - 1]));
            match picked {
                Some(entry) => (
                    entry.url.clone(),
                    parsed.interval_secs.or(entry.interval_secs),
                ),
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT): ")?;
            let url = url.trim().to_string();
            if url.is_empty() {
                return Ok(None);
            }
            profiles_mut.profiles.insert(
                name,
                ProfileEntry {
                    url: url.clone(),
                    interval_secs: parsed.interval_secs,
                },
            );
            save_profiles(&profiles_mut)?;
            (url, parsed.interval_secs)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(target))
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("pulsedeck")
            .chain(v.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn flags_long_and_short() {
        let p = parse_args(args(&["-P", "home", "-i", "5", "-k", "123456", "http://h:3000"]))
            .unwrap();
        assert_eq!(p.profile.as_deref(), Some("home"));
        assert_eq!(p.interval_secs, Some(5));
        assert_eq!(p.token.as_deref(), Some("123456"));
        assert_eq!(p.url.as_deref(), Some("http://h:3000"));

        let p = parse_args(args(&["--profile=x", "--interval=7", "--save", "--dry-run"])).unwrap();
        assert_eq!(p.profile.as_deref(), Some("x"));
        assert_eq!(p.interval_secs, Some(7));
        assert!(p.save && p.dry_run);
    }

    #[test]
    fn bad_interval_and_extra_args_rejected() {
        assert!(matches!(
            parse_args(args(&["-i", "0"])),
            Err(ArgsError::Invalid(_))
        ));
        assert!(matches!(
            parse_args(args(&["http://a", "http://b"])),
            Err(ArgsError::Invalid(_))
        ));
        assert!(matches!(parse_args(args(&["--help"])), Err(ArgsError::Help(_))));
    }
}

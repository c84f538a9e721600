//! Saved dashboard hosts. Each named entry keeps the base URL and an
//! optional poll interval, in `profiles.json` next to the session file.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("pulsedeck")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pulsedeck")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

/// A missing or unreadable file is an empty set of profiles.
pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> std::io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq)]
pub enum ResolveProfile {
    /// URL from the command line; the caller decides whether to save it.
    Direct(String, Option<u64>),
    /// Host taken from a saved entry. A CLI interval wins over the stored one.
    Loaded(String, Option<u64>),
    /// No URL or name given; pick one of these.
    PromptSelect(Vec<String>),
    /// Named profile is unknown; ask for its URL.
    PromptCreate(String),
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub interval_secs: Option<u64>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        if let (None, Some(name)) = (&self.url, &self.profile_name) {
            return match pf.profiles.get(name) {
                Some(entry) => ResolveProfile::Loaded(
                    entry.url.clone(),
                    self.interval_secs.or(entry.interval_secs),
                ),
                None => ResolveProfile::PromptCreate(name.clone()),
            };
        }
        if let Some(u) = self.url {
            return ResolveProfile::Direct(u, self.interval_secs);
        }
        if pf.profiles.is_empty() {
            ResolveProfile::None
        } else {
            ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with(name: &str, url: &str) -> ProfilesFile {
        let mut pf = ProfilesFile::default();
        pf.profiles.insert(
            name.into(),
            ProfileEntry {
                url: url.into(),
                interval_secs: Some(30),
            },
        );
        pf
    }

    #[test]
    fn profile_only_loads_existing_entry() {
        let pf = file_with("home", "http://pi:3000");
        let req = ProfileRequest {
            profile_name: Some("home".into()),
            url: None,
            interval_secs: None,
        };
        assert_eq!(
            req.resolve(&pf),
            ResolveProfile::Loaded("http://pi:3000".into(), Some(30))
        );
    }

    #[test]
    fn unknown_profile_prompts_create() {
        let req = ProfileRequest {
            profile_name: Some("new".into()),
            url: None,
            interval_secs: None,
        };
        assert_eq!(
            req.resolve(&ProfilesFile::default()),
            ResolveProfile::PromptCreate("new".into())
        );
    }

    #[test]
    fn nothing_given_selects_or_fails() {
        let none = ProfileRequest {
            profile_name: None,
            url: None,
            interval_secs: None,
        };
        assert_eq!(none.resolve(&ProfilesFile::default()), ResolveProfile::None);
        let pick = ProfileRequest {
            profile_name: None,
            url: None,
            interval_secs: None,
        };
        assert_eq!(
            pick.resolve(&file_with("a", "http://a")),
            ResolveProfile::PromptSelect(vec!["a".into()])
        );
    }

    #[test]
    fn cli_interval_overrides_saved_one() {
        let pf = file_with("home", "http://pi:3000");
        let req = ProfileRequest {
            profile_name: Some("home".into()),
            url: None,
            interval_secs: Some(5),
        };
        assert_eq!(
            req.resolve(&pf),
            ResolveProfile::Loaded("http://pi:3000".into(), Some(5))
        );
        let direct = ProfileRequest {
            profile_name: Some("home".into()),
            url: Some("http://other:3000".into()),
            interval_secs: None,
        };
        assert_eq!(
            direct.resolve(&pf),
            ResolveProfile::Direct("http://other:3000".into(), None)
        );
    }
}

//! Types that mirror the dashboard API's JSON schema.

use serde::{Deserialize, Deserializer};

use crate::error::Failure;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Agent {
    pub name: String,
    // the backend reports pids as strings or numbers depending on how it probed them
    #[serde(deserialize_with = "string_or_number")]
    pub pid: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CronJob {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Commit {
    pub msg: String,
    pub date: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct GitInfo {
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct FileTreeNode {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub children: Option<Vec<FileTreeNode>>,
}

impl FileTreeNode {
    /// Children of a directory; files never expose any.
    pub fn child_nodes(&self) -> &[FileTreeNode] {
        if !self.is_dir {
            return &[];
        }
        self.children.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SystemConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AiUsage {
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub percent: f64,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Point-in-time aggregate returned by the status endpoint.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StatusSnapshot {
    pub cpu: f64,
    pub ram: f64,
    pub disk: f64,
    pub uptime: String,
    pub heartbeat_last: i64,
    pub heartbeat_raw: String,
    pub agents: Vec<Agent>,
    pub cron: Vec<CronJob>,
    pub git: GitInfo,
    // older backends sent commits at the top level
    pub commits: Vec<Commit>,
    pub files: Vec<FileTreeNode>,
    pub system_configs: Vec<SystemConfig>,
    pub ai: Option<AiUsage>,
}

impl StatusSnapshot {
    pub fn commits(&self) -> &[Commit] {
        if self.git.commits.is_empty() {
            &self.commits
        } else {
            &self.git.commits
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePage {
    pub content: String,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileReadResponse {
    pub content: Option<String>,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub error: Option<String>,
}

impl FileReadResponse {
    pub fn into_page(self, requested: u32) -> Result<FilePage, Failure> {
        if let Some(err) = self.error {
            return Err(Failure::Content(err));
        }
        let content = self
            .content
            .ok_or_else(|| Failure::Content("file read returned no content".into()))?;
        Ok(FilePage {
            content,
            page: self.page.unwrap_or(requested),
            total_pages: self.total_pages.unwrap_or(1).max(1),
        })
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TranslateResponse {
    pub translated: Option<String>,
    pub error: Option<String>,
}

impl TranslateResponse {
    pub fn into_text(self) -> Result<String, Failure> {
        match (self.translated, self.error) {
            (_, Some(err)) => Err(Failure::Content(err)),
            (Some(t), None) => Ok(t),
            (None, None) => Err(Failure::Content("translation returned nothing".into())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AiStatusResponse {
    Failed { error: String },
    Usage(AiUsage),
}

impl AiStatusResponse {
    pub fn into_usage(self) -> Result<AiUsage, Failure> {
        match self {
            AiStatusResponse::Failed { error } => Err(Failure::Content(error)),
            AiStatusResponse::Usage(u) => Ok(u),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub has_git: bool,
    #[serde(default)]
    pub has_origin: bool,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub files: Vec<FileTreeNode>,
}

impl ProjectInfo {
    pub fn linked_to_origin(&self) -> bool {
        self.has_origin || self.origin.as_deref().is_some_and(|o| !o.is_empty())
    }
}

fn string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        S(String),
        N(i64),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::S(s) => s,
        Raw::N(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_snapshot_fills_defaults() {
        let s: StatusSnapshot = serde_json::from_str(
            r#"{"cpu":42.7,"ram":10.2,"disk":88.9,"uptime":"3d","heartbeat_last":100}"#,
        )
        .unwrap();
        assert_eq!(s.uptime, "3d");
        assert!(s.agents.is_empty());
        assert!(s.ai.is_none());
    }

    #[test]
    fn pid_accepts_string_or_number() {
        let a: Vec<Agent> =
            serde_json::from_str(r#"[{"name":"a","pid":"12"},{"name":"b","pid":34}]"#).unwrap();
        assert_eq!(a[0].pid, "12");
        assert_eq!(a[1].pid, "34");
    }

    #[test]
    fn legacy_top_level_commits_are_used() {
        let s: StatusSnapshot =
            serde_json::from_str(r#"{"commits":[{"msg":"init","date":"1 day ago"}]}"#).unwrap();
        assert_eq!(s.commits().len(), 1);
    }

    #[test]
    fn file_read_error_is_content_failure() {
        let r: FileReadResponse = serde_json::from_str(r#"{"error":"too big"}"#).unwrap();
        assert!(matches!(r.into_page(1), Err(Failure::Content(m)) if m == "too big"));
    }

    #[test]
    fn ai_status_error_variant() {
        let r: AiStatusResponse = serde_json::from_str(r#"{"error":"cli missing"}"#).unwrap();
        assert!(r.into_usage().is_err());
        let r: AiStatusResponse =
            serde_json::from_str(r#"{"used":1000,"percent":5,"model":"m"}"#).unwrap();
        assert_eq!(r.into_usage().unwrap().used, 1000);
    }
}

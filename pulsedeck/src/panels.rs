//! Status snapshot -> panel models.
//!
//! Lists are replaced wholesale on every snapshot and keep the server's
//! order. The heartbeat editor is the one field that is never overwritten
//! while the user has it focused.

use std::time::{Duration, Instant};

use chrono::{Local, TimeZone};

use crate::error::Failure;
use crate::tree::TreePanel;
use crate::types::{AiUsage, FileTreeNode, StatusSnapshot, SystemConfig};
use crate::ui::util::truncate_end;

pub const UNNAMED_TASK: &str = "Unnamed Task";
pub const NO_SCHEDULE: &str = "at once";
pub const CRON_ID_LEN: usize = 8;
pub const CRON_PAYLOAD_LEN: usize = 48;
pub const DEFAULT_AI_QUOTA: u64 = 1_000_000;
pub const SAVE_LABEL: &str = "SAVE TASKS";
pub const SAVED_LABEL: &str = "OK";
const SAVED_LABEL_FOR: Duration = Duration::from_secs(2);

/// Rounded percentage with unit suffix.
pub fn percent(v: f64) -> String {
    format!("{}%", v.round() as i64)
}

/// "Now" under a minute, otherwise whole minutes.
pub fn last_seen(now_unix: i64, heartbeat_last: i64) -> String {
    let elapsed = now_unix - heartbeat_last;
    if elapsed < 60 {
        "Now".into()
    } else {
        format!("{}m ago", elapsed / 60)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsPanel {
    pub cpu: String,
    pub ram: String,
    pub disk: String,
    pub cpu_pct: u16,
    pub ram_pct: u16,
    pub disk_pct: u16,
    pub uptime: String,
    pub heartbeat_seen: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRow {
    pub name: String,
    pub pid: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronRow {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub schedule: String,
    pub payload: String,
    pub payload_display: String,
}

impl CronRow {
    pub fn from_job(job: &crate::types::CronJob) -> Self {
        let name = non_empty(job.name.as_deref()).unwrap_or(UNNAMED_TASK);
        let schedule = non_empty(job.schedule.as_deref()).unwrap_or(NO_SCHEDULE);
        Self {
            id: job.id.clone(),
            short_id: job.id.chars().take(CRON_ID_LEN).collect(),
            name: name.to_string(),
            schedule: schedule.to_string(),
            payload: job.payload.clone(),
            payload_display: truncate_end(&job.payload, CRON_PAYLOAD_LEN),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRow {
    pub msg: String,
    pub date: String,
}

/// Editable heartbeat text.
#[derive(Debug, Default)]
pub struct HeartbeatEditor {
    text: String,
    focused: bool,
    saved_at: Option<Instant>,
}

impl HeartbeatEditor {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Take the server's text unless the user is typing.
    pub fn sync(&mut self, raw: &str) -> bool {
        if self.focused {
            return false;
        }
        self.text.clear();
        self.text.push_str(raw);
        true
    }

    pub fn insert(&mut self, c: char) {
        if self.focused {
            self.text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.focused {
            self.text.pop();
        }
    }

    pub fn mark_saved(&mut self, now: Instant) {
        self.saved_at = Some(now);
    }

    pub fn save_label(&self, now: Instant) -> &'static str {
        match self.saved_at {
            Some(t) if now.saturating_duration_since(t) < SAVED_LABEL_FOR => SAVED_LABEL,
            _ => SAVE_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    Cached,
    Live,
}

#[derive(Debug, Default)]
pub struct AiPanel {
    pub usage: Option<AiUsage>,
    pub busy: bool,
    pub error: Option<String>,
}

impl AiPanel {
    /// Returns true when the trigger should show the busy indicator.
    pub fn begin(&mut self, mode: AiMode) -> bool {
        if mode == AiMode::Live {
            self.busy = true;
        }
        self.busy
    }

    pub fn finish(&mut self, mode: AiMode, result: Result<AiUsage, Failure>) {
        if mode == AiMode::Live {
            self.busy = false;
        }
        match result {
            Ok(u) => {
                self.usage = Some(u);
                self.error = None;
            }
            Err(Failure::Content(msg)) => self.error = Some(msg),
            // transport hiccups keep the last good reading
            Err(_) => {}
        }
    }

    pub fn label(&self) -> String {
        match &self.usage {
            Some(u) => ai_label(u),
            None => match &self.error {
                Some(e) => format!("error: {e}"),
                None => "--".into(),
            },
        }
    }

    pub fn tooltip(&self) -> Option<String> {
        let ts = self.usage.as_ref()?.timestamp?;
        let when = Local.timestamp_opt(ts, 0).single()?;
        Some(format!("Updated {}", when.format("%H:%M:%S")))
    }
}

pub fn ai_label(u: &AiUsage) -> String {
    let quota = u.total.unwrap_or(DEFAULT_AI_QUOTA);
    let mut s = format!(
        "{}K/{}K ({}%)",
        u.used / 1000,
        quota / 1000,
        u.percent.round() as i64
    );
    if let Some(m) = u.model.as_deref().filter(|m| !m.is_empty()) {
        s.push_str(&format!(" [{m}]"));
    }
    s
}

/// Everything the dashboard draws, rebuilt from each snapshot.
#[derive(Debug, Default)]
pub struct Panels {
    pub stats: StatsPanel,
    pub heartbeat: HeartbeatEditor,
    pub agents: Vec<AgentRow>,
    pub cron: Vec<CronRow>,
    pub branch: String,
    pub commits: Vec<CommitRow>,
    pub configs: Vec<SystemConfig>,
    pub ai: AiPanel,
    pub files: Vec<FileTreeNode>,
    pub explorer: TreePanel,
    pub updates: u64,
}

impl Panels {
    /// Run the whole pipeline for one fetch. A failed fetch changes nothing.
    pub fn apply(&mut self, fetched: Result<&StatusSnapshot, &Failure>, now_unix: i64) -> bool {
        let Ok(s) = fetched else {
            return false;
        };

        self.stats = StatsPanel {
            cpu: percent(s.cpu),
            ram: percent(s.ram),
            disk: percent(s.disk),
            cpu_pct: clamp_pct(s.cpu),
            ram_pct: clamp_pct(s.ram),
            disk_pct: clamp_pct(s.disk),
            uptime: s.uptime.clone(),
            heartbeat_seen: last_seen(now_unix, s.heartbeat_last),
        };

        self.heartbeat.sync(&s.heartbeat_raw);

        self.agents = s
            .agents
            .iter()
            .map(|a| AgentRow {
                name: a.name.clone(),
                pid: a.pid.clone(),
            })
            .collect();
        self.cron = s.cron.iter().map(CronRow::from_job).collect();
        self.branch = s.git.branch.clone();
        self.commits = s
            .commits()
            .iter()
            .map(|c| CommitRow {
                msg: c.msg.clone(),
                date: c.date.clone(),
            })
            .collect();
        self.configs = s.system_configs.clone();
        if let Some(ai) = &s.ai {
            self.ai.usage = Some(ai.clone());
        }

        // expansion lives in `explorer` and is left alone
        self.files = s.files.clone();

        self.updates += 1;
        true
    }
}

fn clamp_pct(v: f64) -> u16 {
    v.clamp(0.0, 100.0).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CronJob;

    fn snapshot(now: i64) -> StatusSnapshot {
        serde_json::from_value(serde_json::json!({
            "cpu": 42.7, "ram": 10.2, "disk": 88.9, "uptime": "3d",
            "heartbeat_last": now - 45,
            "heartbeat_raw": "- check mail\n",
            "agents": [{"name": "Gateway", "pid": "77"}, {"name": "Main Session", "pid": 12}],
            "git": {"branch": "main", "commits": [{"msg": "b", "date": "1m"}, {"msg": "a", "date": "2m"}]},
            "ai": {"used": 232000, "percent": 23.2, "model": "gemini"}
        }))
        .unwrap()
    }

    #[test]
    fn stats_round_and_heartbeat_is_now() {
        let now = 1_700_000_000;
        let mut p = Panels::default();
        assert!(p.apply(Ok(&snapshot(now)), now));
        assert_eq!(p.stats.cpu, "43%");
        assert_eq!(p.stats.ram, "10%");
        assert_eq!(p.stats.disk, "89%");
        assert_eq!(p.stats.heartbeat_seen, "Now");
        assert_eq!(p.stats.uptime, "3d");
    }

    #[test]
    fn last_seen_minutes() {
        assert_eq!(last_seen(1000, 1000 - 59), "Now");
        assert_eq!(last_seen(1000, 1000 - 60), "1m ago");
        assert_eq!(last_seen(1000, 1000 - 185), "3m ago");
    }

    #[test]
    fn focused_editor_is_not_clobbered() {
        let now = 1_700_000_000;
        let mut p = Panels::default();
        p.heartbeat.focus();
        p.heartbeat.insert('x');
        let before = p.heartbeat.text().to_string();
        p.apply(Ok(&snapshot(now)), now);
        assert_eq!(p.heartbeat.text(), before);

        p.heartbeat.blur();
        p.apply(Ok(&snapshot(now)), now);
        assert_eq!(p.heartbeat.text(), "- check mail\n");
    }

    #[test]
    fn failed_fetch_changes_nothing() {
        let now = 1_700_000_000;
        let mut p = Panels::default();
        p.apply(Ok(&snapshot(now)), now);
        let err = Failure::Transport("boom".into());
        assert!(!p.apply(Err(&err), now + 500));
        assert_eq!(p.stats.cpu, "43%");
        assert_eq!(p.stats.heartbeat_seen, "Now");
        assert_eq!(p.updates, 1);
    }

    #[test]
    fn lists_keep_server_order() {
        let now = 1_700_000_000;
        let mut p = Panels::default();
        p.apply(Ok(&snapshot(now)), now);
        assert_eq!(p.agents[1].pid, "12");
        assert_eq!(p.commits[0].msg, "b");
        assert_eq!(p.branch, "main");
    }

    #[test]
    fn cron_fallbacks_and_truncation() {
        let row = CronRow::from_job(&CronJob {
            id: "abcdef1234".into(),
            name: Some(String::new()),
            schedule: Some(String::new()),
            payload: "run.sh".into(),
        });
        assert_eq!(row.name, "Unnamed Task");
        assert_eq!(row.schedule, "at once");
        assert_eq!(row.short_id, "abcdef12");
        assert_eq!(row.id, "abcdef1234");

        let long = "x".repeat(200);
        let row = CronRow::from_job(&CronJob {
            id: "1".into(),
            name: None,
            schedule: None,
            payload: long.clone(),
        });
        assert_eq!(row.payload, long);
        assert!(row.payload_display.chars().count() <= CRON_PAYLOAD_LEN);
    }

    #[test]
    fn ai_label_format() {
        let u = AiUsage {
            used: 232_000,
            total: None,
            percent: 23.2,
            model: Some("gemini".into()),
            timestamp: None,
        };
        assert_eq!(ai_label(&u), "232K/1000K (23%) [gemini]");
    }

    #[test]
    fn live_ai_refresh_toggles_busy() {
        let mut ai = AiPanel::default();
        assert!(!ai.begin(AiMode::Cached));
        assert!(ai.begin(AiMode::Live));
        ai.finish(AiMode::Live, Err(Failure::Transport("down".into())));
        assert!(!ai.busy);
        assert_eq!(ai.label(), "--");
    }

    #[test]
    fn save_label_reverts_after_two_seconds() {
        let t0 = Instant::now();
        let mut ed = HeartbeatEditor::default();
        assert_eq!(ed.save_label(t0), SAVE_LABEL);
        ed.mark_saved(t0);
        assert_eq!(ed.save_label(t0 + Duration::from_millis(1500)), SAVED_LABEL);
        assert_eq!(ed.save_label(t0 + Duration::from_millis(2000)), SAVE_LABEL);
    }
}

//! App state and main loop: input handling, scheduling fetches, applying
//! results, and drawing.
//!
//! Handlers never touch the network themselves. They return `Command`s; the
//! loop spawns each one and the result comes back as a `Msg` on the channel.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::{project_download_endpoint, RemoteClient, SYSTEM_BACKUP};
use crate::error::Failure;
use crate::panels::{AiMode, Panels};
use crate::router::{Resolution, RouteEffect, RouteTable, Router, Tab, ViewId};
use crate::scheduler::{FetchReason, PollScheduler, DISPLAY_TICK};
use crate::tree::{Activation, TreePanel};
use crate::types::{AiUsage, FilePage, ProjectInfo, StatusSnapshot};
use crate::ui::{
    header::draw_header,
    heartbeat::{draw_ai, draw_heartbeat},
    lists::{draw_agents, draw_commits, draw_configs, draw_cron},
    login::{draw_alert, draw_login},
    projects::draw_projects,
    stats::draw_stats,
    tree::draw_tree,
    viewer::draw_viewer,
};
use crate::viewer::{FileViewer, ReadRequest, TranslateRequest, TranslateStep};

const NOTICE_FOR: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Checking a stored credential.
    Booting,
    Login,
    Dashboard,
}

/// Side effects requested by a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CheckAuth { token: String, from_login: bool },
    FetchStatus(FetchReason),
    FetchAi(AiMode),
    ReadFile(ReadRequest),
    Translate(TranslateRequest),
    SaveHeartbeat(String),
    FetchProjects,
    Download { endpoint: String, dest: PathBuf },
}

/// Completed side effects.
#[derive(Debug)]
pub enum Msg {
    Auth {
        token: String,
        from_login: bool,
        result: Result<(), Failure>,
    },
    Status(FetchReason, Result<StatusSnapshot, Failure>),
    Ai(AiMode, Result<AiUsage, Failure>),
    Read(ReadRequest, Result<FilePage, Failure>),
    Translate(TranslateRequest, Result<String, Failure>),
    HeartbeatSaved(Result<bool, Failure>),
    Projects(Result<Vec<ProjectInfo>, Failure>),
    Downloaded(PathBuf, Result<u64, Failure>),
}

pub struct App {
    client: RemoteClient,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,

    pub screen: Screen,
    pub login_input: String,
    pub login_error: Option<String>,

    pub scheduler: PollScheduler,
    pub router: Router,
    pub panels: Panels,
    pub viewer: FileViewer,
    viewer_scroll: u16,

    pub projects: Vec<ProjectInfo>,
    pub project_selected: usize,
    projects_loading: bool,
    // one tree pane per project, kept while hidden
    project_trees: HashMap<String, TreePanel>,

    pub alert: Option<String>,
    notice: Option<(String, Instant)>,
    download_dir: PathBuf,

    should_quit: bool,
    tick: u64,
}

impl App {
    pub fn new(client: RemoteClient, interval: Duration, location: &str) -> Self {
        let (tx, rx) = unbounded_channel();
        let download_dir = dirs_next::download_dir()
            .or_else(dirs_next::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            client,
            tx,
            rx,
            screen: Screen::Login,
            login_input: String::new(),
            login_error: None,
            scheduler: PollScheduler::new(interval, Instant::now()),
            router: Router::new(RouteTable::default(), location),
            panels: Panels::default(),
            viewer: FileViewer::default(),
            viewer_scroll: 0,
            projects: Vec::new(),
            project_selected: 0,
            projects_loading: false,
            project_trees: HashMap::new(),
            alert: None,
            notice: None,
            download_dir,
            should_quit: false,
            tick: 0,
        }
    }

    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// First commands to run: verify a stored credential, or show login.
    pub fn boot(&mut self) -> Vec<Command> {
        match self.client.credential().get() {
            Some(token) => {
                self.screen = Screen::Booting;
                vec![Command::CheckAuth {
                    token,
                    from_login: false,
                }]
            }
            None => {
                self.screen = Screen::Login;
                Vec::new()
            }
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        let cmds = self.boot();
        self.execute(cmds);
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(5))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        let cmds = self.handle_key(k);
                        self.execute(cmds);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            // Completed requests
            while let Ok(msg) = self.rx.try_recv() {
                let cmds = self.handle_msg(msg, Instant::now(), chrono::Utc::now().timestamp());
                self.execute(cmds);
            }

            // One tick drives both the countdown and the rate-limited poll
            let cmds = self.on_tick(Instant::now());
            self.execute(cmds);

            terminal.draw(|f| self.draw(f))?;

            sleep(DISPLAY_TICK).await;
        }
        Ok(())
    }

    pub fn on_tick(&mut self, now: Instant) -> Vec<Command> {
        self.tick = self.tick.wrapping_add(1);
        if let Some((_, at)) = &self.notice {
            if now.saturating_duration_since(*at) >= NOTICE_FOR {
                self.notice = None;
            }
        }
        if self.screen != Screen::Dashboard {
            return Vec::new();
        }
        match self.scheduler.poll_due(now) {
            Some(reason) => vec![Command::FetchStatus(reason)],
            None => Vec::new(),
        }
    }

    fn execute(&self, cmds: Vec<Command>) {
        for cmd in cmds {
            self.spawn(cmd);
        }
    }

    fn spawn(&self, cmd: Command) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(?cmd, "spawn");
        tokio::spawn(async move {
            let msg = match cmd {
                Command::CheckAuth { token, from_login } => {
                    let result = client.check_auth(&token).await;
                    Msg::Auth {
                        token,
                        from_login,
                        result,
                    }
                }
                Command::FetchStatus(reason) => Msg::Status(reason, client.status().await),
                Command::FetchAi(mode) => {
                    Msg::Ai(mode, client.ai_status(mode == AiMode::Live).await)
                }
                Command::ReadFile(req) => {
                    let r = client.read_file(&req.path, req.page).await;
                    Msg::Read(req, r)
                }
                Command::Translate(req) => {
                    let r = client.translate(&req.text).await;
                    Msg::Translate(req, r)
                }
                Command::SaveHeartbeat(content) => {
                    Msg::HeartbeatSaved(client.update_heartbeat(&content).await)
                }
                Command::FetchProjects => Msg::Projects(client.projects().await),
                Command::Download { endpoint, dest } => {
                    let r = client.download(&endpoint, &dest).await;
                    Msg::Downloaded(dest, r)
                }
            };
            // receiver gone means we are shutting down
            let _ = tx.send(msg);
        });
    }

    fn notify(&mut self, text: impl Into<String>, now: Instant) {
        self.notice = Some((text.into(), now));
    }

    /// Drop everything tied to the session and go back to the login screen.
    pub fn logout(&mut self) {
        info!("logged out");
        self.client.credential().clear();
        self.reset_session();
    }

    fn reset_session(&mut self) {
        self.scheduler.stop();
        self.panels = Panels::default();
        self.viewer.close();
        self.router.close_overlay();
        self.projects.clear();
        self.projects_loading = false;
        self.project_trees.clear();
        self.project_selected = 0;
        self.alert = None;
        self.login_input.clear();
        self.screen = Screen::Login;
    }

    /// Any non-auth endpoint answering 401 lands here; the client has
    /// already cleared the credential.
    fn check_auth_failure<T>(&mut self, r: &Result<T, Failure>) -> bool {
        if matches!(r, Err(Failure::Auth)) {
            warn!("session rejected by server");
            self.reset_session();
            self.login_error = Some("Session expired".into());
            return true;
        }
        false
    }

    pub fn handle_msg(&mut self, msg: Msg, now: Instant, now_unix: i64) -> Vec<Command> {
        match msg {
            Msg::Auth {
                token,
                from_login,
                result,
            } => self.on_auth(token, from_login, result, now),
            Msg::Status(reason, result) => {
                self.scheduler.complete(result.is_ok(), now);
                if self.check_auth_failure(&result) {
                    return Vec::new();
                }
                if self.screen != Screen::Dashboard {
                    return Vec::new();
                }
                match &result {
                    Ok(snapshot) => {
                        self.panels.apply(Ok(snapshot), now_unix);
                        debug!(?reason, "status updated");
                        vec![Command::FetchAi(AiMode::Cached)]
                    }
                    Err(e) => {
                        warn!(error = %e, ?reason, "status fetch failed");
                        Vec::new()
                    }
                }
            }
            Msg::Ai(mode, result) => {
                if self.check_auth_failure(&result) {
                    return Vec::new();
                }
                if let Err(e) = &result {
                    warn!(error = %e, ?mode, "ai status failed");
                }
                self.panels.ai.finish(mode, result);
                Vec::new()
            }
            Msg::Read(req, result) => {
                if self.check_auth_failure(&result) {
                    return Vec::new();
                }
                if !self.viewer.apply_read(&req, result) {
                    debug!(path = %req.path, page = req.page, "dropped stale file read");
                }
                Vec::new()
            }
            Msg::Translate(req, result) => {
                if self.check_auth_failure(&result) {
                    return Vec::new();
                }
                if let Err(msg) = self.viewer.apply_translation(&req, result) {
                    self.alert = Some(format!("Translation failed: {msg}"));
                }
                Vec::new()
            }
            Msg::HeartbeatSaved(result) => {
                if self.check_auth_failure(&result) {
                    return Vec::new();
                }
                match result {
                    Ok(true) => self.panels.heartbeat.mark_saved(now),
                    Ok(false) => self.notify("Heartbeat was not saved", now),
                    Err(e) => {
                        warn!(error = %e, "heartbeat save failed");
                        self.notify(format!("Save failed: {e}"), now);
                    }
                }
                Vec::new()
            }
            Msg::Projects(result) => {
                self.projects_loading = false;
                if self.check_auth_failure(&result) {
                    return Vec::new();
                }
                match result {
                    Ok(list) => {
                        self.project_selected =
                            self.project_selected.min(list.len().saturating_sub(1));
                        self.projects = list;
                    }
                    Err(e) => warn!(error = %e, "projects fetch failed"),
                }
                Vec::new()
            }
            Msg::Downloaded(dest, result) => {
                if self.check_auth_failure(&result) {
                    return Vec::new();
                }
                match result {
                    Ok(n) => {
                        info!(path = %dest.display(), bytes = n, "download saved");
                        self.notify(
                            format!("Saved {} ({})", dest.display(), crate::ui::util::human(n)),
                            now,
                        );
                    }
                    Err(e) => {
                        warn!(error = %e, "download failed");
                        self.notify(format!("Download failed: {e}"), now);
                    }
                }
                Vec::new()
            }
        }
    }

    fn on_auth(
        &mut self,
        token: String,
        from_login: bool,
        result: Result<(), Failure>,
        now: Instant,
    ) -> Vec<Command> {
        match result {
            Ok(()) => {
                if from_login {
                    if let Err(e) = self.client.credential().store(&token) {
                        warn!(error = %e, "could not persist credential");
                    }
                }
                info!("authenticated");
                self.screen = Screen::Dashboard;
                self.login_error = None;
                self.login_input.clear();
                let mut cmds = vec![Command::FetchStatus(self.scheduler.start(now))];
                let current = self.router.current().clone();
                cmds.extend(self.enter_route(current));
                cmds
            }
            Err(e) => {
                self.screen = Screen::Login;
                self.login_error = Some(match e {
                    Failure::Auth => "Invalid key".into(),
                    other => other.to_string(),
                });
                Vec::new()
            }
        }
    }

    fn route_commands(&mut self, effect: Option<RouteEffect>) -> Vec<Command> {
        match effect {
            Some(RouteEffect::FetchGitHistory) => {
                vec![Command::FetchStatus(self.scheduler.manual())]
            }
            Some(RouteEffect::FetchProjects) => {
                self.projects_loading = true;
                vec![Command::FetchProjects]
            }
            None => Vec::new(),
        }
    }

    /// Push a location and run whatever the new route needs.
    pub fn navigate(&mut self, location: &str) -> Vec<Command> {
        self.viewer.close();
        let res = self.router.navigate(location);
        self.enter_route(res)
    }

    /// Commands for a freshly resolved route. A detail view needs the
    /// project list, so it is fetched when missing.
    fn enter_route(&mut self, res: Resolution) -> Vec<Command> {
        let mut cmds = self.route_commands(res.effect);
        if let ViewId::ProjectDetail(name) = &res.view {
            self.project_trees.entry(name.clone()).or_default();
            if self.projects.is_empty() && !self.projects_loading {
                cmds.extend(self.route_commands(Some(RouteEffect::FetchProjects)));
            }
        }
        cmds
    }

    pub fn open_file(&mut self, path: &str) -> Vec<Command> {
        self.router.open_overlay();
        self.viewer_scroll = 0;
        vec![Command::ReadFile(self.viewer.open(path, 1))]
    }

    pub fn close_file(&mut self) {
        self.viewer.close();
        self.router.close_overlay();
    }

    pub fn handle_key(&mut self, k: KeyEvent) -> Vec<Command> {
        if self.alert.is_some() {
            self.alert = None;
            return Vec::new();
        }
        match self.screen {
            Screen::Booting => {
                if matches!(k.code, KeyCode::Esc | KeyCode::Char('q')) {
                    self.should_quit = true;
                }
                Vec::new()
            }
            Screen::Login => self.login_key(k),
            Screen::Dashboard => {
                if self.panels.heartbeat.is_focused() {
                    return self.editor_key(k);
                }
                if self.viewer.is_open() {
                    return self.viewer_key(k);
                }
                self.dashboard_key(k)
            }
        }
    }

    fn login_key(&mut self, k: KeyEvent) -> Vec<Command> {
        match k.code {
            KeyCode::Esc => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Enter if !self.login_input.is_empty() => {
                self.screen = Screen::Booting;
                vec![Command::CheckAuth {
                    token: self.login_input.clone(),
                    from_login: true,
                }]
            }
            KeyCode::Backspace => {
                self.login_input.pop();
                Vec::new()
            }
            KeyCode::Char(c) if !c.is_control() && self.login_input.len() < 64 => {
                self.login_input.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn editor_key(&mut self, k: KeyEvent) -> Vec<Command> {
        let ed = &mut self.panels.heartbeat;
        match k.code {
            KeyCode::Char('s') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                return vec![Command::SaveHeartbeat(ed.text().to_string())];
            }
            // other chords are not text
            KeyCode::Char(_)
                if k.modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Esc => ed.blur(),
            KeyCode::Enter => ed.insert('\n'),
            KeyCode::Tab => ed.insert('\t'),
            KeyCode::Backspace => ed.backspace(),
            KeyCode::Char(c) => ed.insert(c),
            _ => {}
        }
        Vec::new()
    }

    fn viewer_key(&mut self, k: KeyEvent) -> Vec<Command> {
        match k.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => {
                self.close_file();
                Vec::new()
            }
            KeyCode::Char('t') => match self.viewer.toggle_translation() {
                TranslateStep::Request(req) => vec![Command::Translate(req)],
                _ => Vec::new(),
            },
            KeyCode::PageDown | KeyCode::Char('n') => {
                self.viewer_scroll = 0;
                self.viewer.next_page().map(Command::ReadFile).into_iter().collect()
            }
            KeyCode::PageUp | KeyCode::Char('p') => {
                self.viewer_scroll = 0;
                self.viewer.prev_page().map(Command::ReadFile).into_iter().collect()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.viewer_scroll = self.viewer_scroll.saturating_add(1);
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.viewer_scroll = self.viewer_scroll.saturating_sub(1);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn dashboard_key(&mut self, k: KeyEvent) -> Vec<Command> {
        let now = Instant::now();
        match k.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Char(c @ '1'..='4') => {
                let tab = Tab::ALL[(c as u8 - b'1') as usize];
                self.navigate(tab.location())
            }
            KeyCode::Char('[') => match self.router.back() {
                Some(res) => self.enter_route(res),
                None => Vec::new(),
            },
            KeyCode::Char(']') => match self.router.forward() {
                Some(res) => self.enter_route(res),
                None => Vec::new(),
            },
            KeyCode::Char('r') => vec![Command::FetchStatus(self.scheduler.manual())],
            KeyCode::Char('a') => {
                let cmds: Vec<Command> = self
                    .scheduler
                    .toggle(now)
                    .map(Command::FetchStatus)
                    .into_iter()
                    .collect();
                let state = if self.scheduler.auto_refresh() { "on" } else { "off" };
                self.notify(format!("auto-refresh {state}"), now);
                cmds
            }
            KeyCode::Char('u') => {
                if self.panels.ai.busy {
                    return Vec::new();
                }
                self.panels.ai.begin(AiMode::Live);
                vec![Command::FetchAi(AiMode::Live)]
            }
            KeyCode::Char('L') => {
                self.logout();
                Vec::new()
            }
            KeyCode::Char('B') => vec![self.backup_command()],
            _ => self.view_key(k),
        }
    }

    fn view_key(&mut self, k: KeyEvent) -> Vec<Command> {
        match self.router.current().view.clone() {
            ViewId::Dashboard => {
                if k.code == KeyCode::Char('e') {
                    self.panels.heartbeat.focus();
                }
                Vec::new()
            }
            ViewId::Explorer => {
                let files = &self.panels.files;
                tree_key(&mut self.panels.explorer, files, k)
                    .map(|p| self.open_file(&p))
                    .unwrap_or_default()
            }
            ViewId::ProjectDetail(name) => {
                let files = self
                    .projects
                    .iter()
                    .find(|p| p.name == name)
                    .map(|p| p.files.clone())
                    .unwrap_or_default();
                if k.code == KeyCode::Char('d') {
                    return vec![self.download_command(&name)];
                }
                let panel = self.project_trees.entry(name.clone()).or_default();
                match tree_key(panel, &files, k) {
                    Some(rel) => {
                        let full = format!("projects/{name}/{rel}");
                        self.open_file(&full)
                    }
                    None => Vec::new(),
                }
            }
            ViewId::Projects => match k.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.project_selected + 1 < self.projects.len() {
                        self.project_selected += 1;
                    }
                    Vec::new()
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.project_selected = self.project_selected.saturating_sub(1);
                    Vec::new()
                }
                KeyCode::Enter => match self.projects.get(self.project_selected) {
                    Some(p) => {
                        let loc = format!("/projects/{}", p.name);
                        self.navigate(&loc)
                    }
                    None => Vec::new(),
                },
                KeyCode::Char('d') => match self.projects.get(self.project_selected) {
                    Some(p) => {
                        let name = p.name.clone();
                        vec![self.download_command(&name)]
                    }
                    None => Vec::new(),
                },
                _ => Vec::new(),
            },
            ViewId::Git => Vec::new(),
        }
    }

    fn download_command(&self, project: &str) -> Command {
        Command::Download {
            endpoint: project_download_endpoint(project),
            dest: self.download_dir.join(zip_name(project)),
        }
    }

    fn backup_command(&self) -> Command {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        Command::Download {
            endpoint: SYSTEM_BACKUP.to_string(),
            dest: self.download_dir.join(format!("backup-{stamp}.zip")),
        }
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let now = Instant::now();

        if self.screen != Screen::Dashboard {
            draw_login(
                f,
                area,
                &self.login_input,
                self.login_error.as_deref(),
                self.screen == Screen::Booting,
            );
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // header
                Constraint::Min(5),    // active view
                Constraint::Length(1), // footer
            ])
            .split(area);

        let host = self.client.base_url().host_str().unwrap_or("").to_string();
        draw_header(
            f,
            rows[0],
            self.router.active_tab(),
            self.scheduler.countdown(now),
            &host,
        );

        if self.router.overlay_open() && self.viewer.is_open() {
            draw_viewer(f, rows[1], &self.viewer, self.viewer_scroll);
        } else {
            match self.router.current().view.clone() {
                ViewId::Dashboard => self.draw_dashboard(f, rows[1], now),
                ViewId::Explorer => {
                    let model = self.panels.explorer.rows(&self.panels.files);
                    draw_tree(f, rows[1], "Workspace", &model, self.panels.explorer.selected, true);
                }
                ViewId::Projects => draw_projects(
                    f,
                    rows[1],
                    &self.projects,
                    self.project_selected,
                    self.projects_loading,
                ),
                ViewId::Git => draw_commits(f, rows[1], &self.panels.branch, &self.panels.commits),
                ViewId::ProjectDetail(name) => {
                    let files = self
                        .projects
                        .iter()
                        .find(|p| p.name == name)
                        .map(|p| p.files.as_slice())
                        .unwrap_or(&[]);
                    let panel = self.project_trees.entry(name.clone()).or_default();
                    let model = panel.rows(files);
                    let title = format!("Project {name}  (d download zip)");
                    draw_tree(f, rows[1], &title, &model, panel.selected, true);
                }
            }
        }

        let footer = match &self.notice {
            Some((text, _)) => text.clone(),
            None => "1-4 views · [ ] back/fwd · r refresh · a auto · u AI live · L logout · q quit"
                .to_string(),
        };
        f.render_widget(
            ratatui::widgets::Paragraph::new(footer)
                .style(ratatui::style::Style::default().fg(crate::ui::theme::MUTED)),
            rows[2],
        );

        if let Some(msg) = &self.alert {
            draw_alert(f, area, msg);
        }
    }

    fn draw_dashboard(&self, f: &mut ratatui::Frame<'_>, area: Rect, now: Instant) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // stats
                Constraint::Length(1), // ai
                Constraint::Min(6),    // body
            ])
            .split(area);
        draw_stats(f, rows[0], &self.panels.stats, self.panels.agents.len());
        draw_ai(f, rows[1], &self.panels.ai, self.tick);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[2]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(cols[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(35),
                Constraint::Percentage(30),
            ])
            .split(cols[1]);

        draw_heartbeat(f, left[0], &self.panels.heartbeat, now);
        draw_cron(f, left[1], &self.panels.cron);
        draw_agents(f, right[0], &self.panels.agents);
        draw_commits(f, right[1], &self.panels.branch, &self.panels.commits);
        draw_configs(f, right[2], &self.panels.configs);
    }
}

/// Local file name for a project zip. Project names come from the server,
/// so only the last path component is kept.
fn zip_name(project: &str) -> String {
    let base = Path::new(project)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("project");
    format!("{base}.zip")
}

/// Shared tree-pane keys. Returns a path when a file was activated.
fn tree_key(
    panel: &mut TreePanel,
    files: &[crate::types::FileTreeNode],
    k: KeyEvent,
) -> Option<String> {
    match k.code {
        KeyCode::Down | KeyCode::Char('j') => panel.move_selection(1, files),
        KeyCode::Up | KeyCode::Char('k') => panel.move_selection(-1, files),
        KeyCode::PageDown => panel.move_selection(10, files),
        KeyCode::PageUp => panel.move_selection(-10, files),
        KeyCode::Char('+') => panel.expand_all(files),
        KeyCode::Char('-') => panel.collapse_all(files),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(Activation::Open(path)) = panel.activate(files) {
                return Some(path);
            }
        }
        _ => {}
    }
    None
}

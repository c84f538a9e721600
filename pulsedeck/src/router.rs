//! Location string -> visible view. Exactly one view is shown at a time and
//! everything is rebuilt from the location, so back/forward and deep links go
//! through the same `resolve`.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewId {
    Dashboard,
    Explorer,
    Projects,
    Git,
    /// Synthesized on demand for `/projects/<name>`.
    ProjectDetail(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Explorer,
    Projects,
    Git,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Explorer, Tab::Projects, Tab::Git];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Explorer => "Explorer",
            Tab::Projects => "Projects",
            Tab::Git => "Git",
        }
    }

    pub fn location(self) -> &'static str {
        match self {
            Tab::Dashboard => "/",
            Tab::Explorer => "/explorer",
            Tab::Projects => "/projects",
            Tab::Git => "/git",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEffect {
    /// Commit history is pulled on entry, not on a timer.
    FetchGitHistory,
    FetchProjects,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub view: ViewId,
    pub tab: Tab,
    pub effect: Option<RouteEffect>,
}

/// Static views keyed by their top-level segment. Project detail views are
/// not listed here.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(&'static str, ViewId, Tab)>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: vec![
                ("", ViewId::Dashboard, Tab::Dashboard),
                ("explorer", ViewId::Explorer, Tab::Explorer),
                ("agents", ViewId::Projects, Tab::Projects),
                ("projects", ViewId::Projects, Tab::Projects),
                ("git", ViewId::Git, Tab::Git),
            ],
        }
    }
}

impl RouteTable {
    pub fn resolve(&self, location: &str) -> Resolution {
        let path = location
            .split(&['?', '#'][..])
            .next()
            .unwrap_or("")
            .trim_matches('/');
        let mut segs = path.splitn(2, '/');
        let head = segs.next().unwrap_or("");
        let rest = segs.next().map(|s| s.trim_matches('/')).unwrap_or("");

        if head == "projects" && !rest.is_empty() {
            return Resolution {
                view: ViewId::ProjectDetail(rest.to_string()),
                tab: Tab::Projects,
                effect: None,
            };
        }
        let (view, tab) = self
            .routes
            .iter()
            .find(|(seg, _, _)| *seg == head)
            .map(|(_, v, t)| (v.clone(), *t))
            .unwrap_or((ViewId::Dashboard, Tab::Dashboard));
        let effect = match view {
            ViewId::Git => Some(RouteEffect::FetchGitHistory),
            ViewId::Projects => Some(RouteEffect::FetchProjects),
            _ => None,
        };
        Resolution { view, tab, effect }
    }

    fn static_views(&self) -> Vec<ViewId> {
        let mut out: Vec<ViewId> = Vec::new();
        for (_, v, _) in &self.routes {
            if !out.contains(v) {
                out.push(v.clone());
            }
        }
        out
    }
}

#[derive(Debug)]
struct ViewSlot {
    id: ViewId,
    visible: bool,
}

#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    history: Vec<String>,
    pos: usize,
    views: Vec<ViewSlot>,
    active_tab: Option<Tab>,
    overlay: bool,
    current: Resolution,
}

impl Router {
    pub fn new(table: RouteTable, location: &str) -> Self {
        let views = table
            .static_views()
            .into_iter()
            .map(|id| ViewSlot { id, visible: false })
            .collect();
        let current = table.resolve(location);
        let mut r = Self {
            table,
            history: vec![location.to_string()],
            pos: 0,
            views,
            active_tab: None,
            overlay: false,
            current: current.clone(),
        };
        r.apply(&current);
        r
    }

    pub fn location(&self) -> &str {
        &self.history[self.pos]
    }

    pub fn current(&self) -> &Resolution {
        &self.current
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.active_tab
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay
    }

    pub fn is_visible(&self, id: &ViewId) -> bool {
        self.views.iter().any(|s| &s.id == id && s.visible)
    }

    pub fn visible_views(&self) -> Vec<&ViewId> {
        self.views.iter().filter(|s| s.visible).map(|s| &s.id).collect()
    }

    /// Number of view slots ever created, static plus detail views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Push a location and re-resolve (drops any forward history).
    pub fn navigate(&mut self, location: &str) -> Resolution {
        self.history.truncate(self.pos + 1);
        self.history.push(location.to_string());
        self.pos = self.history.len() - 1;
        self.reresolve()
    }

    pub fn back(&mut self) -> Option<Resolution> {
        if self.pos == 0 {
            return None;
        }
        self.pos -= 1;
        Some(self.reresolve())
    }

    pub fn forward(&mut self) -> Option<Resolution> {
        if self.pos + 1 >= self.history.len() {
            return None;
        }
        self.pos += 1;
        Some(self.reresolve())
    }

    /// File viewer on top: hide whatever view was showing.
    pub fn open_overlay(&mut self) {
        self.overlay = true;
        for s in &mut self.views {
            s.visible = false;
        }
    }

    /// Close the overlay by resolving the current location again.
    pub fn close_overlay(&mut self) -> Resolution {
        self.overlay = false;
        self.reresolve()
    }

    fn reresolve(&mut self) -> Resolution {
        let res = self.table.resolve(&self.history[self.pos]);
        self.overlay = false;
        self.apply(&res);
        self.current = res.clone();
        res
    }

    fn apply(&mut self, res: &Resolution) {
        if let ViewId::ProjectDetail(_) = res.view {
            if !self.views.iter().any(|s| s.id == res.view) {
                self.views.push(ViewSlot {
                    id: res.view.clone(),
                    visible: false,
                });
            }
        }
        for s in &mut self.views {
            s.visible = s.id == res.view;
        }
        self.active_tab = Some(res.tab);
    }
}

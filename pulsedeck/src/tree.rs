//! File tree render model with expand/collapse state that outlives the tree.
//!
//! A new status snapshot brings an entirely new tree; expansion is keyed by
//! path so it carries over untouched. Paths of directories that vanish are
//! kept, so a directory that comes back reopens the way it was.

use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::types::FileTreeNode;

/// Columns of indentation per depth level.
pub const INDENT_UNIT: u16 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Flip one directory. Returns the new state.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    pub fn set(&mut self, path: &str, expanded: bool) {
        if expanded {
            self.expanded.insert(path.to_string());
        } else {
            self.expanded.remove(path);
        }
    }

    pub fn expand_all(&mut self, tree: &[FileTreeNode]) {
        for p in dir_paths(tree) {
            self.expanded.insert(p);
        }
    }

    pub fn collapse_all(&mut self, tree: &[FileTreeNode]) {
        for p in dir_paths(tree) {
            self.expanded.remove(&p);
        }
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// Every directory path in the tree, pre-order.
pub fn dir_paths(tree: &[FileTreeNode]) -> Vec<String> {
    let mut out = Vec::new();
    collect_dirs(tree, &mut out);
    out
}

fn collect_dirs(nodes: &[FileTreeNode], out: &mut Vec<String>) {
    for n in nodes.iter().filter(|n| n.is_dir) {
        out.push(n.path.clone());
        collect_dirs(n.child_nodes(), out);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Dir { expanded: bool },
    /// Carries the encoded path used to open the file.
    File { payload: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub indent: u16,
    pub kind: RowKind,
    pub children: Vec<RenderNode>,
}

pub fn render(tree: &[FileTreeNode], expansion: &ExpansionState) -> Vec<RenderNode> {
    render_level(tree, expansion, 0)
}

fn render_level(nodes: &[FileTreeNode], expansion: &ExpansionState, depth: usize) -> Vec<RenderNode> {
    nodes
        .iter()
        .map(|n| {
            let indent = (depth as u16).saturating_mul(INDENT_UNIT);
            if n.is_dir {
                let expanded = expansion.is_expanded(&n.path);
                let children = if expanded {
                    render_level(n.child_nodes(), expansion, depth + 1)
                } else {
                    Vec::new()
                };
                RenderNode {
                    name: n.name.clone(),
                    path: n.path.clone(),
                    depth,
                    indent,
                    kind: RowKind::Dir { expanded },
                    children,
                }
            } else {
                RenderNode {
                    name: n.name.clone(),
                    path: n.path.clone(),
                    depth,
                    indent,
                    kind: RowKind::File {
                        payload: encode_payload(&n.path),
                    },
                    children: Vec::new(),
                }
            }
        })
        .collect()
}

/// Visible rows in draw order.
pub fn flatten(model: &[RenderNode]) -> Vec<&RenderNode> {
    let mut out = Vec::new();
    for n in model {
        push_visible(n, &mut out);
    }
    out
}

fn push_visible<'a>(n: &'a RenderNode, out: &mut Vec<&'a RenderNode>) {
    out.push(n);
    for c in &n.children {
        push_visible(c, out);
    }
}

pub fn encode_payload(path: &str) -> String {
    URL_SAFE_NO_PAD.encode(path.as_bytes())
}

pub fn decode_payload(payload: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Toggled { path: String, expanded: bool },
    Open(String),
}

/// One tree pane: expansion state plus a row cursor.
#[derive(Debug, Default)]
pub struct TreePanel {
    pub expansion: ExpansionState,
    pub selected: usize,
}

impl TreePanel {
    pub fn rows(&self, tree: &[FileTreeNode]) -> Vec<RenderNode> {
        render(tree, &self.expansion)
    }

    pub fn move_selection(&mut self, delta: isize, tree: &[FileTreeNode]) {
        let model = self.rows(tree);
        let n = flatten(&model).len();
        if n == 0 {
            self.selected = 0;
            return;
        }
        let cur = self.selected.min(n - 1) as isize;
        self.selected = (cur + delta).clamp(0, n as isize - 1) as usize;
    }

    /// Enter on the selected row: directories toggle locally, files open.
    pub fn activate(&mut self, tree: &[FileTreeNode]) -> Option<Activation> {
        let model = self.rows(tree);
        let rows = flatten(&model);
        let row = rows.get(self.selected)?;
        match &row.kind {
            RowKind::Dir { .. } => {
                let path = row.path.clone();
                let expanded = self.expansion.toggle(&path);
                Some(Activation::Toggled { path, expanded })
            }
            RowKind::File { payload } => decode_payload(payload).map(Activation::Open),
        }
    }

    pub fn expand_all(&mut self, tree: &[FileTreeNode]) {
        self.expansion.expand_all(tree);
    }

    pub fn collapse_all(&mut self, tree: &[FileTreeNode]) {
        self.expansion.collapse_all(tree);
        self.selected = 0;
    }
}

//! File viewer session: open file + page, pagination, and a one-shot
//! translation cache.
//!
//! Every `open` stamps a new sequence number. Responses carry the number of
//! the request that produced them and are dropped unless it still matches,
//! so a slow read of file A can never land in a session showing file B.

use std::path::Path;

use crate::error::Failure;
use crate::types::FilePage;

/// Extensions that get the translate action.
pub const TRANSLATABLE: &[&str] = &["txt", "md", "markdown"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub seq: u64,
    pub path: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    pub seq: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading,
    Content(FilePage),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub total: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateStep {
    ShowOriginal,
    ShowCached,
    Request(TranslateRequest),
    /// A translation for this page is already on its way.
    Pending,
    /// Nothing loaded or the file type is not translatable.
    Unavailable,
}

#[derive(Debug)]
pub struct Session {
    seq: u64,
    path: String,
    page: u32,
    body: Body,
    translated: Option<String>,
    showing_translated: bool,
    translating: bool,
}

impl Session {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_translated(&self) -> bool {
        self.showing_translated
    }

    pub fn is_translating(&self) -> bool {
        self.translating
    }

    fn original(&self) -> Option<&str> {
        match &self.body {
            Body::Content(p) => Some(&p.content),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct FileViewer {
    next_seq: u64,
    session: Option<Session>,
}

impl FileViewer {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Start a fresh session; any cached translation is discarded.
    pub fn open(&mut self, path: &str, page: u32) -> ReadRequest {
        self.next_seq += 1;
        let page = page.max(1);
        self.session = Some(Session {
            seq: self.next_seq,
            path: path.to_string(),
            page,
            body: Body::Loading,
            translated: None,
            showing_translated: false,
            translating: false,
        });
        ReadRequest {
            seq: self.next_seq,
            path: path.to_string(),
            page,
        }
    }

    /// Apply a read result. Returns false when the response is stale.
    pub fn apply_read(&mut self, req: &ReadRequest, result: Result<FilePage, Failure>) -> bool {
        let Some(s) = self.session.as_mut().filter(|s| s.seq == req.seq) else {
            return false;
        };
        s.body = match result {
            Ok(page) => Body::Content(page),
            Err(e) => Body::Error(e.to_string()),
        };
        true
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn pager(&self) -> Option<Pager> {
        let s = self.session.as_ref()?;
        let Body::Content(p) = &s.body else {
            return None;
        };
        if p.total_pages <= 1 {
            return None;
        }
        Some(Pager {
            page: p.page,
            total: p.total_pages,
            has_prev: p.page > 1,
            has_next: p.page < p.total_pages,
        })
    }

    pub fn next_page(&mut self) -> Option<ReadRequest> {
        let pager = self.pager().filter(|p| p.has_next)?;
        let path = self.session.as_ref()?.path.clone();
        Some(self.open(&path, pager.page + 1))
    }

    pub fn prev_page(&mut self) -> Option<ReadRequest> {
        let pager = self.pager().filter(|p| p.has_prev)?;
        let path = self.session.as_ref()?.path.clone();
        Some(self.open(&path, pager.page - 1))
    }

    pub fn can_translate(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.original().is_some() && is_translatable(&s.path))
    }

    pub fn toggle_translation(&mut self) -> TranslateStep {
        if !self.can_translate() {
            return TranslateStep::Unavailable;
        }
        let Some(s) = self.session.as_mut() else {
            return TranslateStep::Unavailable;
        };
        if s.showing_translated {
            s.showing_translated = false;
            return TranslateStep::ShowOriginal;
        }
        if s.translated.is_some() {
            s.showing_translated = true;
            return TranslateStep::ShowCached;
        }
        if s.translating {
            return TranslateStep::Pending;
        }
        let Some(text) = s.original().map(str::to_string) else {
            return TranslateStep::Unavailable;
        };
        s.translating = true;
        TranslateStep::Request(TranslateRequest { seq: s.seq, text })
    }

    /// Cache a translation. `Err` carries the message to alert with; the
    /// session stays on the original text.
    pub fn apply_translation(
        &mut self,
        req: &TranslateRequest,
        result: Result<String, Failure>,
    ) -> Result<bool, String> {
        let Some(s) = self.session.as_mut().filter(|s| s.seq == req.seq) else {
            return Ok(false);
        };
        if s.original() != Some(req.text.as_str()) {
            return Ok(false);
        }
        s.translating = false;
        match result {
            Ok(t) => {
                s.translated = Some(t);
                s.showing_translated = true;
                Ok(true)
            }
            Err(e) => Err(e.to_string()),
        }
    }

    /// The text to draw right now.
    pub fn visible_text(&self) -> Option<&str> {
        let s = self.session.as_ref()?;
        match &s.body {
            Body::Loading => Some("Loading..."),
            Body::Error(e) => Some(e.as_str()),
            Body::Content(p) => {
                if s.showing_translated {
                    s.translated.as_deref().or(Some(p.content.as_str()))
                } else {
                    Some(p.content.as_str())
                }
            }
        }
    }
}

pub fn is_translatable(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| TRANSLATABLE.iter().any(|t| t.eq_ignore_ascii_case(e)))
}

//! The create/edit editor shared by every screen.

use crate::error::{AdminError, Result};
use crate::types::overview::SchemeOverview;
use crate::types::plan::{SchemePlanOption, SystemTransactionRule};

/// Id carried by a draft that has not been saved yet.
pub const NEW_ID: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Update,
}

/// Editor lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState<D> {
    #[default]
    Browsing,
    Open { mode: EditorMode, draft: D },
    /// A remote save is in flight; the draft is kept so a failure can
    /// reopen it.
    Saving { mode: EditorMode, draft: D },
}

/// One editor instance. Create and Update share it; only the starting
/// draft differs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Editor<D> {
    state: EditorState<D>,
}

impl<D: Clone> Editor<D> {
    pub fn new() -> Self {
        Self {
            state: EditorState::Browsing,
        }
    }

    pub fn state(&self) -> &EditorState<D> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, EditorState::Browsing)
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, EditorState::Saving { .. })
    }

    pub fn mode(&self) -> Option<EditorMode> {
        match &self.state {
            EditorState::Browsing => None,
            EditorState::Open { mode, .. } | EditorState::Saving { mode, .. } => Some(*mode),
        }
    }

    /// Open on a fresh draft built from defaults.
    pub fn open_create(&mut self, defaults: D) {
        self.state = EditorState::Open {
            mode: EditorMode::Create,
            draft: defaults,
        };
    }

    /// Open pre-populated from an existing row.
    pub fn open_update(&mut self, row: D) {
        self.state = EditorState::Open {
            mode: EditorMode::Update,
            draft: row,
        };
    }

    /// Close without touching any list.
    pub fn cancel(&mut self) {
        self.state = EditorState::Browsing;
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            EditorState::Browsing => None,
            EditorState::Open { draft, .. } | EditorState::Saving { draft, .. } => Some(draft),
        }
    }

    /// The draft, while the editor is open and not saving.
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            EditorState::Open { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Close the editor and hand back the draft, for saves that apply
    /// immediately.
    pub fn submit(&mut self) -> Result<(EditorMode, D)> {
        match std::mem::take(&mut self.state) {
            EditorState::Open { mode, draft } => Ok((mode, draft)),
            other => {
                self.state = other;
                Err(AdminError::InvalidArgument("editor is not open".into()))
            }
        }
    }

    /// Move to `Saving` and return a copy of the draft to send.
    pub fn begin_save(&mut self) -> Result<(EditorMode, D)> {
        match std::mem::take(&mut self.state) {
            EditorState::Open { mode, draft } => {
                self.state = EditorState::Saving {
                    mode,
                    draft: draft.clone(),
                };
                Ok((mode, draft))
            }
            other => {
                let busy = matches!(other, EditorState::Saving { .. });
                self.state = other;
                if busy {
                    Err(AdminError::Busy("save already in progress".into()))
                } else {
                    Err(AdminError::InvalidArgument("editor is not open".into()))
                }
            }
        }
    }

    /// Finish a save started with [`begin_save`](Self::begin_save). Success
    /// closes the editor; failure reopens it with the same draft.
    pub fn finish_save(&mut self, saved: bool) {
        if let EditorState::Saving { mode, draft } = std::mem::take(&mut self.state) {
            if !saved {
                self.state = EditorState::Open { mode, draft };
            }
        }
    }
}

/// Rows with an integer id that can be spliced client-side.
pub trait NumericId {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

macro_rules! numeric_id {
    ($($ty:ty),*) => {
        $(impl NumericId for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        })*
    };
}

numeric_id!(SchemePlanOption, SystemTransactionRule, SchemeOverview);

/// Insert or replace `record` in `rows` without a server round trip.
///
/// A record whose id matches an existing row replaces it in place. Any
/// other record gets `max(ids) + 1` (or `1` for an empty list) and is
/// prepended. Returns the id the record ended up with.
pub fn splice<T: NumericId>(rows: &mut Vec<T>, mut record: T) -> i64 {
    let id = record.id();
    if let Some(slot) = rows.iter_mut().find(|row| row.id() == id) {
        *slot = record;
        return id;
    }
    let next = rows.iter().map(NumericId::id).max().map_or(1, |max| max + 1);
    record.set_id(next);
    rows.insert(0, record);
    next
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::CompositionId;

/// A musical work (song) as a registration unit.
///
/// A Composition is distinct from any particular recording of it. Its
/// writers and their ownership shares are stored separately and loaded in
/// credit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub id: CompositionId,
    pub title: String,

    /// Standardized 11-character work code, if one has been issued.
    ///
    /// Stored as entered; it may be malformed. Use [`crate::model::WorkCode`]
    /// to normalize user input before storing it.
    pub work_code: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Composition {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CompositionId::new(),
            title: title.into(),
            work_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: CompositionId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_work_code(mut self, work_code: impl Into<String>) -> Self {
        self.work_code = Some(work_code.into());
        self
    }

    /// Whether the title carries any visible text.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

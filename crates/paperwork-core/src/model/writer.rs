use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{CompositionId, ProfileId, WriterId};
use crate::model::share::Share;

/// The creative role credited to a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriterRole {
    Composer,
    Lyricist,
    ComposerLyricist,
    Arranger,
    Other,
}

impl WriterRole {
    /// Parse a stored or user-supplied role name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "composer" => Self::Composer,
            "lyricist" | "author" => Self::Lyricist,
            "composerlyricist" | "composer-lyricist" | "composer_lyricist" => {
                Self::ComposerLyricist
            }
            "arranger" => Self::Arranger,
            _ => Self::Other,
        }
    }
}

/// A registered rights-holder whose details writer credits can link to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,

    /// Identifier assigned by a collection society, as entered
    /// (it may carry dashes or spaces).
    pub registrant_code: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            name: name.into(),
            registrant_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_registrant_code(mut self, code: impl Into<String>) -> Self {
        self.registrant_code = Some(code.into());
        self
    }
}

/// A writer credit on a composition.
///
/// When `profile_id` is set the profile's name and registrant code take
/// precedence over the values stored on the credit itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Writer {
    pub id: WriterId,
    pub composition_id: CompositionId,
    pub profile_id: Option<ProfileId>,
    pub display_name: Option<String>,
    pub registrant_code: Option<String>,
    pub ownership_share: Share,
    pub role: WriterRole,
    pub created_at: DateTime<Utc>,
}

impl Writer {
    #[must_use]
    pub fn new(composition_id: CompositionId, ownership_share: Share) -> Self {
        Self {
            id: WriterId::new(),
            composition_id,
            profile_id: None,
            display_name: None,
            registrant_code: None,
            ownership_share,
            role: WriterRole::Composer,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile_id: ProfileId) -> Self {
        self.profile_id = Some(profile_id);
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_registrant_code(mut self, code: impl Into<String>) -> Self {
        self.registrant_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: WriterRole) -> Self {
        self.role = role;
        self
    }
}

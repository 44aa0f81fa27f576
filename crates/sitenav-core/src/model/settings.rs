// ── Actor role and feature flags ──
//
// Both are supplied from outside (profile config, backend settings).

use serde::{Deserialize, Serialize};

use super::website::ModerationStatus;

/// Who is driving the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Status a fresh submission lands in for this role.
    pub fn initial_status(self) -> ModerationStatus {
        match self {
            Self::Admin => ModerationStatus::Approved,
            Self::User => ModerationStatus::Pending,
        }
    }
}

/// Feature switches the backend (or profile) can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSettings {
    pub allow_submissions: bool,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            allow_submissions: true,
        }
    }
}

//! Screen identifiers and role-aware tab order.

use std::fmt;

use sitenav_core::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Approved listing.
    #[default]
    Home,
    /// Moderation queue, admins only.
    Moderation,
    Submit,
}

impl ScreenId {
    pub const ALL: [ScreenId; 3] = [Self::Home, Self::Moderation, Self::Submit];

    /// Screens reachable for `role`, in tab-bar order.
    pub fn for_role(role: Role) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|s| *s != Self::Moderation || role.is_admin())
            .collect()
    }

    /// Number key (1-3).
    pub fn number(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Moderation => 2,
            Self::Submit => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next screen among `tabs`, wrapping.
    pub fn next_in(self, tabs: &[Self]) -> Self {
        let idx = tabs.iter().position(|&s| s == self).unwrap_or(0);
        tabs.get((idx + 1) % tabs.len().max(1)).copied().unwrap_or(self)
    }

    /// Previous screen among `tabs`, wrapping.
    pub fn prev_in(self, tabs: &[Self]) -> Self {
        let len = tabs.len().max(1);
        let idx = tabs.iter().position(|&s| s == self).unwrap_or(0);
        tabs.get((idx + len - 1) % len).copied().unwrap_or(self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Moderation => "Moderation",
            Self::Submit => "Submit",
        }
    }

    /// Compact label for narrow terminals.
    pub fn label_short(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Moderation => "Mod",
            Self::Submit => "Add",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

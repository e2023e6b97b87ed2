use serde::{Deserialize, Serialize};

/// Outcome of an ADR determination from a single source.
///
/// `Undetermined` means the source was consulted and could not decide; it is
/// a real, cacheable answer, distinct from never having asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdrVerdict {
    Adr,
    NotAdr,
    Undetermined,
}

impl AdrVerdict {
    pub const fn from_flag(is_adr: bool) -> Self {
        if is_adr {
            Self::Adr
        } else {
            Self::NotAdr
        }
    }

    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Adr => Some(true),
            Self::NotAdr => Some(false),
            Self::Undetermined => None,
        }
    }

    pub const fn is_definitive(self) -> bool {
        !matches!(self, Self::Undetermined)
    }
}

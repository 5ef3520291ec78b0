use core::fmt;

use chrono_humanize::HumanTime;

/// Something that happened to a [`crate::PartnerSource`], with when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadEvent {
    /// When the event was recorded.
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    /// What happened.
    pub variant: LoadEventVariant,
}

impl LoadEvent {
    pub(crate) fn new(variant: LoadEventVariant) -> Self {
        Self {
            recorded_at: chrono::Utc::now(),
            variant,
        }
    }

    /// How long ago the event was recorded, e.g. `"3 seconds ago"`.
    pub fn humanized_age(&self) -> String {
        HumanTime::from(self.recorded_at - chrono::Utc::now()).to_string()
    }
}

impl fmt::Display for LoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.variant, self.humanized_age())
    }
}

/// The kinds of [`LoadEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadEventVariant {
    /// A fetch was issued.
    Started,
    /// A fetch resolved with `count` partners.
    Fetched {
        /// Time spent in the fetch.
        elapsed_ms: i64,
        /// Number of partners received.
        count: usize,
    },
    /// A fetch failed.
    Failed {
        /// Time spent in the fetch before it failed.
        elapsed_ms: i64,
    },
    /// A load was served from the already loaded value.
    CacheHit,
}

impl fmt::Display for LoadEventVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadEventVariant::Started => write!(f, "fetch started"),
            LoadEventVariant::Fetched { elapsed_ms, count } => {
                write!(f, "fetched {} partners in {}ms", count, elapsed_ms)
            }
            LoadEventVariant::Failed { elapsed_ms } => write!(f, "failed after {}ms", elapsed_ms),
            LoadEventVariant::CacheHit => write!(f, "served from cache"),
        }
    }
}

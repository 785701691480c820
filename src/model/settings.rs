//! Persisted user settings.

/// Store key under which the history flag is persisted.
pub const HISTORY_ENABLED_KEY: &str = "history_enabled";

/// Runtime settings read once at startup and toggled during the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Whether messages are persisted and history is lazily loaded.
    ///
    /// Toggling never purges or reloads lines already buffered in memory.
    pub history_enabled: bool,
}

impl Settings {
    /// Parse the stored value of [`HISTORY_ENABLED_KEY`].
    ///
    /// Absent means enabled; any present value other than `"true"` means disabled.
    pub fn from_stored(value: Option<&str>) -> Self {
        Self {
            history_enabled: value.map_or(true, |v| v == "true"),
        }
    }

    /// Stored representation of the history flag.
    pub fn history_value(self) -> &'static str {
        if self.history_enabled {
            "true"
        } else {
            "false"
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_enabled: true,
        }
    }
}

/// How the conversation list is ordered.
///
/// Applied both to the startup seed and to conversations discovered later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactOrder {
    /// Sorted by conversation id.
    #[default]
    Alphabetical,
    /// Most recently active first; new conversations go to the front.
    Recency,
}

use serde::Serialize;

/// Where a module instance is in its submit / export cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Empty form.
    Idle,
    /// Form being filled, by hand or by the scraper.
    Editing,
    /// Prediction request in flight.
    Submitting,
    /// Verdict shown; record frozen.
    ResultShown,
    /// Report being generated. Returns to `ResultShown`.
    Exporting,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::ResultShown => "result_shown",
            Self::Exporting => "exporting",
        }
    }

    /// The form accepts edits and new actions.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Idle | Self::Editing)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying a completion to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The request was superseded (reset or newer request); state unchanged.
    Stale,
}

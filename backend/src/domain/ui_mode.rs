//! Editor interaction mode.
//!
//! Exactly one session is active at a time: the keypad, one of the modal
//! dialogs, or nothing. Opening a new session replaces the previous one.

/// The interaction session currently owning the editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Idle,
    /// The numeric keypad is editing a measurement
    Numpad,
    /// Editing the discount of one row
    DiscountEditor { item_id: String },
    /// Picking the film of one row
    FilmSelection { item_id: String },
    /// Picking a film for every row; `film_name` is set once chosen and awaiting confirmation
    ApplyFilmToAll { film_name: Option<String> },
    ConfirmClearAll,
    ConfirmDeleteBudget { index: usize },
}

impl UiMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, UiMode::Idle)
    }

    pub fn is_modal(&self) -> bool {
        !matches!(self, UiMode::Idle | UiMode::Numpad)
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            UiMode::Idle => "idle",
            UiMode::Numpad => "numpad",
            UiMode::DiscountEditor { .. } => "discount-editor",
            UiMode::FilmSelection { .. } => "film-selection",
            UiMode::ApplyFilmToAll { .. } => "apply-film-to-all",
            UiMode::ConfirmClearAll => "confirm-clear-all",
            UiMode::ConfirmDeleteBudget { .. } => "confirm-delete-budget",
        }
    }
}

//! Presentation of the status line.
//!
//! The text is always shown exactly as given; only its styling class is derived.

use crate::snapshot::BoardSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusClass {
    #[default]
    Normal,
    Check,
    Checkmate,
    Stalemate,
}

impl StatusClass {
    /// Classifies free text, most specific match first.
    pub fn classify(text: &str) -> Self {
        if text.contains("Checkmate") {
            StatusClass::Checkmate
        } else if text.contains("check!") {
            StatusClass::Check
        } else if text.contains("Stalemate") {
            StatusClass::Stalemate
        } else {
            StatusClass::Normal
        }
    }

    /// Prefers the terminal flags when the server sends them and falls back to
    /// the text otherwise. A check is only ever reported through the text.
    pub fn of_snapshot(snapshot: &BoardSnapshot) -> Self {
        match (snapshot.is_checkmate, snapshot.is_stalemate) {
            (Some(true), _) => StatusClass::Checkmate,
            (_, Some(true)) => StatusClass::Stalemate,
            (Some(false), Some(false)) => match StatusClass::classify(&snapshot.status) {
                StatusClass::Check => StatusClass::Check,
                _ => StatusClass::Normal,
            },
            _ => StatusClass::classify(&snapshot.status),
        }
    }
}

/// What the status line currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLine {
    pub text: String,
    pub class: StatusClass,
}

impl StatusLine {
    pub fn message(text: impl Into<String>) -> Self {
        let text = text.into();
        let class = StatusClass::classify(&text);
        Self { text, class }
    }

    pub fn of_snapshot(snapshot: &BoardSnapshot) -> Self {
        Self {
            text: snapshot.status.clone(),
            class: StatusClass::of_snapshot(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Color;

    #[test]
    fn check_is_not_checkmate() {
        assert_eq!(StatusClass::classify("Red is in check!"), StatusClass::Check);
    }

    #[test]
    fn checkmate_overrides_check() {
        assert_eq!(
            StatusClass::classify("Checkmate! Black wins"),
            StatusClass::Checkmate
        );
        assert_eq!(
            StatusClass::classify("Checkmate! Red wins, Black is in check!"),
            StatusClass::Checkmate
        );
    }

    #[test]
    fn stalemate_and_plain_text() {
        assert_eq!(
            StatusClass::classify("Stalemate! Game is a draw."),
            StatusClass::Stalemate
        );
        assert_eq!(StatusClass::classify("Red's turn"), StatusClass::Normal);
        // matching is case sensitive, like the server's wording
        assert_eq!(StatusClass::classify("checkmate"), StatusClass::Normal);
        assert_eq!(StatusClass::classify("Check!"), StatusClass::Normal);
    }

    #[test]
    fn text_is_kept_verbatim() {
        let line = StatusLine::message("Black is in check!");
        assert_eq!(line.text, "Black is in check!");
        assert_eq!(line.class, StatusClass::Check);
    }

    #[test]
    fn flags_win_over_text() {
        let mut snapshot = BoardSnapshot::new(Color::Black, "Game over");
        snapshot.is_game_over = true;
        snapshot.is_checkmate = Some(true);
        snapshot.is_stalemate = Some(false);
        assert_eq!(StatusClass::of_snapshot(&snapshot), StatusClass::Checkmate);

        snapshot.is_checkmate = Some(false);
        snapshot.is_stalemate = Some(true);
        assert_eq!(StatusClass::of_snapshot(&snapshot), StatusClass::Stalemate);
    }

    #[test]
    fn text_decides_without_flags() {
        let snapshot = BoardSnapshot::new(Color::Red, "Red is in check!");
        assert_eq!(StatusLine::of_snapshot(&snapshot).class, StatusClass::Check);

        let snapshot = BoardSnapshot::new(Color::Red, "Checkmate! Black wins!");
        assert_eq!(StatusClass::of_snapshot(&snapshot), StatusClass::Checkmate);
    }
}

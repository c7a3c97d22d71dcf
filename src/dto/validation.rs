//! Validation helpers for DTOs.

use validator::ValidationError;

/// Inclusive bounds on the number of players in a waiting team.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Validates a team roster: 2 to 4 entries, none of them blank.
///
/// # Examples
///
/// ```ignore
/// validate_player_names(&["Mike".into(), "Sarah".into()]) // Ok
/// validate_player_names(&["Mike".into()])                 // Err - too few
/// validate_player_names(&["Mike".into(), " ".into()])     // Err - blank name
/// ```
pub fn validate_player_names(players: &[String]) -> Result<(), ValidationError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
        let mut err = ValidationError::new("players_count");
        err.message = Some(
            format!(
                "A team must have between {MIN_PLAYERS} and {MAX_PLAYERS} players (got {})",
                players.len()
            )
            .into(),
        );
        return Err(err);
    }

    if players.iter().any(|name| name.trim().is_empty()) {
        let mut err = ValidationError::new("players_blank");
        err.message = Some("Player names must not be blank".into());
        return Err(err);
    }

    Ok(())
}

/// Rejects strings made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_validate_player_names_valid() {
        assert!(validate_player_names(&roster(&["Mike", "Sarah"])).is_ok());
        assert!(validate_player_names(&roster(&["Mike", "Sarah", "Alex"])).is_ok());
        assert!(validate_player_names(&roster(&["Mike", "Sarah", "Alex", "Taylor"])).is_ok());
    }

    #[test]
    fn test_validate_player_names_invalid_count() {
        assert!(validate_player_names(&roster(&[])).is_err());
        assert!(validate_player_names(&roster(&["Solo"])).is_err());
        assert!(validate_player_names(&roster(&["A", "B", "C", "D", "E"])).is_err());
    }

    #[test]
    fn test_validate_player_names_blank_entry() {
        assert!(validate_player_names(&roster(&["Mike", ""])).is_err());
        assert!(validate_player_names(&roster(&["Mike", "   "])).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("CYBER WOLVES").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t").is_err());
    }
}

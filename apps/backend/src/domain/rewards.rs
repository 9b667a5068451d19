//! Reward pattern parsing (`"1b;2b;3b"` -> `[1, 2, 3]`).

use crate::errors::domain::{ActionKind, DomainError};

/// Currency marker suffix on reward entries.
pub const BERRY_MARKER: char = 'b';

pub fn parse_reward(entry: &str) -> Result<u32, DomainError> {
    let trimmed = entry.trim();
    let digits = trimmed
        .strip_suffix(BERRY_MARKER)
        .or_else(|| trimmed.strip_suffix(BERRY_MARKER.to_ascii_uppercase()))
        .unwrap_or(trimmed);
    digits.trim().parse::<u32>().map_err(|_| {
        DomainError::invalid(
            ActionKind::InvalidReward,
            format!("reward entry '{entry}' is not a berry count"),
        )
    })
}

pub fn parse_reward_pattern(pattern: &str) -> Result<Vec<u32>, DomainError> {
    pattern
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_reward)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_pattern() {
        assert_eq!(parse_reward_pattern("1b;2b;3b").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn tolerates_whitespace_and_missing_marker() {
        assert_eq!(parse_reward_pattern(" 2b ; 5 ;").unwrap(), vec![2, 5]);
        assert_eq!(parse_reward("4B").unwrap(), 4);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_reward_pattern("1b;xb").unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidAction(ActionKind::InvalidReward, _)
        ));
        assert!(parse_reward("-1b").is_err());
    }

    #[test]
    fn empty_pattern_is_empty() {
        assert!(parse_reward_pattern("").unwrap().is_empty());
    }
}

// Availability policy: weekly player-count bounds and warnings.

/// Fewest players a week can run with. Multiple of 4 so every court
/// fields a full doubles game (six courts).
pub const MIN_AVAILABLE_PLAYERS: usize = 24;
/// Most players a week can seat (eight full courts).
pub const MAX_AVAILABLE_PLAYERS: usize = 32;

/// Margin, in players, at which a valid count is close enough to a
/// bound to warn the operator.
const WARNING_MARGIN: usize = 2;

/// How an available-player count relates to the policy bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityStatus {
    TooFew,
    Valid,
    TooMany,
}

/// Result of validating a week's available-player count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityCheck {
    pub is_valid: bool,
    pub status: AvailabilityStatus,
    pub message: String,
}

/// Check an available-player count against the policy bounds. The
/// message names the violated bound and the current count.
pub fn validate_available_count(count: usize) -> AvailabilityCheck {
    if count < MIN_AVAILABLE_PLAYERS {
        return AvailabilityCheck {
            is_valid: false,
            status: AvailabilityStatus::TooFew,
            message: format!(
                "only {count} players available; at least {MIN_AVAILABLE_PLAYERS} are required"
            ),
        };
    }
    if count > MAX_AVAILABLE_PLAYERS {
        return AvailabilityCheck {
            is_valid: false,
            status: AvailabilityStatus::TooMany,
            message: format!(
                "{count} players available; at most {MAX_AVAILABLE_PLAYERS} can be scheduled"
            ),
        };
    }
    AvailabilityCheck {
        is_valid: true,
        status: AvailabilityStatus::Valid,
        message: format!("{count} players available"),
    }
}

/// True exactly at the minimum or maximum bound.
pub fn is_at_boundary(count: usize) -> bool {
    count == MIN_AVAILABLE_PLAYERS || count == MAX_AVAILABLE_PLAYERS
}

/// Warn when a valid count sits within the margin of either bound.
/// Out-of-range counts return None; `validate_available_count` already
/// reports those as invalid.
pub fn availability_warning(count: usize) -> Option<String> {
    if (MIN_AVAILABLE_PLAYERS..=MIN_AVAILABLE_PLAYERS + WARNING_MARGIN).contains(&count) {
        return Some(format!(
            "player count {count} is near the minimum of {MIN_AVAILABLE_PLAYERS}"
        ));
    }
    if (MAX_AVAILABLE_PLAYERS - WARNING_MARGIN..=MAX_AVAILABLE_PLAYERS).contains(&count) {
        return Some(format!(
            "player count {count} is near the maximum of {MAX_AVAILABLE_PLAYERS}"
        ));
    }
    None
}

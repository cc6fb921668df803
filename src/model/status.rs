use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Member, Scorecard};

/// Where a member is in this week's round, as shown on the admin ops table.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerRoundStatus {
    /// Not checked in and no card.
    Wait,
    /// Checked in, no card yet.
    Active,
    /// Card submitted; partner has not turned in a card.
    Pending,
    /// Card submitted and the partner's card is in, so it can be attested.
    Verify,
    Finished,
}

impl PlayerRoundStatus {
    #[must_use]
    pub fn derive(member: &Member, card: Option<&Scorecard>, partner_has_card: bool) -> Self {
        match card {
            Some(card) if card.is_verified => PlayerRoundStatus::Finished,
            Some(_) if partner_has_card => PlayerRoundStatus::Verify,
            Some(_) => PlayerRoundStatus::Pending,
            None if member.is_checked_in => PlayerRoundStatus::Active,
            None => PlayerRoundStatus::Wait,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            PlayerRoundStatus::Wait => "status-wait",
            PlayerRoundStatus::Active => "status-active",
            PlayerRoundStatus::Pending => "status-pending",
            PlayerRoundStatus::Verify => "status-verify",
            PlayerRoundStatus::Finished => "status-finished",
        }
    }
}

impl fmt::Display for PlayerRoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayerRoundStatus::Wait => "Wait",
            PlayerRoundStatus::Active => "Active",
            PlayerRoundStatus::Pending => "Pending",
            PlayerRoundStatus::Verify => "Verify",
            PlayerRoundStatus::Finished => "Finished",
        };
        write!(f, "{s}")
    }
}

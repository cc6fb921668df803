use serde::{Deserialize, Serialize};

/// Two members playing together in a week; each attests the other's card.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Pairing {
    pub week_number: i64,
    pub player_1_id: i64,
    pub player_2_id: i64,
}

impl Pairing {
    #[must_use]
    pub fn includes(&self, member_id: i64) -> bool {
        self.player_1_id == member_id || self.player_2_id == member_id
    }

    #[must_use]
    pub fn partner_of(&self, member_id: i64) -> Option<i64> {
        if self.player_1_id == member_id {
            Some(self.player_2_id)
        } else if self.player_2_id == member_id {
            Some(self.player_1_id)
        } else {
            None
        }
    }
}

/// Partner of `member_id` among a week's pairings.
#[must_use]
pub fn find_partner(pairings: &[Pairing], member_id: i64) -> Option<i64> {
    pairings.iter().find_map(|p| p.partner_of(member_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_lookup_is_symmetric() {
        let pairings = vec![
            Pairing {
                week_number: 2,
                player_1_id: 1,
                player_2_id: 5,
            },
            Pairing {
                week_number: 2,
                player_1_id: 3,
                player_2_id: 4,
            },
        ];
        assert_eq!(find_partner(&pairings, 5), Some(1));
        assert_eq!(find_partner(&pairings, 3), Some(4));
        assert_eq!(find_partner(&pairings, 9), None);
    }
}

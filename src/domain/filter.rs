//! Attachment inclusion policy. Pure function of (owner, dialog pair, mode).

use crate::domain::entities::DialogMeta;
use crate::domain::errors::DomainError;
use std::str::FromStr;

/// Which photo owners to grab from a dialog, relative to its (owner, peer)
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabFilter {
    /// Every photo in the dialog.
    All,
    /// Only photos owned by the dialog owner.
    Owner,
    /// Only photos owned by the peer.
    Opponent,
    /// Photos owned by either side of the dialog.
    Pair,
    /// Photos owned by neither side (forwarded third-party content).
    AllExceptPair,
}

impl GrabFilter {
    /// Decide whether a photo with this `owner_id` is included.
    pub fn includes(self, owner_id: i64, dialog: &DialogMeta) -> bool {
        let in_pair = owner_id == dialog.owner_id || owner_id == dialog.peer_id;
        match self {
            GrabFilter::All => true,
            GrabFilter::Owner => owner_id == dialog.owner_id,
            GrabFilter::Opponent => owner_id == dialog.peer_id,
            GrabFilter::Pair => in_pair,
            GrabFilter::AllExceptPair => !in_pair,
        }
    }
}

impl FromStr for GrabFilter {
    type Err = DomainError;

    /// Unknown modes are rejected here, at configuration time — never
    /// silently treated as `All`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(GrabFilter::All),
            "owner" => Ok(GrabFilter::Owner),
            "opponent" => Ok(GrabFilter::Opponent),
            "pair" => Ok(GrabFilter::Pair),
            "all_except_pair" => Ok(GrabFilter::AllExceptPair),
            other => Err(DomainError::Config(format!(
                "unknown grab filter '{}' (expected all | owner | opponent | pair | all_except_pair)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIALOG: DialogMeta = DialogMeta {
        owner_id: 10,
        peer_id: 20,
    };

    #[test]
    fn truth_table() {
        let cases: &[(GrabFilter, [bool; 3])] = &[
            // probes: owner_id = 10, 20, 30
            (GrabFilter::All, [true, true, true]),
            (GrabFilter::Owner, [true, false, false]),
            (GrabFilter::Opponent, [false, true, false]),
            (GrabFilter::Pair, [true, true, false]),
            (GrabFilter::AllExceptPair, [false, false, true]),
        ];
        for (filter, expected) in cases {
            for (owner_id, want) in [10, 20, 30].into_iter().zip(expected) {
                assert_eq!(
                    filter.includes(owner_id, &DIALOG),
                    *want,
                    "{:?} / owner_id {}",
                    filter,
                    owner_id
                );
            }
        }
    }

    #[test]
    fn parses_known_modes() {
        assert_eq!("all".parse::<GrabFilter>().unwrap(), GrabFilter::All);
        assert_eq!("OWNER".parse::<GrabFilter>().unwrap(), GrabFilter::Owner);
        assert_eq!(
            "all_except_pair".parse::<GrabFilter>().unwrap(),
            GrabFilter::AllExceptPair
        );
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "everything".parse::<GrabFilter>().unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }
}

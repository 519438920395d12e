//! Rent.

use crate::board::{Board, SquareId, SquareKind};
use crate::core::Money;

/// Railroad rent for one railroad held; doubles per extra railroad.
pub const RAILROAD_BASE_RENT: Money = 25;
/// Roll multiplier for an owner of one utility.
pub const ONE_UTILITY_MULTIPLIER: Money = 4;
/// Roll multiplier for an owner of both utilities.
pub const BOTH_UTILITIES_MULTIPLIER: Money = 10;

/// Pure rent lookup.
pub struct RentCalculator;

impl RentCalculator {
    /// Rent owed for landing on `square` with a roll totalling `roll_value`.
    ///
    /// Zero for unowned, mortgaged or unownable squares. Callers skip
    /// settlement entirely for mortgaged squares; the zero here only makes the
    /// function total.
    ///
    /// - Property: rent table indexed by houses, the bare rent doubled when
    ///   the owner holds the whole color group
    /// - Railroad: 25, 50, 100, 200 for 1-4 railroads held
    /// - Utility: roll x 4, or roll x 10 with both utilities held
    #[must_use]
    pub fn rent(board: &Board, square: SquareId, roll_value: u8) -> Money {
        let square = board.square(square);
        let Some(owner) = square.owner() else {
            return 0;
        };
        if square.is_mortgaged() {
            return 0;
        }

        match &square.kind {
            SquareKind::Property(property) => {
                let houses = property.houses();
                let rent = property.rents[usize::from(houses)];
                if houses == 0 && board.is_monopoly(property.group, owner) {
                    rent * 2
                } else {
                    rent
                }
            }
            SquareKind::Railroad(_) => {
                let held = board.railroads_owned_by(owner).max(1);
                RAILROAD_BASE_RENT << (held - 1)
            }
            SquareKind::Utility(_) => {
                let multiplier = if board.utilities_owned_by(owner) >= 2 {
                    BOTH_UTILITIES_MULTIPLIER
                } else {
                    ONE_UTILITY_MULTIPLIER
                };
                Money::from(roll_value) * multiplier
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameState, PlayerId};

    fn state() -> GameState {
        GameState::with_defaults(GameConfig::new(2)).unwrap()
    }

    const OWNER: PlayerId = PlayerId(0);

    #[test]
    fn test_unowned_square_owes_nothing() {
        let state = state();
        assert_eq!(RentCalculator::rent(state.board(), SquareId::new(39), 7), 0);
        assert_eq!(RentCalculator::rent(state.board(), SquareId::GO, 7), 0);
    }

    #[test]
    fn test_property_rent_by_houses() {
        let mut state = state();
        let baltic = SquareId::new(3);
        state.transfer_square(SquareId::new(1), Some(OWNER)).unwrap();
        state.transfer_square(baltic, Some(OWNER)).unwrap();

        // Monopoly, no houses: doubled.
        assert_eq!(RentCalculator::rent(state.board(), baltic, 7), 8);

        state.set_houses(baltic, 3).unwrap();
        assert_eq!(RentCalculator::rent(state.board(), baltic, 7), 180);

        state.set_houses(baltic, 5).unwrap();
        assert_eq!(RentCalculator::rent(state.board(), baltic, 7), 450);
    }

    #[test]
    fn test_railroad_escalation() {
        let mut state = state();
        let railroads = [5, 15, 25, 35].map(SquareId::new);

        for (held, &rr) in railroads.iter().enumerate() {
            state.transfer_square(rr, Some(OWNER)).unwrap();
            let expected = [25, 50, 100, 200][held];
            assert_eq!(RentCalculator::rent(state.board(), railroads[0], 5), expected);
        }
    }

    #[test]
    fn test_utility_multiplier() {
        let mut state = state();
        state.transfer_square(SquareId::new(12), Some(OWNER)).unwrap();
        assert_eq!(RentCalculator::rent(state.board(), SquareId::new(12), 7), 28);

        state.transfer_square(SquareId::new(28), Some(OWNER)).unwrap();
        assert_eq!(RentCalculator::rent(state.board(), SquareId::new(12), 7), 70);
    }

    #[test]
    fn test_mortgaged_square_owes_nothing() {
        let mut state = state();
        state.transfer_square(SquareId::new(5), Some(OWNER)).unwrap();
        state.set_mortgaged(SquareId::new(5), true).unwrap();
        assert_eq!(RentCalculator::rent(state.board(), SquareId::new(5), 9), 0);
    }
}

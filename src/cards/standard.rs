//! Contents of the classic chance and community chest piles.

use super::card::{Card, CardEffect, NearestKind};
use crate::board::SquareId;

/// The sixteen chance cards.
#[must_use]
pub fn chance_cards() -> Vec<Card> {
    use CardEffect::*;

    vec![
        Card::new("Advance to Boardwalk.", MoveTo(SquareId::new(39))),
        Card::new("Advance to Go.", MoveTo(SquareId::GO)),
        Card::new("Advance to Illinois Avenue.", MoveTo(SquareId::new(24))),
        Card::new("Advance to St. Charles Place.", MoveTo(SquareId::new(11))),
        Card::new("Advance to the nearest Railroad.", MoveNearest(NearestKind::Railroad)),
        Card::new("Advance to the nearest Railroad.", MoveNearest(NearestKind::Railroad)),
        Card::new("Advance to the nearest Utility.", MoveNearest(NearestKind::Utility)),
        Card::new("Bank pays you a dividend of $50.", BankMoney(50)),
        Card::new("Get Out of Jail Free.", GetOutOfJailFree),
        Card::new("Go back 3 spaces.", Move(-3)),
        Card::new("Go to Jail. Go directly to Jail.", GoToJail),
        Card::new(
            "Make general repairs on all your property: $25 per house, $100 per hotel.",
            StreetRepairs {
                per_house: 25,
                per_hotel: 100,
            },
        ),
        Card::new("Speeding fine $15.", BankMoney(-15)),
        Card::new("Take a trip to Reading Railroad.", MoveTo(SquareId::new(5))),
        Card::new(
            "You have been elected Chairman of the Board. Pay each player $50.",
            PlayerMoney(-50),
        ),
        Card::new("Your building loan matures. Collect $150.", BankMoney(150)),
    ]
}

/// The sixteen community chest cards.
#[must_use]
pub fn community_chest_cards() -> Vec<Card> {
    use CardEffect::*;

    vec![
        Card::new("Advance to Go.", MoveTo(SquareId::GO)),
        Card::new("Bank error in your favor. Collect $200.", BankMoney(200)),
        Card::new("Doctor's fee. Pay $50.", BankMoney(-50)),
        Card::new("From sale of stock you get $50.", BankMoney(50)),
        Card::new("Get Out of Jail Free.", GetOutOfJailFree),
        Card::new("Go to Jail. Go directly to Jail.", GoToJail),
        Card::new("Holiday fund matures. Receive $100.", BankMoney(100)),
        Card::new("Income tax refund. Collect $20.", BankMoney(20)),
        Card::new("It is your birthday. Collect $10 from every player.", PlayerMoney(10)),
        Card::new("Life insurance matures. Collect $100.", BankMoney(100)),
        Card::new("Pay hospital fees of $100.", BankMoney(-100)),
        Card::new("Pay school fees of $50.", BankMoney(-50)),
        Card::new("Receive $25 consultancy fee.", BankMoney(25)),
        Card::new(
            "You are assessed for street repair: $40 per house, $115 per hotel.",
            StreetRepairs {
                per_house: 40,
                per_hotel: 115,
            },
        ),
        Card::new("You have won second prize in a beauty contest. Collect $10.", BankMoney(10)),
        Card::new("You inherit $100.", BankMoney(100)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pile_sizes() {
        assert_eq!(chance_cards().len(), 16);
        assert_eq!(community_chest_cards().len(), 16);
    }

    #[test]
    fn test_each_pile_has_a_jail_card_and_a_token() {
        for pile in [chance_cards(), community_chest_cards()] {
            assert!(pile.iter().any(|c| c.effect == CardEffect::GoToJail));
            assert!(pile.iter().any(|c| c.effect == CardEffect::GetOutOfJailFree));
        }
    }
}

//! Ascending open auction for a declined or unaffordable square.

use tracing::{debug, info, instrument};

use crate::board::SquareId;
use crate::core::{GameEvent, GameState, Money, PlayerId};
use crate::error::{GameError, Result};
use crate::input::{Candidate, DecisionProvider, Prompt};

/// Runs auctions.
pub struct AuctionResolver;

impl AuctionResolver {
    /// Auction `square` among every active player.
    ///
    /// The minimum bid starts at zero. Each round the provider is asked
    /// whether anyone bids; if so, who and how much. A bid below the minimum
    /// or beyond the bidder's cash is refused and the minimum stays put. An
    /// accepted bid raises the minimum to the bid plus the configured
    /// increment. When nobody bids, the best bidder pays the bank and takes
    /// the deed; with no accepted bid at all the square stays unowned.
    ///
    /// Returns the winner, if any.
    #[instrument(skip(state, decisions))]
    pub fn run(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        square: SquareId,
    ) -> Result<Option<PlayerId>> {
        if state.square(square).owner().is_some() {
            return Err(GameError::inconsistent(format!(
                "auctioning {square}, which already has an owner"
            )));
        }

        let square_name = state.square(square).name.clone();
        let increment = state.config().bid_increment;
        let bidders: Vec<Candidate<PlayerId>> = state
            .turn_order()
            .iter()
            .map(|&id| Candidate::new(id, state.player(id).name.clone()))
            .collect();

        let mut minimum: Money = 0;
        let mut leader: Option<(PlayerId, Money)> = None;

        loop {
            let offer = Prompt::OfferBid {
                square: square_name.clone(),
                minimum,
            };
            if !decisions.ask_yes_no(&offer)? {
                break;
            }

            let bidder = decisions.ask_player(&Prompt::ChooseBidder, &bidders)?;
            let amount = decisions.ask_int(
                &Prompt::EnterBid {
                    player: state.player(bidder).name.clone(),
                    minimum,
                },
                0..=Money::MAX,
            )?;

            if amount < minimum || amount > state.player(bidder).cash() {
                debug!(%bidder, amount, minimum, "bid rejected");
                state.record(GameEvent::BidRejected {
                    player: bidder,
                    square,
                    amount,
                    minimum,
                });
                continue;
            }

            debug!(%bidder, amount, "bid accepted");
            state.record(GameEvent::AuctionBid {
                player: bidder,
                square,
                amount,
            });
            leader = Some((bidder, amount));
            minimum = amount + increment;
        }

        let Some((winner, price)) = leader else {
            info!(%square, "auction closed without bids");
            state.record(GameEvent::AuctionUnsold { square });
            return Ok(None);
        };

        state.player_mut(winner).adjust_cash(-price);
        state.transfer_square(square, Some(winner))?;
        state.record(GameEvent::AuctionWon {
            player: winner,
            square,
            price,
        });
        info!(%winner, %square, price, "auction won");
        Ok(Some(winner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::input::ScriptedDecisions;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);
    const BOARDWALK: SquareId = SquareId(39);

    fn state() -> GameState {
        GameState::with_defaults(GameConfig::new(2)).unwrap()
    }

    #[test]
    fn test_no_bids_leaves_square_unowned() {
        let mut state = state();
        let mut decisions = ScriptedDecisions::new().no();

        let winner = AuctionResolver::run(&mut state, &mut decisions, BOARDWALK).unwrap();

        assert_eq!(winner, None);
        assert_eq!(state.square(BOARDWALK).owner(), None);
        assert_eq!(
            state.events().back(),
            Some(&GameEvent::AuctionUnsold { square: BOARDWALK })
        );
    }

    #[test]
    fn test_highest_accepted_bid_wins() {
        let mut state = state();
        let mut decisions = ScriptedDecisions::new()
            .yes()
            .player(P0)
            .int(100)
            .yes()
            .player(P1)
            .int(110)
            .no();

        let winner = AuctionResolver::run(&mut state, &mut decisions, BOARDWALK).unwrap();

        assert_eq!(winner, Some(P1));
        assert_eq!(state.square(BOARDWALK).owner(), Some(P1));
        assert_eq!(state.player(P1).cash(), 1390);
        assert_eq!(state.player(P0).cash(), 1500);
    }

    #[test]
    fn test_low_bid_does_not_advance_minimum() {
        let mut state = state();
        let mut decisions = ScriptedDecisions::new()
            .yes()
            .player(P0)
            .int(50)
            // Below the new minimum of 60.
            .yes()
            .player(P1)
            .int(55)
            .no();

        AuctionResolver::run(&mut state, &mut decisions, BOARDWALK).unwrap();

        assert!(state.events().contains(&GameEvent::BidRejected {
            player: P1,
            square: BOARDWALK,
            amount: 55,
            minimum: 60,
        }));
        assert_eq!(state.square(BOARDWALK).owner(), Some(P0));
        assert_eq!(state.player(P0).cash(), 1450);
    }

    #[test]
    fn test_bid_beyond_cash_is_rejected() {
        let mut state = state();
        let mut decisions = ScriptedDecisions::new()
            .yes()
            .player(P0)
            .int(5000)
            .no();

        let winner = AuctionResolver::run(&mut state, &mut decisions, BOARDWALK).unwrap();
        assert_eq!(winner, None);
    }

    #[test]
    fn test_owned_square_cannot_be_auctioned() {
        let mut state = state();
        state.transfer_square(BOARDWALK, Some(P0)).unwrap();
        let mut decisions = ScriptedDecisions::new();

        assert!(AuctionResolver::run(&mut state, &mut decisions, BOARDWALK).is_err());
    }
}

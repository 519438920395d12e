//! Game rules.
//!
//! Each component is a stateless unit struct whose associated functions take
//! the [`GameState`](crate::core::GameState) they act on, plus the decision
//! provider when a player has to choose:
//!
//! - `TurnEngine`: movement phase, landing dispatch, post-turn menu
//! - `TransactionResolver`: payment, liquidation, bankruptcy
//! - `AuctionResolver`: open ascending auctions
//! - `JailStateMachine`: jail entry and exit
//! - `CardResolver`: chance and community chest effects
//! - `Holdings`: houses, mortgages, trades
//! - `RentCalculator`: rent owed on landing

pub mod auction;
pub mod card_effects;
pub mod holdings;
pub mod jail;
pub mod rent;
pub mod transaction;
pub mod turn;

pub use auction::AuctionResolver;
pub use card_effects::CardResolver;
pub use holdings::{Holdings, TradeOffer};
pub use jail::{JailOutcome, JailStateMachine};
pub use rent::RentCalculator;
pub use transaction::{Settlement, TransactionResolver};
pub use turn::{TurnEngine, MAX_ROLLS_PER_TURN, TURN_ACTIONS};

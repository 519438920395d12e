//! Players, counterparties and per-player storage.
//!
//! ## PlayerId
//!
//! Type-safe seat index for 2-8 players.
//!
//! ## Player
//!
//! Cash, position, jail status, tokens and the forward ownership list. The
//! ownership list is the source of truth that [`Square`](crate::board::Square)
//! owner back-references must agree with.
//!
//! ## Party
//!
//! A counterparty to a payment: a seated player or the bank sink, which has
//! unlimited funds and absorbs payments without a balance.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::board::SquareId;

/// Money amounts. Signed so that shortfalls can be expressed.
pub type Money = i64;

/// Seat identifier. Seats are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use rust_monopoly::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// The other side of a payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// A seated player.
    Player(PlayerId),
    /// The bank sink. Unlimited cash, never checked for solvency.
    Bank,
}

impl Party {
    /// The seated player, if this is not the bank.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Party::Player(id) => Some(id),
            Party::Bank => None,
        }
    }
}

impl From<PlayerId> for Party {
    fn from(id: PlayerId) -> Self {
        Party::Player(id)
    }
}

/// Incarceration state.
///
/// `Incarcerated` counts the failed doubles attempts still allowed before the
/// release fee is forced on the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JailStatus {
    /// Moving normally.
    #[default]
    Free,
    /// In jail.
    Incarcerated {
        /// Failed attempts left (2, 1, 0).
        attempts_remaining: u8,
    },
}

impl JailStatus {
    /// Whether the player is in jail.
    #[must_use]
    pub fn is_incarcerated(self) -> bool {
        matches!(self, JailStatus::Incarcerated { .. })
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    cash: Money,
    position: SquareId,
    jail: JailStatus,
    jail_free_cards: u32,
    /// Insertion-ordered so that display is stable.
    owned: Vec<SquareId>,
}

impl Player {
    /// Create a player on Go with `cash`.
    pub fn new(id: PlayerId, name: impl Into<String>, cash: Money) -> Self {
        Self {
            id,
            name: name.into(),
            cash,
            position: SquareId::GO,
            jail: JailStatus::Free,
            jail_free_cards: 0,
            owned: Vec::new(),
        }
    }

    /// Cash on hand.
    #[must_use]
    pub fn cash(&self) -> Money {
        self.cash
    }

    /// Add (or with a negative amount, remove) cash.
    pub fn adjust_cash(&mut self, delta: Money) {
        self.cash += delta;
    }

    /// Empty the wallet, returning what was in it.
    pub fn take_all_cash(&mut self) -> Money {
        std::mem::take(&mut self.cash)
    }

    /// Board position.
    #[must_use]
    pub fn position(&self) -> SquareId {
        self.position
    }

    /// Place the player on `square` without resolving anything.
    pub fn set_position(&mut self, square: SquareId) {
        self.position = square;
    }

    /// Jail status.
    #[must_use]
    pub fn jail(&self) -> JailStatus {
        self.jail
    }

    /// Overwrite the jail status. Transitions live in `rules::jail`.
    pub fn set_jail(&mut self, status: JailStatus) {
        self.jail = status;
    }

    /// Whether the player is in jail.
    #[must_use]
    pub fn in_jail(&self) -> bool {
        self.jail.is_incarcerated()
    }

    /// Get-out-of-jail-free tokens held.
    #[must_use]
    pub fn jail_free_cards(&self) -> u32 {
        self.jail_free_cards
    }

    /// Gain one token.
    pub fn add_jail_free_card(&mut self) {
        self.jail_free_cards += 1;
    }

    /// Spend one token. Returns false if there was none.
    pub fn use_jail_free_card(&mut self) -> bool {
        if self.jail_free_cards == 0 {
            return false;
        }
        self.jail_free_cards -= 1;
        true
    }

    /// Give up every token, returning the count.
    pub fn take_jail_free_cards(&mut self) -> u32 {
        std::mem::take(&mut self.jail_free_cards)
    }

    /// Squares owned, in acquisition order.
    #[must_use]
    pub fn owned(&self) -> &[SquareId] {
        &self.owned
    }

    /// Whether the player owns `square`.
    #[must_use]
    pub fn owns(&self, square: SquareId) -> bool {
        self.owned.contains(&square)
    }

    /// Only `GameState::transfer_square` calls this, so the square's owner
    /// back-reference stays in step.
    pub(crate) fn add_owned(&mut self, square: SquareId) {
        if !self.owned.contains(&square) {
            self.owned.push(square);
        }
    }

    pub(crate) fn remove_owned(&mut self, square: SquareId) {
        self.owned.retain(|&s| s != square);
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per seat. Bankrupt players keep their
/// entry; only the session's turn queue forgets them.
///
/// ```
/// use rust_monopoly::core::{PlayerId, PlayerMap};
///
/// let mut cash: PlayerMap<i64> = PlayerMap::new(4, |_| 1500);
/// cash[PlayerId::new(1)] -= 200;
/// assert_eq!(cash[PlayerId::new(1)], 1300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_party_conversion() {
        let party: Party = PlayerId::new(2).into();
        assert_eq!(party.player(), Some(PlayerId::new(2)));
        assert_eq!(Party::Bank.player(), None);
    }

    #[test]
    fn test_new_player_starts_on_go() {
        let player = Player::new(PlayerId::new(0), "Ada", 1500);

        assert_eq!(player.cash(), 1500);
        assert_eq!(player.position(), SquareId::GO);
        assert!(!player.in_jail());
        assert!(player.owned().is_empty());
    }

    #[test]
    fn test_jail_free_cards() {
        let mut player = Player::new(PlayerId::new(0), "Ada", 0);

        assert!(!player.use_jail_free_card());
        player.add_jail_free_card();
        player.add_jail_free_card();
        assert!(player.use_jail_free_card());
        assert_eq!(player.take_jail_free_cards(), 1);
        assert_eq!(player.jail_free_cards(), 0);
    }

    #[test]
    fn test_owned_keeps_insertion_order_without_duplicates() {
        let mut player = Player::new(PlayerId::new(0), "Ada", 0);

        player.add_owned(SquareId::new(39));
        player.add_owned(SquareId::new(1));
        player.add_owned(SquareId::new(39));

        assert_eq!(player.owned(), &[SquareId::new(39), SquareId::new(1)]);

        player.remove_owned(SquareId::new(39));
        assert_eq!(player.owned(), &[SquareId::new(1)]);
    }

    #[test]
    fn test_take_all_cash() {
        let mut player = Player::new(PlayerId::new(0), "Ada", 320);
        assert_eq!(player.take_all_cash(), 320);
        assert_eq!(player.cash(), 0);
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(4, |p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(3)], 30);
        assert_eq!(map.player_count(), 4);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(3, |p| p.index() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], (PlayerId::new(2), &2));
    }

    #[test]
    fn test_player_serialization() {
        let mut player = Player::new(PlayerId::new(1), "Grace", 900);
        player.set_jail(JailStatus::Incarcerated {
            attempts_remaining: 1,
        });
        let json = serde_json::to_string(&player).unwrap();
        let deserialized: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::new(0, |_| 0);
    }
}

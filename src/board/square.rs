//! Square variants.
//!
//! A square is a tagged union over the seven kinds the board knows about.
//! The turn engine dispatches on [`SquareKind`] with a `match`; there is no
//! behaviour attached to squares beyond data access.
//!
//! Ownable squares carry a [`Deed`]. The deed's `owner` is a back-reference:
//! the player's owned list is the forward reference and
//! [`GameState::transfer_square`](crate::core::GameState::transfer_square) is
//! the only code that changes either.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::cards::DeckKind;
use crate::core::{Money, PlayerId};

/// Most houses a property can hold. The fifth is the hotel.
pub const MAX_HOUSES: u8 = 5;

/// Board position, 0-39.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[display("Square({_0})")]
pub struct SquareId(pub u8);

impl SquareId {
    /// Number of squares on the board.
    pub const COUNT: usize = 40;
    /// The start square.
    pub const GO: SquareId = SquareId(0);
    /// Where jailed players (and visitors) sit.
    pub const JAIL: SquareId = SquareId(10);
    /// The square that sends players to jail.
    pub const GO_TO_JAIL: SquareId = SquareId(30);

    /// Create a new square ID.
    #[must_use]
    pub const fn new(position: u8) -> Self {
        Self(position)
    }

    /// Get the raw position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Move `steps` squares (negative moves backwards), wrapping around the
    /// board. The flag reports a forward wrap past Go.
    #[must_use]
    pub fn advance(self, steps: i32) -> (SquareId, bool) {
        let count = Self::COUNT as i32;
        let raw = i32::from(self.0) + steps;
        let wrapped = steps > 0 && raw >= count;
        (SquareId(raw.rem_euclid(count) as u8), wrapped)
    }

    /// Forward distance from `self` to `target`, in 0..40.
    #[must_use]
    pub fn distance_to(self, target: SquareId) -> i32 {
        (i32::from(target.0) - i32::from(self.0)).rem_euclid(Self::COUNT as i32)
    }
}

/// Color groups. Holding every property of a group is a monopoly.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorGroup {
    /// Two-property group.
    Brown,
    #[display("Light Blue")]
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    /// Two-property group.
    #[display("Dark Blue")]
    DarkBlue,
}

/// Title to an ownable square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deed {
    /// Purchase price.
    pub cost: Money,
    /// Cash raised by mortgaging.
    pub mortgage_value: Money,
    owner: Option<PlayerId>,
    mortgaged: bool,
}

impl Deed {
    /// An unowned, unmortgaged deed.
    #[must_use]
    pub fn new(cost: Money, mortgage_value: Money) -> Self {
        Self {
            cost,
            mortgage_value,
            owner: None,
            mortgaged: false,
        }
    }

    /// Current owner, if any.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Whether the deed is mortgaged.
    #[must_use]
    pub fn is_mortgaged(&self) -> bool {
        self.mortgaged
    }

    pub(crate) fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }

    pub(crate) fn set_mortgaged(&mut self, mortgaged: bool) {
        self.mortgaged = mortgaged;
    }
}

/// A color-group street.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Ownership and mortgage state.
    pub deed: Deed,
    /// Color group.
    pub group: ColorGroup,
    /// Price of one house.
    pub house_cost: Money,
    /// Rent by house count; index 5 is the hotel.
    pub rents: [Money; 6],
    houses: u8,
}

impl Property {
    /// An unimproved, unowned property.
    #[must_use]
    pub fn new(
        group: ColorGroup,
        cost: Money,
        mortgage_value: Money,
        house_cost: Money,
        rents: [Money; 6],
    ) -> Self {
        Self {
            deed: Deed::new(cost, mortgage_value),
            group,
            house_cost,
            rents,
            houses: 0,
        }
    }

    /// Houses built (5 = hotel).
    #[must_use]
    pub fn houses(&self) -> u8 {
        self.houses
    }

    /// Cash returned per house sold.
    #[must_use]
    pub fn house_sale_value(&self) -> Money {
        self.house_cost / 2
    }

    pub(crate) fn set_houses(&mut self, houses: u8) {
        debug_assert!(houses <= MAX_HOUSES);
        self.houses = houses;
    }
}

/// A tax square. Income tax also offers a percentage of total assets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Flat amount.
    pub amount: Money,
    /// Alternative percentage of total assets, if offered.
    pub percent: Option<u8>,
}

impl Tax {
    /// Amount owed under the percentage option for `total_assets`.
    #[must_use]
    pub fn percentage_of(&self, total_assets: Money) -> Option<Money> {
        self.percent
            .map(|percent| total_assets * Money::from(percent) / 100)
    }
}

/// The two jail squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JailKind {
    /// Landing here incarcerates the player.
    SendToJail,
    /// The jail cell; landing here is just visiting.
    Visiting,
}

/// What a square is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquareKind {
    /// Street in a color group.
    Property(Property),
    /// Railroad; rent scales with railroads held.
    Railroad(Deed),
    /// Utility; rent scales with the dice.
    Utility(Deed),
    /// Tax.
    Tax(Tax),
    /// Draw from a deck.
    CardDraw(DeckKind),
    /// Jail or go-to-jail.
    Jail(JailKind),
    /// Go, free parking.
    Neutral,
}

/// One board square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    /// Position.
    pub id: SquareId,
    /// Display name.
    pub name: String,
    /// Variant data.
    pub kind: SquareKind,
}

impl Square {
    /// Create a square.
    pub fn new(id: SquareId, name: impl Into<String>, kind: SquareKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    /// Whether the square can be bought.
    #[must_use]
    pub fn is_ownable(&self) -> bool {
        self.deed().is_some()
    }

    /// Title, for ownable squares.
    #[must_use]
    pub fn deed(&self) -> Option<&Deed> {
        match &self.kind {
            SquareKind::Property(property) => Some(&property.deed),
            SquareKind::Railroad(deed) | SquareKind::Utility(deed) => Some(deed),
            _ => None,
        }
    }

    pub(crate) fn deed_mut(&mut self) -> Option<&mut Deed> {
        match &mut self.kind {
            SquareKind::Property(property) => Some(&mut property.deed),
            SquareKind::Railroad(deed) | SquareKind::Utility(deed) => Some(deed),
            _ => None,
        }
    }

    /// Street data, for properties.
    #[must_use]
    pub fn property(&self) -> Option<&Property> {
        match &self.kind {
            SquareKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub(crate) fn property_mut(&mut self) -> Option<&mut Property> {
        match &mut self.kind {
            SquareKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Owner, if ownable and owned.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.deed().and_then(Deed::owner)
    }

    /// Whether the square is mortgaged. Unownable squares never are.
    #[must_use]
    pub fn is_mortgaged(&self) -> bool {
        self.deed().is_some_and(Deed::is_mortgaged)
    }

    /// Houses on the square; zero for anything but an improved property.
    #[must_use]
    pub fn houses(&self) -> u8 {
        self.property().map_or(0, Property::houses)
    }
}

//! The board: 40 squares plus a color-group index.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::square::{ColorGroup, Deed, JailKind, Property, Square, SquareId, SquareKind, Tax};
use crate::cards::DeckKind;
use crate::core::{Money, PlayerId};

/// Members of one color group. Groups have two or three streets.
pub type GroupMembers = SmallVec<[SquareId; 3]>;

/// The fixed ring of squares.
///
/// The layout never changes after construction; only the ownership, mortgage
/// and house state inside the squares does.
#[derive(Clone, Debug)]
pub struct Board {
    squares: Vec<Square>,
    groups: FxHashMap<ColorGroup, GroupMembers>,
}

impl Board {
    /// Build a board from exactly [`SquareId::COUNT`] squares in position order.
    ///
    /// Panics if the count or the ids are wrong; board data is static.
    #[must_use]
    pub fn new(squares: Vec<Square>) -> Self {
        assert_eq!(squares.len(), SquareId::COUNT, "a board has 40 squares");
        for (i, square) in squares.iter().enumerate() {
            assert_eq!(square.id.index(), i, "square ids must match positions");
        }

        let mut groups: FxHashMap<ColorGroup, GroupMembers> = FxHashMap::default();
        for square in &squares {
            if let Some(property) = square.property() {
                groups.entry(property.group).or_default().push(square.id);
            }
        }

        Self { squares, groups }
    }

    /// The classic 40-square board.
    #[must_use]
    pub fn standard() -> Self {
        use ColorGroup::*;

        let street = |group: ColorGroup, cost: Money, house_cost: Money, rents: [Money; 6]| {
            SquareKind::Property(Property::new(group, cost, cost / 2, house_cost, rents))
        };
        let railroad = || SquareKind::Railroad(Deed::new(200, 100));
        let utility = || SquareKind::Utility(Deed::new(150, 75));

        let layout: [(&str, SquareKind); SquareId::COUNT] = [
            ("Go", SquareKind::Neutral),
            ("Mediterranean Avenue", street(Brown, 60, 50, [2, 10, 30, 90, 160, 250])),
            ("Community Chest", SquareKind::CardDraw(DeckKind::CommunityChest)),
            ("Baltic Avenue", street(Brown, 60, 50, [4, 20, 60, 180, 320, 450])),
            ("Income Tax", SquareKind::Tax(Tax { amount: 200, percent: Some(10) })),
            ("Reading Railroad", railroad()),
            ("Oriental Avenue", street(LightBlue, 100, 50, [6, 30, 90, 270, 400, 550])),
            ("Chance", SquareKind::CardDraw(DeckKind::Chance)),
            ("Vermont Avenue", street(LightBlue, 100, 50, [6, 30, 90, 270, 400, 550])),
            ("Connecticut Avenue", street(LightBlue, 120, 50, [8, 40, 100, 300, 450, 600])),
            ("Jail", SquareKind::Jail(JailKind::Visiting)),
            ("St. Charles Place", street(Pink, 140, 100, [10, 50, 150, 450, 625, 750])),
            ("Electric Company", utility()),
            ("States Avenue", street(Pink, 140, 100, [10, 50, 150, 450, 625, 750])),
            ("Virginia Avenue", street(Pink, 160, 100, [12, 60, 180, 500, 700, 900])),
            ("Pennsylvania Railroad", railroad()),
            ("St. James Place", street(Orange, 180, 100, [14, 70, 200, 550, 750, 950])),
            ("Community Chest", SquareKind::CardDraw(DeckKind::CommunityChest)),
            ("Tennessee Avenue", street(Orange, 180, 100, [14, 70, 200, 550, 750, 950])),
            ("New York Avenue", street(Orange, 200, 100, [16, 80, 220, 600, 800, 1000])),
            ("Free Parking", SquareKind::Neutral),
            ("Kentucky Avenue", street(Red, 220, 150, [18, 90, 250, 700, 875, 1050])),
            ("Chance", SquareKind::CardDraw(DeckKind::Chance)),
            ("Indiana Avenue", street(Red, 220, 150, [18, 90, 250, 700, 875, 1050])),
            ("Illinois Avenue", street(Red, 240, 150, [20, 100, 300, 750, 925, 1100])),
            ("B. & O. Railroad", railroad()),
            ("Atlantic Avenue", street(Yellow, 260, 150, [22, 110, 330, 800, 975, 1150])),
            ("Ventnor Avenue", street(Yellow, 260, 150, [22, 110, 330, 800, 975, 1150])),
            ("Water Works", utility()),
            ("Marvin Gardens", street(Yellow, 280, 150, [24, 120, 360, 850, 1025, 1200])),
            ("Go To Jail", SquareKind::Jail(JailKind::SendToJail)),
            ("Pacific Avenue", street(Green, 300, 200, [26, 130, 390, 900, 1100, 1275])),
            ("North Carolina Avenue", street(Green, 300, 200, [26, 130, 390, 900, 1100, 1275])),
            ("Community Chest", SquareKind::CardDraw(DeckKind::CommunityChest)),
            ("Pennsylvania Avenue", street(Green, 320, 200, [28, 150, 450, 1000, 1200, 1400])),
            ("Short Line", railroad()),
            ("Chance", SquareKind::CardDraw(DeckKind::Chance)),
            ("Park Place", street(DarkBlue, 350, 200, [35, 175, 500, 1100, 1300, 1500])),
            ("Luxury Tax", SquareKind::Tax(Tax { amount: 100, percent: None })),
            ("Boardwalk", street(DarkBlue, 400, 200, [50, 200, 600, 1400, 1700, 2000])),
        ];

        let squares = layout
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind))| Square::new(SquareId::new(i as u8), name, kind))
            .collect();

        Self::new(squares)
    }

    /// The square at `id`.
    #[must_use]
    pub fn square(&self, id: SquareId) -> &Square {
        &self.squares[id.index()]
    }

    pub(crate) fn square_mut(&mut self, id: SquareId) -> &mut Square {
        &mut self.squares[id.index()]
    }

    /// All squares in position order.
    pub fn iter(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    /// The streets of `group`, in position order.
    #[must_use]
    pub fn group_members(&self, group: ColorGroup) -> &[SquareId] {
        self.groups
            .get(&group)
            .map(|members| members.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `owner` holds every street of `group`.
    #[must_use]
    pub fn is_monopoly(&self, group: ColorGroup, owner: PlayerId) -> bool {
        let members = self.group_members(group);
        !members.is_empty()
            && members
                .iter()
                .all(|&id| self.square(id).owner() == Some(owner))
    }

    /// Whether any street of `group` carries houses.
    #[must_use]
    pub fn group_has_houses(&self, group: ColorGroup) -> bool {
        self.group_members(group)
            .iter()
            .any(|&id| self.square(id).houses() > 0)
    }

    /// Railroads held by `owner`.
    #[must_use]
    pub fn railroads_owned_by(&self, owner: PlayerId) -> usize {
        self.squares
            .iter()
            .filter(|s| matches!(s.kind, SquareKind::Railroad(_)) && s.owner() == Some(owner))
            .count()
    }

    /// Utilities held by `owner`.
    #[must_use]
    pub fn utilities_owned_by(&self, owner: PlayerId) -> usize {
        self.squares
            .iter()
            .filter(|s| matches!(s.kind, SquareKind::Utility(_)) && s.owner() == Some(owner))
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

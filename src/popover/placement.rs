use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Whether the panel sits above or below the anchor, i.e. the main axis is vertical.
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Alignment {
    Start,
    Center,
    End,
}

/// Side of the anchor the panel goes to, plus its alignment along that side.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
}

impl Placement {
    pub fn new(side: Side, alignment: Alignment) -> Self {
        use Alignment::*;
        match (side, alignment) {
            (Side::Top, Center) => Placement::Top,
            (Side::Top, Start) => Placement::TopStart,
            (Side::Top, End) => Placement::TopEnd,
            (Side::Bottom, Center) => Placement::Bottom,
            (Side::Bottom, Start) => Placement::BottomStart,
            (Side::Bottom, End) => Placement::BottomEnd,
            (Side::Left, Center) => Placement::Left,
            (Side::Left, Start) => Placement::LeftStart,
            (Side::Left, End) => Placement::LeftEnd,
            (Side::Right, Center) => Placement::Right,
            (Side::Right, Start) => Placement::RightStart,
            (Side::Right, End) => Placement::RightEnd,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Placement::Top | Placement::TopStart | Placement::TopEnd => Side::Top,
            Placement::Bottom | Placement::BottomStart | Placement::BottomEnd => Side::Bottom,
            Placement::Left | Placement::LeftStart | Placement::LeftEnd => Side::Left,
            Placement::Right | Placement::RightStart | Placement::RightEnd => Side::Right,
        }
    }

    pub fn alignment(self) -> Alignment {
        match self {
            Placement::Top | Placement::Bottom | Placement::Left | Placement::Right => {
                Alignment::Center
            }
            Placement::TopStart
            | Placement::BottomStart
            | Placement::LeftStart
            | Placement::RightStart => Alignment::Start,
            Placement::TopEnd | Placement::BottomEnd | Placement::LeftEnd | Placement::RightEnd => {
                Alignment::End
            }
        }
    }

    /// Same alignment on the other side of the anchor.
    pub fn opposite(self) -> Self {
        Self::new(self.side().opposite(), self.alignment())
    }
}

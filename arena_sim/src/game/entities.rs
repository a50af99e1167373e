use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    /// Suits in the order a fresh deck is built.
    pub const ALL: [Suit; 4] = [Self::Spade, Self::Heart, Self::Diamond, Self::Club];

    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Heart | Self::Diamond)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Club => "♣",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a value (ace=1u8 ... king=13u8) and a suit. Values
/// only matter for display since hands are never evaluated.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    #[must_use]
    pub fn rank(&self) -> &'static str {
        match self.0 {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "10",
            11 => "J",
            12 => "Q",
            13 => "K",
            _ => "?",
        }
    }

    #[must_use]
    pub const fn is_red(&self) -> bool {
        self.1.is_red()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.1)
    }
}

/// Number of cards in a fresh deck.
pub const DECK_SIZE: usize = 52;

/// Cards left to deal in the current round. A new deck is built every round
/// and cards only ever leave from the front.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Fresh, unshuffled deck: spades ace through king, then hearts,
    /// diamonds and clubs.
    #[must_use]
    pub fn ordered() -> Self {
        let mut cards = VecDeque::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for value in 1u8..=13u8 {
                cards.push_back(Card(value, suit));
            }
        }
        Self { cards }
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Deal up to `n` cards from the front of the deck.
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }

    /// Mutable view of the remaining cards, used for shuffling.
    pub fn cards_mut(&mut self) -> &mut [Card] {
        self.cards.make_contiguous()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::ordered()
    }
}

/// Whole chips. Stacks, wagers and the pot are all counted in chips.
pub type Chips = u32;

/// Index of a seat in the round's player list.
pub type SeatIndex = usize;

/// Where a seat is drawn around the table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatPosition {
    Bottom,
    Left,
    Right,
    Top,
}

impl fmt::Display for SeatPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
        };
        write!(f, "{repr}")
    }
}

/// How a seat's hole cards should be drawn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardVisibility {
    FaceDown,
    FaceUp,
    /// Folded cards are mucked and never revealed, even at showdown.
    Folded,
    /// The dealer marker holds no cards.
    Empty,
}

pub const DEALER_NAME: &str = "Dealer";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub seat: SeatIndex,
    pub name: String,
    pub position: SeatPosition,
    pub cards: Vec<Card>,
    /// `None` for the non-playing dealer marker.
    pub chips: Option<Chips>,
    pub folded: bool,
}

impl Player {
    #[must_use]
    pub fn new(seat: SeatIndex, name: String, position: SeatPosition, chips: Chips) -> Self {
        Self {
            seat,
            name,
            position,
            cards: Vec::with_capacity(2),
            chips: Some(chips),
            folded: false,
        }
    }

    #[must_use]
    pub fn dealer(seat: SeatIndex) -> Self {
        Self {
            seat,
            name: DEALER_NAME.to_string(),
            position: SeatPosition::Top,
            cards: Vec::new(),
            chips: None,
            folded: false,
        }
    }

    #[must_use]
    pub const fn is_dealer(&self) -> bool {
        self.chips.is_none()
    }

    /// Seated, non-folded, and not the dealer marker.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_dealer() && !self.folded
    }

    #[must_use]
    pub fn card_visibility(&self, reveal: bool) -> CardVisibility {
        if self.is_dealer() || self.cards.is_empty() {
            CardVisibility::Empty
        } else if self.folded {
            CardVisibility::Folded
        } else if reveal {
            CardVisibility::FaceUp
        } else {
            CardVisibility::FaceDown
        }
    }
}

/// A poker-deal stage where seats take a (cosmetic) action.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// Display actions a seat can be shown taking.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayAction {
    Check,
    Bet,
    Raise,
    Call,
    Fold,
}

impl DisplayAction {
    /// Menu for the forced-bet step, where checking isn't allowed.
    pub const FORCED: [DisplayAction; 3] = [Self::Call, Self::Raise, Self::Fold];
    /// Menu when nobody has wagered on the street yet.
    pub const OPEN: [DisplayAction; 2] = [Self::Check, Self::Bet];
    /// Menu when a wager is outstanding.
    pub const FACING: [DisplayAction; 5] =
        [Self::Check, Self::Bet, Self::Raise, Self::Call, Self::Fold];

    /// Whether this action puts chips in the pot.
    #[must_use]
    pub const fn is_wager(self) -> bool {
        matches!(self, Self::Bet | Self::Raise | Self::Call)
    }
}

impl fmt::Display for DisplayAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Check => "Check",
            Self::Bet => "Bet",
            Self::Raise => "Raise",
            Self::Call => "Call",
            Self::Fold => "Fold",
        };
        write!(f, "{repr}")
    }
}

/// What the action ticker says happened last.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TableEvent {
    Dealing,
    FlopDealt,
    TurnDealt,
    RiverDealt,
    Acted {
        action: DisplayAction,
        amount: Option<Chips>,
    },
    Showdown,
    Wins(Chips),
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dealing => write!(f, "Dealing cards..."),
            Self::FlopDealt => write!(f, "Flop dealt"),
            Self::TurnDealt => write!(f, "Turn dealt"),
            Self::RiverDealt => write!(f, "River dealt"),
            Self::Acted {
                action,
                amount: Some(amount),
            } => write!(f, "{action} {amount}"),
            Self::Acted {
                action,
                amount: None,
            } => write!(f, "{action}"),
            Self::Showdown => write!(f, "Showdown!"),
            Self::Wins(amount) => write!(f, "Wins {amount} chips!"),
        }
    }
}

/// One line of the action ticker.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ticker {
    pub actor: String,
    pub event: TableEvent,
}

impl Ticker {
    #[must_use]
    pub fn dealer(event: TableEvent) -> Self {
        Self {
            actor: DEALER_NAME.to_string(),
            event,
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} › {}", self.actor, self.event)
    }
}

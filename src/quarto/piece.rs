use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use self::piece_id::{PieceId, PIECE_COUNT};

pub trait ShuffleRng {
    fn shuffle<T>(&mut self, items: &mut [T]);
}

#[derive(Debug)]
pub struct PieceRng {
    rng: StdRng,
}

impl PieceRng {
    pub fn seeded(seed: u64) -> Self {
        PieceRng {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for PieceRng {
    fn default() -> Self {
        PieceRng {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ShuffleRng for PieceRng {
    // SliceRandom::shuffle is a Fisher-Yates shuffle
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Height,
    Color,
    Shape,
    Fill,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Height,
        Attribute::Color,
        Attribute::Shape,
        Attribute::Fill,
    ];

    // Bit of the piece id that carries this attribute
    fn mask(self) -> u8 {
        match self {
            Attribute::Height => 0b1000,
            Attribute::Color => 0b0100,
            Attribute::Shape => 0b0010,
            Attribute::Fill => 0b0001,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Height => write!(f, "tall/short"),
            Attribute::Color => write!(f, "black/white"),
            Attribute::Shape => write!(f, "square/round"),
            Attribute::Fill => write!(f, "hollow/solid"),
        }
    }
}

const SPOKEN_NUMBERS: [&str; PIECE_COUNT] = [
    "Uno",
    "Dos",
    "Tres",
    "Cuatro",
    "Cinco",
    "Seis",
    "Siete",
    "Ocho",
    "Nueve",
    "Diez",
    "Once",
    "Doce",
    "Trece",
    "Catorce",
    "Quince",
    "Dieciséis",
];

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    is_tall: bool,
    is_black: bool,
    is_square: bool,
    is_hollow: bool,
    // Display number in 1..=16, only used for labels
    number: u8,
}

impl Piece {
    fn new(id: PieceId, number: u8) -> Self {
        let bits = id.get() as u8;
        Piece {
            id,
            is_tall: bits & Attribute::Height.mask() != 0,
            is_black: bits & Attribute::Color.mask() != 0,
            is_square: bits & Attribute::Shape.mask() != 0,
            is_hollow: bits & Attribute::Fill.mask() != 0,
            number,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn is_tall(&self) -> bool {
        self.is_tall
    }

    pub fn is_black(&self) -> bool {
        self.is_black
    }

    pub fn is_square(&self) -> bool {
        self.is_square
    }

    pub fn is_hollow(&self) -> bool {
        self.is_hollow
    }

    pub fn attribute(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Height => self.is_tall,
            Attribute::Color => self.is_black,
            Attribute::Shape => self.is_square,
            Attribute::Fill => self.is_hollow,
        }
    }

    pub fn label(&self) -> String {
        format!("Piece #{}", self.number)
    }

    // The word a presentation layer would pronounce for this piece
    pub fn spoken_name(&self) -> &'static str {
        SPOKEN_NUMBERS[usize::from(self.number) - 1]
    }
}

// Builds all 16 pieces, one per attribute combination, and hands out the
// display numbers 1..=16 in an order chosen by `rng`
pub fn generate_pieces<R: ShuffleRng>(rng: &mut R) -> [Piece; PIECE_COUNT] {
    let mut numbers: [u8; PIECE_COUNT] = std::array::from_fn(|i| i as u8 + 1);
    rng.shuffle(&mut numbers);
    std::array::from_fn(|i| Piece::new(PieceId::from_index(i), numbers[i]))
}

mod piece_id {
    use serde::Serialize;
    use std::fmt;

    pub const PIECE_COUNT: usize = 16;

    #[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct PieceId(u8);

    impl PieceId {
        // Enforce that the piece id is in range 0..PIECE_COUNT
        pub fn new(id: u8) -> Option<Self> {
            if usize::from(id) < PIECE_COUNT {
                Some(PieceId(id))
            } else {
                None
            }
        }

        pub(crate) fn from_index(idx: usize) -> Self {
            debug_assert!(idx < PIECE_COUNT);
            PieceId(idx as u8)
        }

        pub fn get(&self) -> usize {
            usize::from(self.0)
        }
    }

    impl From<PieceId> for u8 {
        fn from(id: PieceId) -> u8 {
            id.0
        }
    }

    impl fmt::Display for PieceId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }
}

//! Value types shared by every actor in the maze.

/// Heading of an actor. `None` is a valid heading that produces no motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// The four headings in the order ghosts evaluate them.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector in tile units. Rows grow downwards.
    pub fn delta(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::None => (0.0, 0.0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub(crate) fn to_code(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
            Direction::None => 4,
        }
    }

    /// Unknown codes decode to `None` so they never produce motion.
    pub(crate) fn from_code(code: u8) -> Direction {
        match code {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            3 => Direction::Right,
            _ => Direction::None,
        }
    }
}

/// Continuous position in tile units; fractions are legal mid-move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction, amount: f64) -> Position {
        let (dx, dy) = dir.delta();
        Position {
            x: self.x + dx * amount,
            y: self.y + dy * amount,
        }
    }

    pub fn distance(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Nearest tile, ties rounding up.
    pub fn tile(self) -> (i64, i64) {
        (round_half_up(self.x), round_half_up(self.y))
    }
}

pub(crate) fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Display colour carried by ghosts for the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Anything that moves through the maze.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub pos: Position,
    pub dir: Direction,
    /// Tiles per second.
    pub speed: f64,
}

impl Actor {
    pub fn new(pos: Position, dir: Direction, speed: f64) -> Self {
        Self { pos, dir, speed }
    }
}

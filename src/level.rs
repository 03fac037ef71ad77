use thiserror::Error;

use crate::components::{Direction, Position};

pub const COLUMNS: usize = 28;
pub const ROWS: usize = 31;

/// Classic arcade maze. `#` wall, `-` ghost-house gate, `.` open floor.
/// Pellets are laid by [`Level::fresh_grid`], not by the layout.
pub const CLASSIC_LAYOUT: [&str; ROWS] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.#####.##.#####.######",
    "######.#####.##.#####.######",
    "######.##..........##.######",
    "######.##.###--###.##.######",
    "######.##.#......#.##.######",
    "..........#......#..........",
    "######.##.#......#.##.######",
    "######.##.########.##.######",
    "######.##..........##.######",
    "######.##.########.##.######",
    "######.##.########.##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#...##................##...#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Pellet,
    PowerPellet,
    Gate,
}

/// Which passability rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walker {
    Player,
    Ghost,
}

impl Tile {
    /// Walls stop everyone; the gate only stops the player.
    pub fn blocks(self, walker: Walker) -> bool {
        match self {
            Tile::Wall => true,
            Tile::Gate => walker == Walker::Player,
            Tile::Empty | Tile::Pellet | Tile::PowerPellet => false,
        }
    }

    pub fn is_collectible(self) -> bool {
        matches!(self, Tile::Pellet | Tile::PowerPellet)
    }

    fn from_glyph(glyph: char) -> Option<Tile> {
        match glyph {
            '#' => Some(Tile::Wall),
            '-' => Some(Tile::Gate),
            '.' | ' ' => Some(Tile::Empty),
            '*' => Some(Tile::Pellet),
            'o' => Some(Tile::PowerPellet),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown glyph {glyph:?} at column {col}, row {row}")]
    UnknownGlyph { glyph: char, col: usize, row: usize },
}

/// The maze: fixed topology plus whatever pellets are still lying around.
///
/// Every lookup goes through [`GridMap::tile`], which wraps the column and
/// rejects out-of-range rows, so indexing can never go out of bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    grid: Vec<Vec<Tile>>,
}

impl GridMap {
    pub fn parse(rows: &[&str]) -> Result<Self, LevelError> {
        let width = rows.first().ok_or(LevelError::Empty)?.chars().count();
        if width == 0 {
            return Err(LevelError::Empty);
        }
        let mut grid = Vec::with_capacity(rows.len());
        for (y, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LevelError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            let row = line
                .chars()
                .enumerate()
                .map(|(x, glyph)| {
                    Tile::from_glyph(glyph).ok_or(LevelError::UnknownGlyph {
                        glyph,
                        col: x,
                        row: y,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(row);
        }
        Ok(Self {
            width,
            height: rows.len(),
            grid,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at integer coordinates. Columns wrap, rows outside the map are `None`.
    pub fn tile(&self, x: i64, y: i64) -> Option<Tile> {
        if y < 0 || y >= self.height as i64 {
            return None;
        }
        let x = x.rem_euclid(self.width as i64) as usize;
        Some(self.grid[y as usize][x])
    }

    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        let (x, y) = pos.tile();
        self.tile(x, y)
    }

    pub fn cell_passable(&self, x: i64, y: i64, walker: Walker) -> bool {
        self.tile(x, y).is_some_and(|t| !t.blocks(walker))
    }

    pub fn is_passable(&self, pos: Position, walker: Walker) -> bool {
        let (x, y) = pos.tile();
        self.cell_passable(x, y, walker)
    }

    /// Player rule: walls and the gate are solid, so is anything off the map.
    pub fn is_wall(&self, pos: Position) -> bool {
        !self.is_passable(pos, Walker::Player)
    }

    /// Ghost rule: only walls are solid. The gate is open in every mode.
    pub fn is_ghost_passable(&self, pos: Position) -> bool {
        self.is_passable(pos, Walker::Ghost)
    }

    /// Eats whatever collectible sits on the nearest tile and reports what was
    /// there. A second call on the same tile finds it `Empty`.
    pub fn consume(&mut self, pos: Position) -> Tile {
        let (x, y) = pos.tile();
        let Some(prior) = self.tile(x, y) else {
            return Tile::Empty;
        };
        if prior.is_collectible() {
            let x = x.rem_euclid(self.width as i64) as usize;
            self.grid[y as usize][x] = Tile::Empty;
        }
        prior
    }

    pub fn pellet_count(&self) -> usize {
        self.count(Tile::Pellet)
    }

    pub fn power_pellet_count(&self) -> usize {
        self.count(Tile::PowerPellet)
    }

    fn count(&self, kind: Tile) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == kind)
            .count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.grid.iter().map(Vec::as_slice)
    }

    fn set(&mut self, x: usize, y: usize, tile: Tile) {
        if let Some(cell) = self.grid.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = tile;
        }
    }
}

/// Rectangle (inclusive) that never receives pellets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseBounds {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl HouseBounds {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Everything needed to (re)build a round: topology, pellet rules and spawns.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub layout: GridMap,
    pub house: HouseBounds,
    pub power_spots: [(usize, usize); 4],
    pub player_start: (Position, Direction),
    /// Blinky, Pinky, Inky, Clyde.
    pub ghost_starts: [(Position, Direction); 4],
    /// Where an eaten ghost reappears.
    pub ghost_home: (Position, Direction),
}

impl Level {
    /// The arcade maze. The layout is compiled in, so parsing cannot fail.
    pub fn classic() -> Self {
        Self::try_classic().expect("classic layout is well formed")
    }

    pub fn try_classic() -> Result<Self, LevelError> {
        let layout = GridMap::parse(&CLASSIC_LAYOUT)?;
        Ok(Self {
            layout,
            house: HouseBounds {
                x0: 10,
                y0: 12,
                x1: 17,
                y1: 16,
            },
            power_spots: [(1, 3), (COLUMNS - 2, 3), (1, ROWS - 4), (COLUMNS - 2, ROWS - 4)],
            player_start: (Position::new(14.0, 23.0), Direction::Left),
            ghost_starts: [
                (Position::new(14.0, 11.0), Direction::Left),
                (Position::new(13.0, 14.0), Direction::Right),
                (Position::new(14.0, 14.0), Direction::Up),
                (Position::new(15.0, 14.0), Direction::Down),
            ],
            ghost_home: (Position::new(14.0, 11.0), Direction::Left),
        })
    }

    /// Layout with pellets laid: every empty cell outside the ghost house gets
    /// one, and the power spots are forced to power pellets.
    pub fn fresh_grid(&self) -> GridMap {
        let mut grid = self.layout.clone();
        for y in 0..grid.height {
            for x in 0..grid.width {
                if grid.grid[y][x] == Tile::Empty && !self.house.contains(x, y) {
                    grid.grid[y][x] = Tile::Pellet;
                }
            }
        }
        for (x, y) in self.power_spots {
            grid.set(x, y, Tile::PowerPellet);
        }
        grid
    }
}

#[cfg(test)]
pub(crate) fn clear_tile(grid: &mut GridMap, x: usize, y: usize) {
    grid.set(x, y, Tile::Empty);
}

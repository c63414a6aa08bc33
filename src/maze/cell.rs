//! The packed cell word.
//!
//! Every concern owns a fixed, disjoint bit range of one `u64`:
//!
//! | bits  | field                                             |
//! |-------|---------------------------------------------------|
//! | 0     | path (unset means wall)                           |
//! | 1     | start                                             |
//! | 2     | finish                                            |
//! | 3     | built during generation                           |
//! | 4     | walked on by the wall-adder's random walk         |
//! | 8-11  | wall mask, one bit per wall neighbour (N, E, S, W) |
//! | 12-15 | backtrack code, one-hot direction back toward the previous cell |
//! | 16-19 | seen flags, one per solver worker                 |
//! | 20-23 | animation frame, owned by the presentation layer  |
//! | 32-55 | paint colour, packed 0xRRGGBB                     |
//!
//! The masks below are the only place these ranges are spelled out.

use crate::maze::point::{CARDINALS, Direction, Point};

/// Maximum number of solver workers that can own a seen bit.
pub const MAX_WORKERS: usize = 4;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(u64);

impl Cell {
    pub const PATH_BIT: u64 = 1 << 0;
    pub const START_BIT: u64 = 1 << 1;
    pub const FINISH_BIT: u64 = 1 << 2;
    pub const BUILT_BIT: u64 = 1 << 3;
    pub const WALK_BIT: u64 = 1 << 4;

    const WALL_SHIFT: u32 = 8;
    pub const WALL_MASK: u64 = 0xF << Self::WALL_SHIFT;
    const BACKTRACK_SHIFT: u32 = 12;
    pub const BACKTRACK_MASK: u64 = 0xF << Self::BACKTRACK_SHIFT;
    const SEEN_SHIFT: u32 = 16;
    pub const SEEN_MASK: u64 = 0xF << Self::SEEN_SHIFT;
    const ANIM_SHIFT: u32 = 20;
    pub const ANIM_MASK: u64 = 0xF << Self::ANIM_SHIFT;
    const PAINT_SHIFT: u32 = 32;
    pub const PAINT_MASK: u64 = 0xFF_FFFF << Self::PAINT_SHIFT;

    /// Bits a solve pass may touch. Clearing these leaves the built maze intact.
    pub const SOLVE_MASK: u64 = Self::START_BIT | Self::FINISH_BIT | Self::SEEN_MASK | Self::PAINT_MASK;

    /// A bare wall with no neighbour information.
    pub const WALL: Cell = Cell(0);
    /// A bare path cell.
    pub const PATH: Cell = Cell(Self::PATH_BIT);

    pub const fn from_bits(bits: u64) -> Self {
        Cell(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn with(self, bits: u64) -> Self {
        Cell(self.0 | bits)
    }

    pub const fn without(self, bits: u64) -> Self {
        Cell(self.0 & !bits)
    }

    pub const fn is_path(self) -> bool {
        self.0 & Self::PATH_BIT != 0
    }

    pub const fn is_wall(self) -> bool {
        !self.is_path()
    }

    pub const fn is_start(self) -> bool {
        self.0 & Self::START_BIT != 0
    }

    pub const fn is_finish(self) -> bool {
        self.0 & Self::FINISH_BIT != 0
    }

    pub const fn is_built(self) -> bool {
        self.0 & Self::BUILT_BIT != 0
    }

    pub const fn is_walk(self) -> bool {
        self.0 & Self::WALK_BIT != 0
    }

    /// The 4-bit wall mask. A set bit means the neighbour in that direction is a wall.
    pub const fn wall_mask(self) -> u8 {
        ((self.0 & Self::WALL_MASK) >> Self::WALL_SHIFT) as u8
    }

    pub const fn with_wall_mask(self, mask: u8) -> Self {
        Cell((self.0 & !Self::WALL_MASK) | (((mask & 0xF) as u64) << Self::WALL_SHIFT))
    }

    pub const fn has_wall_toward(self, dir: Direction) -> bool {
        self.wall_mask() & dir.bit() != 0
    }

    pub const fn with_wall_toward(self, dir: Direction) -> Self {
        self.with_wall_mask(self.wall_mask() | dir.bit())
    }

    pub const fn without_wall_toward(self, dir: Direction) -> Self {
        self.with_wall_mask(self.wall_mask() & !dir.bit())
    }

    /// The raw 4-bit backtrack code, zero when no code is stored.
    pub const fn backtrack_code(self) -> u8 {
        ((self.0 & Self::BACKTRACK_MASK) >> Self::BACKTRACK_SHIFT) as u8
    }

    pub const fn backtrack(self) -> Option<Direction> {
        Direction::from_bit(self.backtrack_code())
    }

    pub const fn with_backtrack(self, dir: Direction) -> Self {
        Cell((self.0 & !Self::BACKTRACK_MASK) | ((dir.bit() as u64) << Self::BACKTRACK_SHIFT))
    }

    pub const fn seen_bit(worker: usize) -> u64 {
        assert!(worker < MAX_WORKERS, "worker id out of range");
        1 << (Self::SEEN_SHIFT + worker as u32)
    }

    pub const fn is_seen_by(self, worker: usize) -> bool {
        self.0 & Self::seen_bit(worker) != 0
    }

    /// Whether any solver worker reached this cell.
    pub const fn is_reached(self) -> bool {
        self.0 & Self::SEEN_MASK != 0
    }

    pub const fn paint(self) -> u32 {
        ((self.0 & Self::PAINT_MASK) >> Self::PAINT_SHIFT) as u32
    }

    pub const fn with_paint(self, rgb: u32) -> Self {
        Cell((self.0 & !Self::PAINT_MASK) | (((rgb & 0xFF_FFFF) as u64) << Self::PAINT_SHIFT))
    }

    pub const fn anim_frame(self) -> u8 {
        ((self.0 & Self::ANIM_MASK) >> Self::ANIM_SHIFT) as u8
    }

    pub const fn with_anim_frame(self, frame: u8) -> Self {
        Cell((self.0 & !Self::ANIM_MASK) | (((frame & 0xF) as u64) << Self::ANIM_SHIFT))
    }
}

/// One entry per wall mask, indexed by the mask itself.
const WALL_GLYPHS: [char; 16] = [
    '■', // isolated pillar
    '╵', // N
    '╶', // E
    '└', // N E
    '╷', // S
    '│', // N S
    '┌', // E S
    '├', // N E S
    '╴', // W
    '┘', // N W
    '─', // E W
    '┴', // N E W
    '┐', // S W
    '┤', // N S W
    '┬', // E S W
    '┼', // N E S W
];

/// Maps a cell's wall mask to its box-drawing shape.
pub fn wall_glyph(cell: Cell) -> char {
    WALL_GLYPHS[cell.wall_mask() as usize]
}

/// One backtrack code with both offsets it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacktrackStep {
    pub direction: Direction,
    /// Offset to the passage cell between the two stride-2 cells.
    pub half: Point,
    /// Offset to the previous stride-2 cell.
    pub full: Point,
}

impl BacktrackStep {
    const fn toward(direction: Direction) -> Self {
        BacktrackStep {
            direction,
            half: direction.offset(),
            full: direction.offset().scaled(2),
        }
    }
}

/// Both offsets derive from the one direction so they can never drift apart.
pub const BACKTRACK_STEPS: [BacktrackStep; 4] = [
    BacktrackStep::toward(CARDINALS[0]),
    BacktrackStep::toward(CARDINALS[1]),
    BacktrackStep::toward(CARDINALS[2]),
    BacktrackStep::toward(CARDINALS[3]),
];

/// Looks up the step encoded in a cell's backtrack code.
pub fn backtrack_step(cell: Cell) -> Option<BacktrackStep> {
    let dir = cell.backtrack()?;
    BACKTRACK_STEPS.iter().copied().find(|step| step.direction == dir)
}

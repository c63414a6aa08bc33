use std::ops::{Add, Sub};

/// A signed (row, col) pair, used both as a grid coordinate and as an offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const fn new(row: i32, col: i32) -> Self {
        Point { row, col }
    }

    pub const fn scaled(self, factor: i32) -> Self {
        Point::new(self.row * factor, self.col * factor)
    }

    /// Whether `other` is exactly one orthogonal step away.
    pub fn is_adjacent(self, other: Point) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four cardinal directions. The discriminant is the direction's bit in
/// both the wall mask and the backtrack code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0b0001,
    East = 0b0010,
    South = 0b0100,
    West = 0b1000,
}

impl Direction {
    pub const fn bit(self) -> u8 {
        self as u8
    }

    pub const fn offset(self) -> Point {
        match self {
            Direction::North => Point::new(-1, 0),
            Direction::East => Point::new(0, 1),
            Direction::South => Point::new(1, 0),
            Direction::West => Point::new(0, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Decodes a one-hot direction bit. Any other pattern (including zero) is not a direction.
    pub const fn from_bit(bit: u8) -> Option<Direction> {
        match bit {
            0b0001 => Some(Direction::North),
            0b0010 => Some(Direction::East),
            0b0100 => Some(Direction::South),
            0b1000 => Some(Direction::West),
            _ => None,
        }
    }
}

/// Cardinal directions in the fixed N, E, S, W iteration order.
pub const CARDINALS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// All eight neighbour offsets, clockwise from north.
pub const ALL_DIRECTIONS: [Point; 8] = [
    Point::new(-1, 0),
    Point::new(-1, 1),
    Point::new(0, 1),
    Point::new(1, 1),
    Point::new(1, 0),
    Point::new(1, -1),
    Point::new(0, -1),
    Point::new(-1, -1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_cancel() {
        for dir in CARDINALS {
            assert_eq!(dir.offset() + dir.opposite().offset(), Point::default());
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_bits_round_trip() {
        for dir in CARDINALS {
            assert_eq!(Direction::from_bit(dir.bit()), Some(dir));
        }
        assert_eq!(Direction::from_bit(0), None);
        assert_eq!(Direction::from_bit(0b0011), None);
    }

    #[test]
    fn test_adjacency() {
        let p = Point::new(3, 3);
        assert!(p.is_adjacent(Point::new(2, 3)));
        assert!(p.is_adjacent(Point::new(3, 4)));
        assert!(!p.is_adjacent(Point::new(4, 4)));
        assert!(!p.is_adjacent(p));
    }
}

use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WIDTH: u32 = 10;
pub const DEFAULT_HEIGHT: u32 = 10;

/// A grid coordinate. Only produced through [`Grid`], so always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(DomainError::validation(format!(
                "Invalid direction: {}",
                token
            ))),
        }
    }
}

/// Fixed coordinate space. `up` grows y, `right` grows x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> DomainResult<Self> {
        if width == 0 || height == 0 {
            return Err(DomainError::validation(format!(
                "Grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y)
    }

    pub fn cell(&self, x: i64, y: i64) -> DomainResult<Cell> {
        if !(0..self.width as i64).contains(&x) {
            return Err(DomainError::validation(format!(
                "x={} is out of range 0..{}",
                x, self.width
            )));
        }
        if !(0..self.height as i64).contains(&y) {
            return Err(DomainError::validation(format!(
                "y={} is out of range 0..{}",
                y, self.height
            )));
        }
        Ok(Cell {
            x: x as u32,
            y: y as u32,
        })
    }

    /// One step from `from`, clamped to the grid edges.
    pub fn step(&self, from: Cell, direction: Direction) -> Cell {
        match direction {
            Direction::Up => Cell {
                y: (from.y + 1).min(self.height - 1),
                ..from
            },
            Direction::Down => Cell {
                y: from.y.saturating_sub(1),
                ..from
            },
            Direction::Left => Cell {
                x: from.x.saturating_sub(1),
                ..from
            },
            Direction::Right => Cell {
                x: (from.x + 1).min(self.width - 1),
                ..from
            },
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const KEY_SEPARATOR: char = ',';
const KEY_FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationKeyError {
    #[error("location key '{key}' has {found} fields, expected 4 (world,x,y,z)")]
    FieldCount { key: String, found: usize },
    #[error("location key field '{field}' is not a valid integer: '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },
    #[error("world identifier must not be empty")]
    EmptyWorld,
    #[error("location key '{key}' is not in canonical form '{canonical}'")]
    NonCanonical { key: String, canonical: String },
    #[error("world identifier contains invalid character {character:?}")]
    InvalidWorldCharacter { character: char },
}

/// Horizontal or vertical displacement between two grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset::new(0, 0, 0);
    pub const EAST: Offset = Offset::new(1, 0, 0);
    pub const WEST: Offset = Offset::new(-1, 0, 0);
    pub const SOUTH: Offset = Offset::new(0, 0, 1);
    pub const NORTH: Offset = Offset::new(0, 0, -1);

    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }
}

/// One cell of the world grid. The canonical key `world,x,y,z` names both the
/// cache entry and the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    world: String,
    x: i32,
    y: i32,
    z: i32,
}

impl Location {
    pub fn new(
        world: impl Into<String>,
        x: i32,
        y: i32,
        z: i32,
    ) -> Result<Self, LocationKeyError> {
        let world = world.into();
        validate_world(&world)?;
        Ok(Self { world, x, y, z })
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn key(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.world,
            self.x,
            self.y,
            self.z,
            sep = KEY_SEPARATOR
        )
    }

    pub fn decode(key: &str) -> Result<Self, LocationKeyError> {
        let fields = key.split(KEY_SEPARATOR).collect::<Vec<_>>();
        if fields.len() != KEY_FIELD_COUNT {
            return Err(LocationKeyError::FieldCount {
                key: key.to_string(),
                found: fields.len(),
            });
        }
        let x = parse_coordinate("x", fields[1])?;
        let y = parse_coordinate("y", fields[2])?;
        let z = parse_coordinate("z", fields[3])?;
        let location = Self::new(fields[0], x, y, z)?;

        // The key names a file, so each location has exactly one spelling.
        let canonical = location.key();
        if canonical != key {
            return Err(LocationKeyError::NonCanonical {
                key: key.to_string(),
                canonical,
            });
        }
        Ok(location)
    }

    /// Neighbor cell, or `None` when it would fall outside the `i32` grid.
    pub fn offset(&self, offset: Offset) -> Option<Self> {
        Some(Self {
            world: self.world.clone(),
            x: self.x.checked_add(offset.dx)?,
            y: self.y.checked_add(offset.dy)?,
            z: self.z.checked_add(offset.dz)?,
        })
    }

    /// True when `other` is one cell away along exactly one horizontal axis.
    pub fn is_paired_with(&self, other: &Location) -> bool {
        if self.world != other.world || self.y != other.y {
            return false;
        }
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).abs();
        dx + dz == 1
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for Location {
    type Err = LocationKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<i32, LocationKeyError> {
    raw.parse::<i32>().map_err(|_| LocationKeyError::InvalidCoordinate {
        field,
        value: raw.to_string(),
    })
}

fn validate_world(world: &str) -> Result<(), LocationKeyError> {
    if world.is_empty() {
        return Err(LocationKeyError::EmptyWorld);
    }
    for ch in world.chars() {
        if ch == KEY_SEPARATOR || matches!(ch, '/' | '\\') || ch.is_control() {
            return Err(LocationKeyError::InvalidWorldCharacter { character: ch });
        }
    }
    Ok(())
}

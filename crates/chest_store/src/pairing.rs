use tracing::debug;

use crate::location::{Location, Offset};
use crate::world::{EntityKind, WorldQuery};

/// Neighbor offsets checked for the other half of a double container. The
/// first match wins, so +x beats every other direction.
pub const PAIR_PROBE_ORDER: [Offset; 4] =
    [Offset::EAST, Offset::WEST, Offset::SOUTH, Offset::NORTH];

pub fn find_pair(location: &Location, world: &dyn WorldQuery) -> Option<Location> {
    for offset in PAIR_PROBE_ORDER {
        let Some(pair) = location.offset(offset) else {
            continue;
        };
        if world.entity_at(location, offset) == Some(EntityKind::Container) {
            debug!(location = %location, pair = %pair, "pair_found");
            return Some(pair);
        }
    }
    debug!(location = %location, "pair_not_found");
    None
}

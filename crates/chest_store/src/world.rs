use crate::location::{Location, Offset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Container,
    Other,
}

/// Read-only view of the host world.
pub trait WorldQuery {
    /// Kind of entity in the cell at `origin + offset`, if the cell holds one.
    fn entity_at(&self, origin: &Location, offset: Offset) -> Option<EntityKind>;

    /// Cell the actor is aiming at, no further than `max_range` cells away.
    fn target_of(&self, actor: ActorId, max_range: u32) -> Option<Location>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Targeting,
}

pub trait Messenger {
    fn message(&self, key: MessageKey) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl Messenger for EnglishMessages {
    fn message(&self, key: MessageKey) -> String {
        match key {
            MessageKey::Targeting => "You must be looking at a chest to do that.".to_string(),
        }
    }
}

use super::world::{BodyHandle, CollisionEvent};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// What happens when a registered body touches something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Freezes the character when the partner is the character proxy.
    FreezeCharacter,
    /// Destroys the registered body once the delay elapses.
    DeleteAfterDelay(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionEffect {
    FreezeCharacter,
    Delete { body: BodyHandle, delay: Duration },
}

/// Body-handle keyed reactions, filled in when bodies are spawned.
#[derive(Debug, Default, Clone)]
pub struct CollisionReactionTable {
    entries: HashMap<BodyHandle, Vec<Reaction>>,
    pending_deletes: HashSet<BodyHandle>,
}

impl CollisionReactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, body: BodyHandle, reaction: Reaction) {
        let reactions = self.entries.entry(body).or_default();
        if !reactions.contains(&reaction) {
            reactions.push(reaction);
        }
    }

    pub fn unregister(&mut self, body: BodyHandle) {
        self.entries.remove(&body);
        self.pending_deletes.remove(&body);
    }

    pub fn reactions_for(&self, body: BodyHandle) -> &[Reaction] {
        self.entries.get(&body).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_registered(&self, body: BodyHandle) -> bool {
        self.entries.contains_key(&body)
    }

    pub fn is_delete_pending(&self, body: BodyHandle) -> bool {
        self.pending_deletes.contains(&body)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Turns one step's contacts into side effects.
    ///
    /// Both bodies of a pair are looked up, so it does not matter which side
    /// the world reported the event for. Repeated or mirrored events within a
    /// step, and contacts on following steps, yield each effect once: a
    /// body's deletion stays pending until it is unregistered.
    pub fn resolve(
        &mut self,
        events: &[CollisionEvent],
        character: Option<BodyHandle>,
    ) -> Vec<ReactionEffect> {
        let mut effects = Vec::new();
        let mut frozen = false;

        for event in events {
            for (body, other) in [(event.body, event.other), (event.other, event.body)] {
                let Some(reactions) = self.entries.get(&body) else {
                    continue;
                };
                for reaction in reactions {
                    match *reaction {
                        Reaction::FreezeCharacter => {
                            if !frozen && character == Some(other) {
                                frozen = true;
                                effects.push(ReactionEffect::FreezeCharacter);
                            }
                        }
                        Reaction::DeleteAfterDelay(delay) => {
                            if self.pending_deletes.insert(body) {
                                effects.push(ReactionEffect::Delete { body, delay });
                            }
                        }
                    }
                }
            }
        }
        effects
    }
}

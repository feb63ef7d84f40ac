//! Notification bus.
//!
//! Every notification type is a Bevy [`Event`] registered through
//! [`AppNotificationExt::add_notification`]. The simulation rotates all
//! registered buffers once per tick, in registration order, so an undrained
//! notification survives exactly one extra tick. Presentation layers pull
//! them with [`drain`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub struct EventsPlugin;

impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NotificationRegistry>()
            .add_notification::<SoundCue>();
    }
}

/// Audio cue requested by the simulation. Playback is the audio layer's job.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    PlayerDeath,
    EnemyDeath1,
    EnemyDeath2,
    BossDeath,
    Hit,
    SpellCast,
    KeyPickup,
    LevelUp,
}

type Rotation = fn(&mut World);

/// Registered notification types, in registration order
#[derive(Resource, Debug, Default)]
pub struct NotificationRegistry {
    entries: Vec<(&'static str, Rotation)>,
}

impl NotificationRegistry {
    pub fn register<T: Event>(&mut self) {
        let name = std::any::type_name::<T>();
        if self.entries.iter().all(|(n, _)| *n != name) {
            self.entries.push((name, rotate::<T>));
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swap the double buffers of every registered type
    pub fn rotate_all(world: &mut World) {
        let rotations: Vec<Rotation> = match world.get_resource::<NotificationRegistry>() {
            Some(registry) => registry.entries.iter().map(|(_, f)| *f).collect(),
            None => return,
        };
        for rotation in rotations {
            rotation(world);
        }
    }
}

fn rotate<T: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<T>>() {
        events.update();
    }
}

/// Take every pending notification of one type
pub fn drain<T: Event>(world: &mut World) -> Vec<T> {
    world
        .get_resource_mut::<Events<T>>()
        .map(|mut events| events.drain().collect())
        .unwrap_or_default()
}

pub trait AppNotificationExt {
    /// Register `T` as a notification with manually rotated buffers
    fn add_notification<T: Event>(&mut self) -> &mut Self;
}

impl AppNotificationExt for App {
    fn add_notification<T: Event>(&mut self) -> &mut Self {
        self.init_resource::<Events<T>>();
        self.world_mut()
            .get_resource_or_insert_with(NotificationRegistry::default)
            .register::<T>();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Event, Debug, Clone, PartialEq)]
    struct Ping(u32);

    #[test]
    fn test_registration_is_ordered_and_unique() {
        let mut app = App::new();
        app.add_plugins(EventsPlugin)
            .add_notification::<Ping>()
            .add_notification::<Ping>();

        let registry = app.world().resource::<NotificationRegistry>();
        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.names().collect();
        assert!(names[0].ends_with("SoundCue"));
        assert!(names[1].ends_with("Ping"));
    }

    #[test]
    fn test_drain_empties_buffer() {
        let mut app = App::new();
        app.add_notification::<Ping>();
        let world = app.world_mut();
        world.send_event(Ping(1));
        world.send_event(Ping(2));

        assert_eq!(drain::<Ping>(world), vec![Ping(1), Ping(2)]);
        assert!(drain::<Ping>(world).is_empty());
    }

    #[test]
    fn test_undrained_events_expire_after_two_rotations() {
        let mut app = App::new();
        app.add_notification::<Ping>();
        let world = app.world_mut();
        world.send_event(Ping(7));

        NotificationRegistry::rotate_all(world);
        assert_eq!(world.resource::<Events<Ping>>().len(), 1);
        NotificationRegistry::rotate_all(world);
        assert!(world.resource::<Events<Ping>>().is_empty());
    }
}

use bevy::math::Vec2;
use rand::Rng;

use super::{rand_range, EnemySpawn, FloorGenParams, Room};

/// Roll every interior tile of every regular room once per enemy type.
/// A density `d` spawns with chance `1 / floor(1 / d)`.
pub(super) fn populate_rooms(
    rng: &mut impl Rng,
    params: &FloorGenParams,
    rooms: &[Room],
) -> Vec<EnemySpawn> {
    let mut spawns = Vec::new();
    for room in rooms {
        let interior = room.interior();
        for (id, density) in &params.mob_density {
            let odds = (1.0 / density) as i32;
            for x in interior.x..interior.x + interior.w {
                for y in interior.y..interior.y + interior.h {
                    if rand_range(rng, 0, odds) == 0 {
                        spawns.push(EnemySpawn {
                            id: id.clone(),
                            position: Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
                        });
                    }
                }
            }
        }
    }
    spawns
}

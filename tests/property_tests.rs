//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Floor generation: any seed gives a valid, reproducible floor
//! - Leveling: experience never lowers the level, `current_xp < xp_require`
//! - Cooldowns: decay saturates at zero and reports readiness once

use std::time::Duration;

use dungeon_core::combat::cooldown::Cooldown;
use dungeon_core::error::GenerationError;
use dungeon_core::generation::{generate, FloorGenParams};
use dungeon_core::progression::Level;
use dungeon_core::tilemap::TileKind;
use proptest::prelude::*;

// ============================================================
// Floor Generation Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn floor_is_valid_for_any_seed(seed in any::<u64>()) {
        let params = FloorGenParams::default();
        let floor = match generate(&params, seed) {
            Ok(floor) => floor,
            Err(GenerationError::TooFewRooms { placed, .. }) => {
                prop_assert!(placed < 2);
                return Ok(());
            }
            Err(err) => return Err(TestCaseError::fail(err.to_string())),
        };

        let rooms = floor.map.room_count() as i32;
        prop_assert!(rooms >= 2 && rooms <= params.max_room_count);
        let rooms: Vec<_> = floor.map.all_rooms().copied().collect();
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                prop_assert!(!a.intersects(b));
            }
        }

        let doors = floor.tiles.positions(|t| matches!(t, TileKind::ExitDoor(_)));
        prop_assert_eq!(doors, vec![floor.map.exit_door]);
        prop_assert!(floor.tiles.count(TileKind::FloorSpawn) > 0);
        prop_assert!(floor.tiles.count(TileKind::FloorBossRoom) > 0);
        prop_assert_eq!(floor.tiles.count(TileKind::Reserved), 0);
    }

    #[test]
    fn floor_is_reproducible(seed in any::<u64>()) {
        let params = FloorGenParams::default();
        if let (Ok(a), Ok(b)) = (generate(&params, seed), generate(&params, seed)) {
            prop_assert_eq!(a.fingerprint(), b.fingerprint());
            prop_assert_eq!(a.map.next_seed, b.map.next_seed);
        }
    }

    #[test]
    fn invalid_sizes_are_rejected(min in -5i32..3, seed in any::<u64>()) {
        let params = FloorGenParams {
            min_room_size: min,
            ..Default::default()
        };
        prop_assert!(matches!(
            generate(&params, seed),
            Err(GenerationError::InvalidParameters(_))
        ));
    }
}

// ============================================================
// Leveling Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn experience_is_monotonic(grants in prop::collection::vec(0u32..500, 1..20)) {
        let mut level = Level::default();
        let mut total_levels = 0;
        for amount in grants {
            let before = level;
            let gained = level.add_xp(amount);
            total_levels += gained;
            prop_assert_eq!(level.current_level, before.current_level + gained);
            prop_assert!(level.xp_require >= before.xp_require);
            prop_assert!(level.current_xp < level.xp_require);
        }
        prop_assert_eq!(level.current_level, total_levels);
    }

    #[test]
    fn split_grants_match_one_grant(a in 0u32..1000, b in 0u32..1000) {
        let mut split = Level::default();
        split.add_xp(a);
        split.add_xp(b);
        let mut once = Level::default();
        once.add_xp(a + b);
        prop_assert_eq!(split, once);
    }

    #[test]
    fn levels_cost_exactly_what_they_report(levels in 0u32..15, head_start in 0u32..10) {
        let mut level = Level::default();
        level.add_xp(head_start);
        let start = level.current_level;
        let needed = level.xp_for_levels(levels) as u32;
        level.add_xp(needed);
        prop_assert_eq!(level.current_level, start + levels);
    }
}

// ============================================================
// Cooldown Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn cooldown_clears_exactly_once(
        total_ms in 1u64..5000,
        steps in prop::collection::vec(1u64..400, 1..60),
    ) {
        let mut cooldown = Cooldown::started(Duration::from_millis(total_ms));
        let mut cleared = 0;
        let mut spent = 0;
        for step in steps {
            spent += step;
            if cooldown.decay(Duration::from_millis(step)) {
                cleared += 1;
            }
            prop_assert_eq!(cooldown.is_ready(), spent >= total_ms);
        }
        prop_assert!(cleared <= 1);
        prop_assert_eq!(cleared == 1, spent >= total_ms);
    }
}

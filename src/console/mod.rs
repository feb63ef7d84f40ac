//! Debug console.
//!
//! A line is split on whitespace; the first word names a command in
//! [`COMMANDS`], the rest are its arguments. Failures come back as
//! [`CommandError`] text carrying the command's usage and leave the world as
//! it was.

use bevy::prelude::*;

use crate::combat::cooldown::{SpellInstance, SpellSlots};
use crate::combat::kill;
use crate::database::Databases;
use crate::error::CommandError;
use crate::generation::floor_manager;
use crate::progression::class::{available_classes, purchase_class};
use crate::progression::{grant_experience, grant_levels, Classes, Level};
use crate::world::{Boss, Dying, Player};

type Handler = fn(&mut World, &[&str], &'static str) -> Result<String, CommandError>;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    handler: Handler,
}

pub const COMMANDS: &[Command] = &[
    Command {
        name: "kill",
        usage: "kill boss|player",
        handler: cmd_kill,
    },
    Command {
        name: "setSpell",
        usage: "setSpell <slot 0-3> <spell_id>",
        handler: cmd_set_spell,
    },
    Command {
        name: "addXp",
        usage: "addXp <amount>",
        handler: cmd_add_xp,
    },
    Command {
        name: "addLevel",
        usage: "addLevel <levels>",
        handler: cmd_add_level,
    },
    Command {
        name: "buyClass",
        usage: "buyClass <name>",
        handler: cmd_buy_class,
    },
    Command {
        name: "getClasses",
        usage: "getClasses",
        handler: cmd_get_classes,
    },
    Command {
        name: "getClassInfo",
        usage: "getClassInfo <name>",
        handler: cmd_get_class_info,
    },
    Command {
        name: "nextFloor",
        usage: "nextFloor",
        handler: cmd_next_floor,
    },
    Command {
        name: "help",
        usage: "help",
        handler: cmd_help,
    },
];

pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Parse and run one console line
pub fn run(world: &mut World, line: &str) -> Result<String, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(String::new());
    };
    let args: Vec<&str> = words.collect();
    let command = find(name).ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
    (command.handler)(world, &args, command.usage)
}

fn expect_args(args: &[&str], count: usize, usage: &'static str) -> Result<(), CommandError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(CommandError::Usage { usage })
    }
}

fn parse<T: std::str::FromStr>(arg: &str, usage: &'static str) -> Result<T, CommandError> {
    arg.parse().map_err(|_| CommandError::InvalidArgument {
        argument: arg.to_string(),
        usage,
    })
}

fn failed(err: impl std::fmt::Display, usage: &'static str) -> CommandError {
    CommandError::Failed {
        message: err.to_string(),
        usage,
    }
}

fn player(world: &mut World, usage: &'static str) -> Result<Entity, CommandError> {
    world
        .query_filtered::<Entity, With<Player>>()
        .iter(world)
        .next()
        .ok_or_else(|| failed("no player in the world", usage))
}

fn cmd_kill(world: &mut World, args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    expect_args(args, 1, usage)?;
    let player = player(world, usage)?;
    match args[0] {
        "player" => {
            kill(world, player, player);
            Ok("player killed".to_string())
        }
        "boss" => {
            let bosses: Vec<Entity> = world
                .query_filtered::<Entity, (With<Boss>, Without<Dying>)>()
                .iter(world)
                .collect();
            for boss in &bosses {
                kill(world, *boss, player);
            }
            Ok(format!("{} boss(es) killed", bosses.len()))
        }
        other => Err(CommandError::InvalidArgument {
            argument: other.to_string(),
            usage,
        }),
    }
}

fn cmd_set_spell(
    world: &mut World,
    args: &[&str],
    usage: &'static str,
) -> Result<String, CommandError> {
    expect_args(args, 2, usage)?;
    let slot: usize = parse(args[0], usage)?;
    let player = player(world, usage)?;
    let spell = SpellInstance::new(args[1], world.resource::<Databases>())
        .map_err(|err| failed(err, usage))?;

    let mut slots = world
        .get_mut::<SpellSlots>(player)
        .ok_or_else(|| failed("player has no spell slots", usage))?;
    if !slots.set(slot, spell) {
        return Err(CommandError::InvalidArgument {
            argument: args[0].to_string(),
            usage,
        });
    }
    Ok(format!("slot {slot} set to {}", args[1]))
}

fn cmd_add_xp(world: &mut World, args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    expect_args(args, 1, usage)?;
    let amount: u32 = parse(args[0], usage)?;
    let player = player(world, usage)?;
    let gained = grant_experience(world, player, amount);
    Ok(level_report(world, player, gained))
}

fn cmd_add_level(
    world: &mut World,
    args: &[&str],
    usage: &'static str,
) -> Result<String, CommandError> {
    expect_args(args, 1, usage)?;
    let levels: u32 = parse(args[0], usage)?;
    let player = player(world, usage)?;
    let gained = grant_levels(world, player, levels);
    Ok(level_report(world, player, gained))
}

fn level_report(world: &World, player: Entity, gained: u32) -> String {
    match world.get::<Level>(player) {
        Some(level) => format!(
            "gained {gained} level(s), now level {} ({}/{} xp)",
            level.current_level, level.current_xp, level.xp_require
        ),
        None => format!("gained {gained} level(s)"),
    }
}

fn cmd_buy_class(
    world: &mut World,
    args: &[&str],
    usage: &'static str,
) -> Result<String, CommandError> {
    expect_args(args, 1, usage)?;
    let player = player(world, usage)?;
    purchase_class(world, player, args[0]).map_err(|err| failed(err, usage))?;
    Ok(format!("bought {}", args[0]))
}

fn cmd_get_classes(
    world: &mut World,
    args: &[&str],
    usage: &'static str,
) -> Result<String, CommandError> {
    expect_args(args, 0, usage)?;
    let player = player(world, usage)?;
    let owned = world
        .get::<Classes>(player)
        .map(|c| c.0.clone())
        .unwrap_or_default();
    let next = available_classes(world, player);
    Ok(format!(
        "player has {} classes : [{}]\npurchasable : [{}]",
        owned.len(),
        owned.join(", "),
        next.join(", ")
    ))
}

fn cmd_get_class_info(
    world: &mut World,
    args: &[&str],
    usage: &'static str,
) -> Result<String, CommandError> {
    expect_args(args, 1, usage)?;
    let class = world
        .resource::<Databases>()
        .class(args[0])
        .map_err(|err| failed(err, usage))?;
    Ok(format!(
        "class {}:\n\tdescription : {}\n\ticon : {}\n\tasset : {}\n\tspells : [{}]\n\
         \thealth : {}\n\tdamage : {}\n\tspeed : {}\n\tcost : {}\n\tchildren : [{}]",
        class.name,
        class.description,
        class.icon,
        class.asset,
        class.spells.join(", "),
        class.health,
        class.damage,
        class.speed,
        class.cost,
        class.children.join(", "),
    ))
}

fn cmd_next_floor(
    world: &mut World,
    args: &[&str],
    usage: &'static str,
) -> Result<String, CommandError> {
    expect_args(args, 0, usage)?;
    let floor = floor_manager::change_floor(world).map_err(|err| failed(err, usage))?;
    Ok(format!("now on floor {floor}"))
}

fn cmd_help(_: &mut World, args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    expect_args(args, 0, usage)?;
    Ok(COMMANDS
        .iter()
        .map(|c| c.usage)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::hitbox::Health;
    use crate::engine::Simulation;
    use crate::gameflow::GameState;
    use crate::player::PlayerIntent;
    use crate::progression::SkillPoints;

    fn started() -> (Simulation, Entity) {
        let mut sim = Simulation::with_defaults().unwrap();
        let player = sim.new_game().unwrap();
        (sim, player)
    }

    #[test]
    fn test_empty_line_is_noop() {
        let (mut sim, _) = started();
        assert_eq!(sim.run_command("   ").unwrap(), "");
    }

    #[test]
    fn test_unknown_command() {
        let (mut sim, _) = started();
        let err = sim.run_command("fly away").unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(ref name) if name == "fly"));
    }

    #[test]
    fn test_wrong_arity_reports_usage() {
        let (mut sim, _) = started();
        let err = sim.run_command("addXp").unwrap_err();
        assert!(err.to_string().contains("usage: addXp <amount>"));
        let err = sim.run_command("addXp ten").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument { ref argument, .. } if argument == "ten"));
    }

    #[test]
    fn test_add_xp_and_level() {
        let (mut sim, player) = started();
        let out = sim.run_command("addXp 25").unwrap();
        assert!(out.starts_with("gained 2 level(s)"));
        sim.run_command("addLevel 1").unwrap();
        let level = sim.world().get::<Level>(player).unwrap();
        assert_eq!(level.current_level, 3);
        assert_eq!(level.current_xp, 0);
        assert_eq!(sim.world().get::<SkillPoints>(player).unwrap().0, 3);
    }

    #[test]
    fn test_unknown_class_lists_available() {
        let (mut sim, _) = started();
        let err = sim.run_command("getClassInfo rogue").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("farmer"));
        assert!(text.ends_with("usage: getClassInfo <name>"));
    }

    #[test]
    fn test_buy_class_and_list() {
        let (mut sim, _) = started();
        sim.run_command("addLevel 1").unwrap();
        sim.run_command("buyClass mage").unwrap();
        let out = sim.run_command("getClasses").unwrap();
        assert!(out.starts_with("player has 2 classes : [farmer, mage]"));
        assert!(sim.run_command("buyClass mage").is_err());
    }

    #[test]
    fn test_set_spell_bounds() {
        let (mut sim, player) = started();
        sim.run_command("setSpell 3 fireball").unwrap();
        let slots = sim.world().get::<SpellSlots>(player).unwrap();
        assert_eq!(slots.get(3).unwrap().id, "fireball");
        assert!(matches!(
            sim.run_command("setSpell 4 fireball"),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert!(matches!(
            sim.run_command("setSpell 0 meteor"),
            Err(CommandError::Failed { .. })
        ));
    }

    #[test]
    fn test_kill_player_ends_game() {
        let (mut sim, player) = started();
        sim.run_command("kill player").unwrap();
        assert_eq!(sim.state(), GameState::GameOver);
        assert!(sim.world().get::<Health>(player).is_some());
        assert!(sim.run_command("kill dragon").is_err());
    }

    #[test]
    fn test_kill_player_from_inventory_ends_game() {
        let (mut sim, player) = started();
        sim.handle_intent(PlayerIntent::ToggleInventory);
        assert_eq!(sim.state(), GameState::InInventory);

        sim.run_command("kill player").unwrap();
        assert_eq!(sim.state(), GameState::GameOver);
        assert!(sim.world().get::<Dying>(player).is_some());

        sim.handle_intent(PlayerIntent::ToggleInventory);
        assert_eq!(sim.state(), GameState::GameOver);
        assert!(!sim.tick(std::time::Duration::from_millis(16)).unwrap());
    }

    #[test]
    fn test_kill_boss_drops_key_and_pays_xp() {
        let (mut sim, player) = started();
        assert_eq!(sim.run_command("kill boss").unwrap(), "1 boss(es) killed");
        let level = sim.world().get::<Level>(player).unwrap();
        assert!(level.current_level >= 3);
    }

    #[test]
    fn test_next_floor_and_help() {
        let (mut sim, _) = started();
        assert_eq!(sim.run_command("nextFloor").unwrap(), "now on floor 2");
        let help = sim.run_command("help").unwrap();
        assert_eq!(help.lines().count(), COMMANDS.len());
    }
}

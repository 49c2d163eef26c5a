//! Black Site - demo driver
//!
//! Builds a small facility, then runs turns with either a random legal
//! decision source or an operator at the terminal.

use std::path::PathBuf;

use black_site::core::error::Result;
use black_site::core::types::{AreaId, Skill, Skills};
use black_site::core::{EngineOptions, TuningConfig};
use black_site::decision::{DecisionSource, ManualSource, RandomSource};
use black_site::entity::{Agent, Character, Entity, Equipment, Hostile, Objective, ObjectiveKind, Obstacle};
use black_site::mission::{GameController, TurnOutcome};
use black_site::world::{Area, ConnectionSpec, Rect, World};
use clap::Parser;

/// Turn-based infiltration of a small research facility
#[derive(Parser, Debug)]
#[command(name = "black-site")]
#[command(about = "Run a tactical infiltration mission")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum turns before the run stops
    #[arg(long, default_value_t = 30)]
    turns: u32,

    /// Force agents hidden at the start of every turn
    #[arg(long)]
    agents_hidden: bool,

    /// Report hostiles as visible even when nobody is watching them
    #[arg(long)]
    hostiles_visible: bool,

    /// Only offer the core action set (no move, peek or investigate)
    #[arg(long)]
    basic_actions: bool,

    /// Pick every action by hand
    #[arg(long, short = 'm')]
    manual: bool,

    /// TOML file overriding the default tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Mission Control instruction handed to the agents before the first turn
    #[arg(long)]
    directive: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("black_site=info")),
        )
        .init();

    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => TuningConfig::from_toml_file(path)?,
        None => TuningConfig::default(),
    };
    let options = EngineOptions {
        agents_always_hidden: args.agents_hidden,
        hostiles_always_visible: args.hostiles_visible,
        extended_actions: !args.basic_actions,
        seed: args.seed,
    };

    let mut controller = GameController::new(build_facility()?, tuning, options)?;
    if let Some(directive) = &args.directive {
        controller.inject_directive(directive.clone());
    }

    let mut source: Box<dyn DecisionSource> = if args.manual {
        Box::new(ManualSource::new(std::io::stdin().lock(), std::io::stdout()))
    } else {
        Box::new(RandomSource::new(args.seed.unwrap_or(0).wrapping_add(1)))
    };

    println!("\n=== BLACK SITE ===");
    print_lines(controller.log_mut().drain());

    for _ in 0..args.turns {
        match controller.process_turn(source.as_mut())? {
            TurnOutcome::MissionOver => break,
            TurnOutcome::Played { turn, .. } => {
                println!("\n--- Turn {} ---", turn + 1);
                print_lines(controller.log_mut().drain());
            }
        }
    }

    let progress = controller.objective_progress();
    println!(
        "\nMission ended after {} turns: {}/{} objectives captured, {} agents still in the field",
        controller.turn(),
        progress.captured,
        progress.total,
        controller.world().living_agents().len()
    );
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("  {}", line);
    }
}

/// Loading dock, two corridors, a server room and a records office
fn build_facility() -> Result<World> {
    let mut world = World::new();

    let dock = world.add_area(
        Area::new("Loading Dock", "Crates stacked along a roll-up door.")
            .with_geometry(Rect::new(0.0, 0.0, 12.0, 8.0))
            .with_modifiers(0.2, 0.1)
            .extraction_point(),
    );
    let corridor = world.add_area(
        Area::new("Service Corridor", "Narrow, fluorescent, echoing.")
            .with_geometry(Rect::new(12.0, 2.0, 16.0, 4.0))
            .with_modifiers(-0.1, 0.0)
            .with_noise_baseline(0.05),
    );
    let hall = world.add_area(
        Area::new("Main Hall", "A wide atrium with a dry fountain.")
            .with_geometry(Rect::new(28.0, 0.0, 14.0, 14.0))
            .with_modifiers(0.0, 0.2),
    );
    let servers = world.add_area(
        Area::new("Server Room", "Cold air and blinking racks.")
            .with_geometry(Rect::new(42.0, 0.0, 10.0, 7.0))
            .with_color("blue"),
    );
    let records = world.add_area(
        Area::new("Records Office", "Filing cabinets, one desk lamp.")
            .with_geometry(Rect::new(42.0, 7.0, 10.0, 7.0)),
    );

    world.connect(
        dock,
        corridor,
        ConnectionSpec::door().with_descriptions("A steel fire door", "The dock door"),
    )?;
    world.connect_open(corridor, hall)?;
    world.connect(
        hall,
        servers,
        ConnectionSpec::door()
            .with_access_difficulty(0.2, 0.0)
            .with_spot_difficulty(0.1, 0.1),
    )?;
    world.connect_door(hall, records)?;
    world.connect_window(dock, records)?;

    spawn_team(&mut world, dock)?;
    spawn_guards(&mut world, &[corridor, hall, records], servers)?;

    world.spawn(Entity::objective(
        "Core Drive",
        "Encrypted research archive.",
        servers,
        Objective::new(ObjectiveKind::Computer, 0.2),
    ))?;
    world.spawn(Entity::objective(
        "Ledger",
        "Handwritten shipment log.",
        records,
        Objective::new(ObjectiveKind::Simple, 0.3),
    ))?;
    world.spawn(Entity::obstacle(
        "Laser Grid",
        "A lattice of red beams.",
        hall,
        Obstacle::new("laser", 0.3),
    ))?;
    Ok(world)
}

fn spawn_team(world: &mut World, start: AreaId) -> Result<()> {
    let infiltrator = Skills::new()
        .with(Skill::Stealth, 1.0)
        .with(Skill::Firearms, 0.4)
        .with(Skill::Cover, 0.5)
        .with(Skill::HandToHand, 0.8)
        .with(Skill::Hacking, 0.7)
        .with(Skill::Observation, 0.8)
        .with(Skill::Acrobatics, 1.0);
    let gunner = Skills::new()
        .with(Skill::Stealth, 0.7)
        .with(Skill::Firearms, 0.9)
        .with(Skill::Cover, 0.7)
        .with(Skill::HandToHand, 0.7)
        .with(Skill::Hacking, 0.2)
        .with(Skill::Observation, 0.7)
        .with(Skill::Acrobatics, 0.7);

    world.spawn(Entity::agent(
        "Vega",
        "Slight, patient, never seen twice.",
        start,
        Agent::new(Character::new(infiltrator).with_resilience(0.6))
            .with_behavior("Prefers to stay unseen and avoids fights."),
    ))?;
    world.spawn(Entity::agent(
        "Rook",
        "Broad shoulders, steady hands.",
        start,
        Agent::new(
            Character::new(gunner)
                .with_resilience(0.8)
                .with_item(Equipment::submachine_gun()),
        )
        .with_behavior("Covers the team and shoots first when cornered."),
    ))?;
    Ok(())
}

fn spawn_guards(world: &mut World, route: &[AreaId], post: AreaId) -> Result<()> {
    let skills = Skills::new()
        .with(Skill::Observation, 0.2)
        .with(Skill::HandToHand, 0.2)
        .with(Skill::Firearms, 0.5)
        .with(Skill::Cover, 0.3);
    world.spawn(Entity::hostile(
        "Patrol Guard",
        "Bored, flashlight clipped to the belt.",
        Hostile::new(skills, route),
    ))?;
    world.spawn(Entity::hostile(
        "Server Guard",
        "Alert, leaning against the racks.",
        Hostile::new(skills.with(Skill::Observation, 0.3), &[post]),
    ))?;
    Ok(())
}

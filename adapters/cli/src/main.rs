#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a container scenario and drives the
//! Stashgrid placement engine against it.

mod render;
mod scenario;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stashgrid_container::{apply, query, Container};
use stashgrid_core::{CellCoord, Command, Event, ItemId, Rotation};
use stashgrid_system_placement::{DropPlan, DropPlanner, DropPreview};
use stashgrid_system_stowing::Stowing;

use crate::render::{describe_event, is_rejection, render_grid};
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "stashgrid")]
#[command(about = "Inspect and rearrange grid-based item containers", long_about = None)]
struct Cli {
    /// Scenario file describing the container and loose items
    scenario: PathBuf,

    /// Log more detail to stderr; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the container grid
    Show,
    /// Report how an item would be dropped without changing anything
    Check(DropArgs),
    /// Drop an item, rearranging neighbours when needed
    Place(DropArgs),
    /// Rotate a placed item clockwise
    Rotate {
        /// Item to rotate
        #[arg(long)]
        item: u32,
    },
    /// Take an item out of the container
    Remove {
        /// Item to remove
        #[arg(long)]
        item: u32,
    },
    /// Move every loose item into the container
    Stow,
}

#[derive(clap::Args)]
struct DropArgs {
    /// Item to drop; either placed already or listed as incoming
    #[arg(long)]
    item: u32,
    /// Target column of the item's top-left cell
    #[arg(long, allow_negative_numbers = true)]
    column: i32,
    /// Target row of the item's top-left cell
    #[arg(long, allow_negative_numbers = true)]
    row: i32,
    /// Orientation in degrees to drop the item with
    #[arg(long)]
    rotation: Option<u16>,
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), crate_name(record.target()), record.args());
        }
    }

    fn flush(&self) {}
}

/// Leading path segment of a log target.
fn crate_name(target: &str) -> &str {
    target.split_once("::").map_or(target, |(name, _)| name)
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).context("failed to install stderr logger")?;
    log::set_max_level(match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    });
    Ok(())
}

/// Entry point for the Stashgrid command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let scenario = Scenario::load(&cli.scenario)?;
    let mut container = scenario.build()?;
    log::info!(
        "loaded {} item(s) from {}",
        query::items(&container).len(),
        cli.scenario.display()
    );

    match cli.command {
        Action::Show => {}
        Action::Check(args) => {
            let preview = drop_preview(&scenario, &container, &args)?;
            println!("{}", describe_plan(&preview.plan));
            return Ok(());
        }
        Action::Place(args) => {
            let preview = drop_preview(&scenario, &container, &args)?;
            if let DropPlan::Rejected(reason) = &preview.plan {
                bail!("item {} cannot be dropped there: {reason}", args.item);
            }
            let mut commands = Vec::new();
            DropPlanner::new().handle(Some(&preview), true, &mut commands);
            run_commands(&mut container, commands)?;
        }
        Action::Rotate { item } => {
            let item = ItemId::new(item);
            run_commands(&mut container, vec![Command::RotateItem { item }])?;
        }
        Action::Remove { item } => {
            let item = ItemId::new(item);
            run_commands(&mut container, vec![Command::RemoveItem { item }])?;
        }
        Action::Stow => {
            let mut commands = Vec::new();
            let leftovers = Stowing::new().handle(
                query::items(&container),
                query::grid(&container),
                query::rules(&container),
                scenario.incoming()?,
                &mut commands,
            );
            run_commands(&mut container, commands)?;
            if !leftovers.is_empty() {
                let ids = leftovers
                    .iter()
                    .map(|item| item.id().get().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("no room for: {ids}");
            }
        }
    }

    print!("{}", render_grid(&container));
    Ok(())
}

fn drop_preview(
    scenario: &Scenario,
    container: &Container,
    args: &DropArgs,
) -> Result<DropPreview> {
    let id = ItemId::new(args.item);
    let item = match query::item(container, id) {
        Some(item) => item.clone(),
        None => scenario
            .incoming_item(id)?
            .with_context(|| format!("item {} is neither placed nor incoming", args.item))?,
    };
    let item = match args.rotation {
        Some(degrees) => {
            let Some(rotation) = Rotation::from_degrees(degrees) else {
                bail!("rotation of {degrees} degrees is not a quarter turn");
            };
            item.with_rotation(rotation)
        }
        None => item,
    };

    Ok(DropPreview::new(
        query::items(container),
        query::grid(container),
        item,
        CellCoord::new(args.column, args.row),
        query::rules(container),
    ))
}

fn describe_plan(plan: &DropPlan) -> String {
    match plan {
        DropPlan::Merge { target } => format!("merges into item {}", target.get()),
        DropPlan::Direct => "fits directly".to_owned(),
        DropPlan::Rearranged(relocations) => {
            let moves = relocations
                .iter()
                .map(|relocation| {
                    format!(
                        "item {} to ({}, {}) at {} degrees",
                        relocation.item.get(),
                        relocation.anchor.column(),
                        relocation.anchor.row(),
                        relocation.rotation.degrees()
                    )
                })
                .collect::<Vec<_>>()
                .join("; ");
            format!("fits after moving {moves}")
        }
        DropPlan::Rejected(reason) => format!("does not fit: {reason}"),
    }
}

fn run_commands(container: &mut Container, commands: Vec<Command>) -> Result<()> {
    let mut events: Vec<Event> = Vec::new();
    for command in commands {
        apply(container, command, &mut events);
    }
    for event in &events {
        println!("{}", describe_event(event));
    }
    if let Some(rejection) = events.iter().find(|event| is_rejection(event)) {
        bail!("command refused: {}", describe_event(rejection));
    }
    Ok(())
}

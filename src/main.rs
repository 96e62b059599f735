use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use logic_chain::{
    document::Document,
    evaluate,
    interpreter::render::{BuffMarker, render_expanded},
    model::ScenarioId,
    scenario::preview_buffs,
    util::num::format_number,
};
use tracing_subscriber::EnvFilter;

/// logic-chain evaluates a chain of named formulas and shows how active buffs
/// change the result.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a logic-chain JSON document.
    document: PathBuf,

    /// Name of the row to inspect. Defaults to the document's active target.
    #[arg(short, long)]
    target: Option<String>,

    /// Id of the scenario whose buffs are active. Defaults to the document's
    /// active buffs.
    #[arg(short, long)]
    scenario: Option<String>,

    /// Compares the target across all scenarios against the baseline.
    #[arg(short, long)]
    compare: bool,

    /// Previews the target's value with each inactive buff switched on.
    #[arg(short, long)]
    what_if: bool,

    /// Prints the expanded display tree of the target, buff nodes in brackets.
    #[arg(long)]
    tree: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                  EnvFilter::new("warn")
                                              }))
                             .with_writer(std::io::stderr)
                             .init();

    let args = Args::parse();

    let document = match Document::load(&args.document) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Failed to load '{}': {e}", args.document.display());
            return ExitCode::FAILURE;
        },
    };

    let mut scenarios = document.scenario_set();
    if let Some(id) = &args.scenario
       && !scenarios.set_active(&ScenarioId::from(id.as_str()))
    {
        eprintln!("Unknown scenario '{id}'.");
        return ExitCode::FAILURE;
    }
    let active = scenarios.active().active_buff_ids.clone();

    let evaluation = evaluate(&document.rows, &document.buffs, &active);

    for row in &document.rows {
        if let Some(error) = evaluation.error(&row.id) {
            tracing::warn!(row = %row.id, %error, "row skipped");
            println!("{:<16} error: {error}", display_name(&row.name));
        } else if let Some(entry) = evaluation.entry(&row.name) {
            let marker = if entry.is_buffed { " *" } else { "" };
            println!("{:<16} = {}{marker}", row.name, format_number(entry.value));
        }
    }

    let target = args.target
                     .clone()
                     .or_else(|| document.active_target().map(|row| row.name.clone()));
    let Some(target) = target else {
        return ExitCode::SUCCESS;
    };

    if args.tree {
        println!();
        match evaluation.entry(&target) {
            Some(entry) => println!("{target} = {}",
                                    render_expanded(&entry.display_tree,
                                                    &evaluation.context,
                                                    BuffMarker::Brackets)),
            None => println!("{target} has no value."),
        }
    }

    if args.compare {
        println!();
        println!("Scenarios for {target} (baseline: {})", scenarios.baseline().name);
        for outcome in scenarios.compare(&document.rows, &document.buffs, &target) {
            let label = if outcome.is_baseline { " (baseline)" } else { "" };
            println!("  {:<20} {:>12} {:>+12} {:>+8.1}%{label}",
                     outcome.name,
                     format_number(outcome.value),
                     outcome.delta.absolute,
                     outcome.delta.percent);
        }
    }

    if args.what_if {
        println!();
        println!("What if, for {target}:");
        for preview in preview_buffs(&document.rows, &document.buffs, &active, &target) {
            let name = document.buffs
                               .iter()
                               .find(|buff| buff.id == preview.buff_id)
                               .map_or(preview.buff_id.0.as_str(), |buff| buff.name.as_str());
            println!("  + {:<18} {:>12} {:>+12} {:>+8.1}%",
                     name,
                     format_number(preview.value),
                     preview.delta.absolute,
                     preview.delta.percent);
        }
    }

    ExitCode::SUCCESS
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "(unnamed)" } else { name }
}

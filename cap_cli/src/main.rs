//! # Pilecap CLI Application
//!
//! Runs the pile-cap design workflow from a terminal against the same
//! calculation service the GUI uses.
//!
//! ```text
//! cap_cli [REACTIONS.tsv] [--advanced]
//! ```
//!
//! The grid is prompted for interactively (press Enter to keep a default).
//! A tab-separated reactions file, if given, is saved to the service before
//! pile forces are requested.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cap_core::config::ClientConfig;
use cap_core::errors::{CapError, CapResult};
use cap_core::ingest::PasteAnchor;
use cap_core::layout::{DesignInputs, LayoutRequest};
use cap_core::reactions::{ReactionField, ReactionTable};
use cap_core::report::{
    advanced_summary, design_check_summary, footing_summary, force_table, pile_breakdowns, shear_summary,
    SummaryRow, BREAKDOWN_HEADINGS, FORCE_TABLE_HEADINGS,
};
use cap_core::service::{DesignCheckRequest, ServiceClient};
use cap_core::workflow::WorkflowController;

struct Args {
    reactions: Option<PathBuf>,
    advanced: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Args {
    let mut parsed = Args {
        reactions: None,
        advanced: false,
    };
    for arg in args {
        if arg == "--advanced" {
            parsed.advanced = true;
        } else {
            parsed.reactions = Some(PathBuf::from(arg));
        }
    }
    parsed
}

fn prompt<T: std::str::FromStr + std::fmt::Display + Copy>(label: &str, default: T) -> T {
    print!("{} [{}]: ", label, default);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_layout() -> LayoutRequest {
    let defaults = LayoutRequest::default();
    LayoutRequest {
        n_x: prompt("Number of piles along X", defaults.n_x),
        s_x: prompt("Pile spacing along X (ft)", defaults.s_x),
        n_y: prompt("Number of piles along Y", defaults.n_y),
        s_y: prompt("Pile spacing along Y (ft)", defaults.s_y),
        overhang: prompt("Pile overhang (ft)", defaults.overhang),
    }
}

fn print_row(cells: &[impl AsRef<str>]) {
    let line: Vec<String> = cells.iter().map(|c| format!("{:>12}", c.as_ref())).collect();
    println!("{}", line.join(" "));
}

fn print_summary(title: &str, rows: &[SummaryRow]) {
    println!();
    println!("{}", title);
    println!("{}", "-".repeat(title.len()));
    for row in rows {
        println!("  {:<40} {}", row.label, row.value);
        if let Some(formula) = &row.formula {
            println!("  {:<40} {}", "", formula);
        }
    }
}

async fn save_reactions(client: &ServiceClient, workflow: &mut WorkflowController, path: &Path) -> CapResult<()> {
    let text = std::fs::read_to_string(path).map_err(|e| CapError::file_error("read", path.display().to_string(), e.to_string()))?;
    let mut table = ReactionTable::new();
    table.paste_at(&text, PasteAnchor::new(0, ReactionField::LoadCase))?;
    let saved = client.save_reactions(&table.payload()?).await?;
    workflow.confirm_reactions(&saved);
    table.confirm_saved(saved);
    println!("Saved {} load combinations", table.rows().len());
    Ok(())
}

async fn run(args: Args) -> CapResult<()> {
    let config = ClientConfig::from_env();
    let client = ServiceClient::new(&config)?;
    let mut workflow = WorkflowController::new();

    let layout = prompt_layout();
    let inputs = DesignInputs::default();

    let check = client.calculate(&DesignCheckRequest::build(&layout, &inputs)).await?;
    print_summary("Design Check", &design_check_summary(&check));

    let job = workflow.begin_layout(layout, inputs.clone())?;
    let outcome = client.pile_coordinates(&job.spec, false).await;
    workflow.apply_layout(job, outcome)?;
    println!();
    println!("Generated {} piles", workflow.coordinates().len());

    if let Some(path) = &args.reactions {
        save_reactions(&client, &mut workflow, path).await?;
    }

    let job = workflow.begin_forces()?;
    let outcome = client.compute_forces(&job.spec).await;
    workflow.apply_forces(job, outcome)?;

    if let Some(forces) = workflow.forces() {
        let table = force_table(&forces.piles);
        println!();
        print_row(&FORCE_TABLE_HEADINGS);
        for row in &table.rows {
            print_row(&row.cells);
        }
        if let Some(notice) = table.notice {
            println!("{}", notice);
        }

        let breakdowns = pile_breakdowns(&forces.piles);
        for pile in &breakdowns.rows {
            println!();
            println!("{}", pile.title);
            print_row(&BREAKDOWN_HEADINGS);
            for cells in &pile.rows {
                print_row(cells);
            }
        }
        if let Some(notice) = breakdowns.notice {
            println!("{}", notice);
        }

        if let Some(calc) = &forces.footing_calculations {
            print_summary("Footing Calculations", &footing_summary(calc));
        }
        if let Some(check) = &forces.shear_check {
            print_summary("Shear Check", &shear_summary(check));
        }
    }

    if args.advanced {
        let job = workflow.begin_advanced(&layout, &inputs)?;
        let outcome = client.advanced_design(&job.request).await;
        workflow.apply_advanced(job, outcome)?;
        if let Some(design) = workflow.advanced() {
            print_summary("Advanced Pile Cap Design", &advanced_summary(design));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cap_core=info,cap_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    println!("Pilecap CLI - Pile Cap Design");
    println!("=============================");
    println!();

    match run(parse_args(std::env::args().skip(1))).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "workflow failed");
            eprintln!("Error: {}", err.user_message());
            if let Ok(json) = serde_json::to_string_pretty(&err) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! planrec - floor plan recommendation CLI
//!
//! Loads the plan catalog, collects the plot size and room program (from
//! flags, `PLANREC_*` environment variables, or interactive prompts), picks
//! the nearest plan and draws it.
//!
//! Usage:
//!   planrec --catalog plan_db_simple.json
//!   planrec --width 12 --height 15 --bedrooms 2 --toilets 2 --parking 1 \
//!           --sitouts 1 --living-rooms 1 --kitchens 1 --dinings 1 --json

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use planrec_core::{Matcher, PlanCatalog};
use planrec_render::{format_summary, write_png, write_svg};

mod args;
mod prompt;
mod report;

use args::Args;
use report::MatchReport;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the prompts and the result
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,planrec_cli=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let catalog = PlanCatalog::load(&args.catalog)
        .with_context(|| format!("cannot use catalog {}", args.catalog.display()))?;
    let config = args.match_config();
    tracing::info!(
        catalog = %args.catalog.display(),
        plans = catalog.len(),
        strategy = %config.strategy,
        "Catalog loaded"
    );

    let matcher = Matcher::new(&catalog, &config)?;

    // With --json, stdout carries only the report
    let query = if args.query.is_complete() {
        args.query.to_query()?
    } else if args.json {
        args.query.read_interactive(io::stdin().lock(), io::stderr().lock())?
    } else {
        args.query.read_interactive(io::stdin().lock(), io::stdout().lock())?
    };

    let found = matcher.find_query(&query)?;

    if args.json {
        let report = MatchReport::new(&found, &query, matcher.strategy());
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        print!("{}", format_summary(&found));
    }

    if args.no_render {
        return Ok(());
    }

    let options = args.render_options();
    let svg_path = args
        .svg
        .clone()
        .unwrap_or_else(|| default_svg_path(&found.plan.plan_id));
    write_svg(&svg_path, found.plan, &options)
        .with_context(|| format!("cannot write {}", svg_path.display()))?;
    tracing::info!(path = %svg_path.display(), "Diagram written");
    if !args.json {
        println!("\nDiagram saved: {}", svg_path.display());
    }

    if let Some(png_path) = &args.png {
        write_png(png_path, found.plan, &options)
            .with_context(|| format!("cannot write {}", png_path.display()))?;
        tracing::info!(path = %png_path.display(), "Raster written");
        if !args.json {
            println!("Raster saved: {}", png_path.display());
        }
    }

    Ok(())
}

/// `<plan_id>.svg`, with characters unsafe in file names replaced
fn default_svg_path(plan_id: &str) -> PathBuf {
    let stem: String = plan_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    PathBuf::from(format!("{}.svg", stem))
}

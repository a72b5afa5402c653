// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command line and environment configuration.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser};
use planrec_core::{MatchConfig, RoomCounts, SearchStrategy, UserQuery};
use planrec_render::RenderOptions;

use crate::prompt::{parse_count, parse_dimension, Prompter};

/// Recommend a pre-authored floor plan for a plot size and room program.
///
/// Query values missing from the command line are asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "planrec", author, version, about, long_about = None)]
pub struct Args {
    /// Plan catalog (JSON array of plans)
    #[arg(long, env = "PLANREC_CATALOG", default_value = "plan_db_simple.json")]
    pub catalog: PathBuf,

    /// Candidate search: "exact" (whole catalog) or "clustered" (k-means group only)
    #[arg(long, env = "PLANREC_STRATEGY", default_value_t = SearchStrategy::Exact)]
    pub strategy: SearchStrategy,

    /// Seed for k-means initialisation
    #[arg(long, env = "PLANREC_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Upper bound on the number of k-means groups
    #[arg(long, env = "PLANREC_MAX_CLUSTERS", default_value_t = 4)]
    pub max_clusters: usize,

    /// Number of k-means restarts
    #[arg(long, env = "PLANREC_N_INIT", default_value_t = 10)]
    pub n_init: usize,

    #[command(flatten)]
    pub query: QueryArgs,

    /// SVG output path (default: <plan_id>.svg)
    #[arg(long, env = "PLANREC_SVG")]
    pub svg: Option<PathBuf>,

    /// Also write a PNG rendering
    #[arg(long, env = "PLANREC_PNG")]
    pub png: Option<PathBuf>,

    /// Drawing scale in pixels per meter
    #[arg(long, env = "PLANREC_SCALE", default_value_t = 50.0)]
    pub scale: f64,

    /// Print the match as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,

    /// Skip writing the diagram
    #[arg(long)]
    pub no_render: bool,
}

impl Args {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            strategy: self.strategy,
            max_clusters: self.max_clusters,
            n_init: self.n_init,
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            scale: self.scale,
            ..Default::default()
        }
    }
}

/// Plot size and room program
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Plot width in meters
    #[arg(long, env = "PLANREC_WIDTH", value_parser = parse_dimension)]
    pub width: Option<f64>,

    /// Plot height in meters
    #[arg(long, env = "PLANREC_HEIGHT", value_parser = parse_dimension)]
    pub height: Option<f64>,

    #[arg(long, env = "PLANREC_BEDROOMS", value_parser = parse_count)]
    pub bedrooms: Option<u32>,

    #[arg(long, env = "PLANREC_TOILETS", value_parser = parse_count)]
    pub toilets: Option<u32>,

    #[arg(long, env = "PLANREC_PARKING", value_parser = parse_count)]
    pub parking: Option<u32>,

    #[arg(long, env = "PLANREC_SITOUTS", value_parser = parse_count)]
    pub sitouts: Option<u32>,

    #[arg(long, env = "PLANREC_LIVING_ROOMS", value_parser = parse_count)]
    pub living_rooms: Option<u32>,

    #[arg(long, env = "PLANREC_KITCHENS", value_parser = parse_count)]
    pub kitchens: Option<u32>,

    #[arg(long, env = "PLANREC_DININGS", value_parser = parse_count)]
    pub dinings: Option<u32>,
}

impl QueryArgs {
    pub fn is_complete(&self) -> bool {
        self.width.is_some()
            && self.height.is_some()
            && self.count_slots().iter().all(|(_, v)| v.is_some())
    }

    /// Room counts in prompt order
    fn count_slots(&self) -> [(&'static str, Option<u32>); 7] {
        [
            ("Bedroom", self.bedrooms),
            ("Toilet", self.toilets),
            ("Parking", self.parking),
            ("Sitout", self.sitouts),
            ("Living Room", self.living_rooms),
            ("Kitchen", self.kitchens),
            ("Dining", self.dinings),
        ]
    }

    /// Print the banner, then prompt for every missing value on `output`
    pub fn read_interactive<R: BufRead, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> anyhow::Result<UserQuery> {
        let mut prompter = Prompter::new(input, output);
        prompter.say(&"=".repeat(50))?;
        prompter.say("HOUSE PLAN RECOMMENDATION SYSTEM")?;
        prompter.say(&"=".repeat(50))?;
        self.complete(&mut prompter)
    }

    /// Ask for every missing value, then build the query
    pub fn complete<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> anyhow::Result<UserQuery> {
        let mut filled = self.clone();

        if filled.width.is_none() {
            filled.width = Some(prompter.ask("Enter plot width (in meters): ", parse_dimension)?);
        }
        if filled.height.is_none() {
            filled.height = Some(prompter.ask("Enter plot height (in meters): ", parse_dimension)?);
        }

        if self.count_slots().iter().any(|(_, v)| v.is_none()) {
            prompter.say("\nEnter number of rooms needed:")?;
            prompter.say(&"-".repeat(50))?;
        }
        let mut counts = [0u32; 7];
        for (slot, (name, given)) in counts.iter_mut().zip(self.count_slots()) {
            *slot = match given {
                Some(v) => v,
                None => prompter.ask(&format!("{}: ", name), parse_count)?,
            };
        }
        let [bedroom, toilet, parking, sitout, living, kitchen, dining] = counts;
        filled.bedrooms = Some(bedroom);
        filled.toilets = Some(toilet);
        filled.parking = Some(parking);
        filled.sitouts = Some(sitout);
        filled.living_rooms = Some(living);
        filled.kitchens = Some(kitchen);
        filled.dinings = Some(dining);

        filled.to_query()
    }

    /// Build the query from fully specified values
    pub fn to_query(&self) -> anyhow::Result<UserQuery> {
        let missing = |name: &str| anyhow::anyhow!("missing query value: {}", name);
        let rooms = RoomCounts {
            parking: self.parking.ok_or_else(|| missing("parking"))?,
            sitout: self.sitouts.ok_or_else(|| missing("sitouts"))?,
            living_room: self.living_rooms.ok_or_else(|| missing("living rooms"))?,
            bedroom: self.bedrooms.ok_or_else(|| missing("bedrooms"))?,
            kitchen: self.kitchens.ok_or_else(|| missing("kitchens"))?,
            dining: self.dinings.ok_or_else(|| missing("dinings"))?,
            toilet: self.toilets.ok_or_else(|| missing("toilets"))?,
        };
        let width = self.width.ok_or_else(|| missing("width"))?;
        let height = self.height.ok_or_else(|| missing("height"))?;
        Ok(UserQuery::new(width, height, rooms)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_full_query_from_flags() {
        let args = Args::try_parse_from([
            "planrec",
            "--width", "12",
            "--height", "15",
            "--bedrooms", "2",
            "--toilets", "2",
            "--parking", "1",
            "--sitouts", "1",
            "--living-rooms", "1",
            "--kitchens", "1",
            "--dinings", "1",
            "--strategy", "clustered",
            "--seed", "7",
        ])
        .unwrap();

        assert!(args.query.is_complete());
        let query = args.query.to_query().unwrap();
        assert_eq!(
            query.uiiv().as_slice(),
            &[12.0, 15.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0]
        );

        let config = args.match_config();
        assert_eq!(config.strategy, SearchStrategy::Clustered);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_clusters, 4);
    }

    #[test]
    fn test_rejects_bad_flag_values() {
        assert!(Args::try_parse_from(["planrec", "--width", "-4"]).is_err());
        assert!(Args::try_parse_from(["planrec", "--bedrooms", "two"]).is_err());
        assert!(Args::try_parse_from(["planrec", "--strategy", "fuzzy"]).is_err());
    }

    #[test]
    fn test_prompts_only_for_missing_values() {
        let query_args = QueryArgs {
            width: Some(10.0),
            bedrooms: Some(3),
            toilets: Some(2),
            ..Default::default()
        };
        assert!(!query_args.is_complete());

        // height, then parking, sitout, living room, kitchen, dining
        let input = "x\n15\n1\n0\n1\n1\n-1\n1\n";
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let query = query_args.complete(&mut prompter).unwrap();
        assert_eq!(
            query.uiiv().as_slice(),
            &[10.0, 15.0, 1.0, 0.0, 1.0, 3.0, 1.0, 1.0, 2.0]
        );
    }

    #[test]
    fn test_interactive_output_goes_to_given_writer() {
        let query_args = QueryArgs {
            width: Some(10.0),
            height: Some(8.0),
            ..Default::default()
        };
        let mut output = Vec::new();
        let query = query_args
            .read_interactive(Cursor::new(b"2\n1\n1\n0\n1\n1\n1\n".to_vec()), &mut output)
            .unwrap();
        assert_eq!(
            query.uiiv().as_slice(),
            &[10.0, 8.0, 1.0, 0.0, 1.0, 2.0, 1.0, 1.0, 1.0]
        );

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with(&"=".repeat(50)));
        assert!(text.contains("HOUSE PLAN RECOMMENDATION SYSTEM"));
        assert!(text.contains("Bedroom: "));
        assert!(!text.contains("plot width"));
    }

    #[test]
    fn test_incomplete_query() {
        let err = QueryArgs::default().to_query().unwrap_err();
        assert!(err.to_string().starts_with("missing query value"));
    }
}

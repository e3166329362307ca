use clap::{Args, Parser, Subcommand};

use crate::types::WorkoutType;

#[derive(Parser)]
#[command(name = "ferrum", version, about = "CLI workout log")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Session-scoped commands
    #[command(subcommand, visible_alias = "s")]
    Session(SessionCmd),

    /// Template management
    #[command(subcommand, visible_alias = "t")]
    Template(TemplateCmd),

    /// Show all personal records
    #[command(visible_alias = "pr")]
    Records,

    /// Show progression for an exercise or custom metric
    #[command(visible_alias = "prog")]
    Progress(ProgressArgs),

    /// Browse completed sessions
    #[command(subcommand, visible_alias = "h")]
    History(HistoryCmd),

    /// Show the weekly training dashboard
    #[command(visible_alias = "d")]
    Dashboard,

    /// View or edit ferrum config
    #[command(subcommand)]
    Config(ConfigCmd),
}

//
// Commands
//

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Start a session
    #[command(visible_alias = "s")]
    Start(StartArgs),

    /// Show current session details
    #[command(visible_alias = "i")]
    Show,

    /// Add an exercise to the current session
    #[command(visible_alias = "a")]
    Add {
        /// Exercise name
        exercise: String,
    },

    /// Remove an exercise from the current session
    #[command(visible_alias = "rm")]
    Remove {
        /// Exercise position (from `session show`) or name
        exercise: String,
    },

    /// Log a strength set - Usage: session set EXERCISE WEIGHT REPS
    #[command(override_usage = "session set <EXERCISE> <WEIGHT> <REPS>")]
    Set {
        /// Exercise position (from `session show`) or name
        #[arg(value_name = "EXERCISE")]
        exercise: String,

        /// Weight in kg (use "bw" for bodyweight work)
        #[arg(value_name = "WEIGHT")]
        weight: String,

        /// Number of reps
        #[arg(value_name = "REPS")]
        reps: i64,

        /// Specific set number to overwrite (defaults to appending)
        #[arg(long, short = 's')]
        set: Option<i64>,

        /// Record the set as skipped instead of completed
        #[arg(long)]
        skipped: bool,
    },

    /// Log cardio work for an exercise in the current session
    Cardio {
        /// Exercise position (from `session show`) or name
        exercise: String,

        /// Distance in km
        #[arg(short, long)]
        distance: Option<f64>,

        /// Hours part of the duration
        #[arg(long, default_value = "0")]
        hours: i64,

        /// Minutes part of the duration
        #[arg(short, long, default_value = "0")]
        mins: i64,

        /// Seconds part of the duration
        #[arg(short, long, default_value = "0")]
        secs: i64,
    },

    /// Log a custom metric value for an exercise in the current session
    Metric {
        /// Exercise position (from `session show`) or name
        exercise: String,

        /// Metric name, e.g. "laps"
        name: String,

        /// Measured value
        value: f64,

        /// Unit label stored alongside the value
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// Complete the current session and refresh personal records
    #[command(visible_alias = "d")]
    Done,

    /// Cancel the current session, discarding its logs
    #[command(visible_alias = "c")]
    Cancel,

    /// Delete a completed session
    Delete {
        /// Session index (from `history list`) or id
        session: String,
    },
}

#[derive(Args)]
pub struct StartArgs {
    /// Session name (defaults to the template name, or "Workout")
    pub name: Option<String>,

    /// Template index (from `template list`) or name to start from
    #[arg(short, long)]
    pub template: Option<String>,

    /// Session kind when starting without a template
    #[arg(short, long, value_enum, default_value_t = WorkoutType::Gym)]
    pub kind: WorkoutType,

    /// Free-form note attached to the session
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum TemplateCmd {
    /// Import one or more templates from TOML files
    #[command(visible_alias = "i")]
    Import { files: Vec<String> },

    /// List templates
    #[command(visible_alias = "l")]
    List,

    /// Show a single template in detail
    #[command(visible_alias = "s")]
    Show {
        /// Template index (from `t list`) or exact name
        template: String,
    },

    /// Delete a template
    #[command(visible_alias = "d")]
    Delete {
        /// Template index (from `t list`) or exact name
        template: String,
    },
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Exercise name (or metric name with --metric)
    pub name: String,

    /// Treat the name as a cardio exercise
    #[arg(long)]
    pub cardio: bool,

    /// Treat the name as a custom metric
    #[arg(long)]
    pub metric: bool,

    /// Time period in weeks (defaults to 12)
    #[arg(short, long, default_value = "12")]
    pub weeks: u32,

    /// Show an ASCII graph instead of the table
    #[arg(short, long)]
    pub graph: bool,

    /// Render the graph to a PNG file at this path
    #[arg(long, value_name = "FILE")]
    pub png: Option<String>,
}

#[derive(Subcommand)]
pub enum HistoryCmd {
    /// List completed sessions, newest first
    #[command(visible_alias = "l")]
    List {
        /// Maximum number of sessions to list
        #[arg(short, long, default_value = "50")]
        limit: i64,

        /// Only show sessions of this kind
        #[arg(short, long, value_enum)]
        kind: Option<WorkoutType>,
    },

    /// Show one completed session in detail
    #[command(visible_alias = "s")]
    Show {
        /// Session index (from `history list`) or id
        session: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

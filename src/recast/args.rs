use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recast")]
#[command(about = "Project JSON records into keyed maps and tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding recast.json (defaults to the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON file with an array or object of records ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub input: String,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Key accessor: a field, a method like "getId()", or __key/__value/__position
    #[arg(short, long, default_value = "__key")]
    pub key: String,

    /// Value accessor
    #[arg(short = 'V', long, default_value = "__value")]
    pub value: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every computed key/value pair
    Map {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Look up one key
    Get {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        extract: ExtractArgs,

        /// The key to find (matched loosely, so 1 finds "1")
        lookup: String,
    },

    /// Count records
    Count {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Render records as a table with sort links
    Table {
        #[command(flatten)]
        input: InputArgs,

        /// Columns as "accessor" or "accessor=Title"
        #[arg(short, long = "column", required = true, num_args = 1..)]
        columns: Vec<String>,

        /// Declared sort as "column:direction"
        #[arg(short, long)]
        sort: Vec<String>,

        /// Request path used for sort links
        #[arg(long)]
        path: Option<String>,

        /// Request query string used for sort links (e.g. "page=2&sort=name")
        #[arg(long, default_value = "")]
        query: String,

        /// Explicit item class for css hints
        #[arg(long)]
        item_class: Option<String>,
    },
}

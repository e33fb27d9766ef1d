use crate::domain::model::CarFields;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "dealer-listings")]
#[command(about = "Manage a car dealership's listings")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Directory holding the listing slot")]
    pub data_dir: Option<String>,

    #[arg(long, global = true, help = "Name of the storage slot")]
    pub slot: Option<String>,

    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new listing
    Add(AddArgs),

    /// Delete a listing by plate or by its row in the listing table
    Delete {
        #[arg(long, conflicts_with = "row", required_unless_present = "row")]
        plate: Option<String>,

        /// 1-based row as shown by `list` (with the same --discounted flag)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        row: Option<u32>,

        #[arg(long, requires = "row")]
        discounted: bool,
    },

    /// Find a listing by license plate
    Search { plate: String },

    /// Show all listings
    List {
        /// Only cars older than ten years, with their discounted price
        #[arg(long)]
        discounted: bool,
    },

    /// Show the makers we sell, or the models of one maker
    Makers { maker: Option<String> },
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub plate: String,

    #[arg(long)]
    pub maker: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub year: String,

    #[arg(long)]
    pub color: String,

    #[arg(long)]
    pub price: String,
}

impl From<AddArgs> for CarFields {
    fn from(args: AddArgs) -> Self {
        Self {
            license_plate: args.plate,
            maker: args.maker,
            model: args.model,
            owner: args.owner,
            year: args.year,
            color: args.color,
            price: args.price,
        }
    }
}

//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod add;
pub mod delete;
pub mod empty;
pub mod list;
pub mod relocate;
pub mod search;
pub mod update;
pub mod update_embeddings;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Add(args) => add::run(ctx, args),
        Commands::Delete(args) => delete::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Move(args) => relocate::run(ctx, args),
        Commands::Update(args) => update::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Empty(args) => empty::run(ctx, args),
        Commands::UpdateEmbeddings(args) => update_embeddings::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a location, and optionally a part stored there
    Add(add::AddArgs),

    /// Delete a location or a part
    Delete(delete::DeleteArgs),

    /// List parts, or locations with --locations
    List(list::ListArgs),

    /// Move a part to another location
    Move(relocate::MoveArgs),

    /// Change the description of a part and re-embed it
    Update(update::UpdateArgs),

    /// Search parts by description
    Search(search::SearchArgs),

    /// Show the nearest empty locations around a location
    Empty(empty::EmptyArgs),

    /// Recompute embeddings for all parts
    #[command(alias = "update_embeddings")]
    UpdateEmbeddings(update_embeddings::UpdateEmbeddingsArgs),
}

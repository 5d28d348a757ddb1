use std::sync::Arc;

use anyhow::Context;
use cinefav_client::api::{DEFAULT_API_URL, HttpMoviesApi, MoviesApi};
use cinefav_client::screen::{FavoritesScreen, SearchScreen};
use cinefav_client::session::MemorySessionStorage;
use cinefav_client::{FavoritesUnit, SearchUnit};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cinefav", about = "Search movies and manage favorites")]
struct Cli {
    /// Versioned API root of the cinefav server.
    #[arg(long, env = "CINEFAV_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search movies by title.
    Search {
        query: String,
        /// Number of result pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List favorite movies.
    Favorites,
    /// Add a movie to favorites by IMDb id.
    Add { imdb_id: String },
    /// Remove a movie from favorites by IMDb id.
    Remove { imdb_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api: Arc<dyn MoviesApi> =
        Arc::new(HttpMoviesApi::new(&cli.api_url).context("invalid --api-url")?);
    let favorites = FavoritesUnit::new(api.clone());

    match cli.command {
        Command::Search { query, pages } => {
            favorites.load().await;
            let screen = SearchScreen::new(
                SearchUnit::new(api),
                favorites,
                Arc::new(MemorySessionStorage::new()),
            );
            let mut view = screen.submit(&query).await;
            for _ in 1..pages {
                if !screen.on_sentinel(1.0).await.context("failed to load more results")? {
                    break;
                }
                view = screen.render().await;
            }
            println!("{view}");
        }
        Command::Favorites => {
            println!("{}", FavoritesScreen::new(favorites).open().await);
        }
        Command::Add { imdb_id } => {
            let movie = favorites
                .add(&imdb_id)
                .await
                .with_context(|| format!("failed to add {imdb_id}"))?;
            println!("Added {} ({})", movie.summary.title, movie.summary.year);
        }
        Command::Remove { imdb_id } => {
            let outcome = favorites
                .remove(&imdb_id)
                .await
                .with_context(|| format!("failed to remove {imdb_id}"))?;
            println!("{}", outcome.message);
        }
    }

    Ok(())
}

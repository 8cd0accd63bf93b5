// SPDX-License-Identifier: AGPL-3.0
// Art Catalog CLI - Command-line frontend
//
// Each command is one "view": views that show favorite status synchronize
// with durable storage before rendering.

mod render;

use art_catalog_core::{
    AppError, AppSettings, CatalogClient, FavoritesStore, FileStorage, Item, ItemId,
    KeyValueStorage, MemoryStorage, SettingsStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "art-catalog", version, about = "Browse art supplies and keep favorites")]
struct Cli {
    /// Catalog endpoint (overrides settings and ART_CATALOG_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Directory holding durable favorites
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep favorites in memory only
    #[arg(long, global = true, conflicts_with = "data_dir")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the whole catalog
    List,
    /// Show one item's details
    Show {
        /// Item id
        id: String,
    },
    /// List favorited items
    Favorites,
    /// Add or remove an item from favorites
    Toggle {
        /// Item id
        id: String,
    },
    /// Remove every favorite
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("art_catalog_cli=info,art_catalog_core=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting Art Catalog CLI v{}", env!("CARGO_PKG_VERSION"));

    let settings = settings_or_default(SettingsStore::new())
        .with_env_overrides()
        .with_overrides(cli.url.clone(), cli.data_dir.clone());
    let client = CatalogClient::new(&settings)?;

    if cli.ephemeral {
        return run(cli.command, &client, MemoryStorage::new()).await;
    }

    let storage = match settings.data_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::in_default_dir()?,
    };
    tracing::debug!("Favorites stored in {:?}", storage.dir());
    run(cli.command, &client, storage).await
}

/// Settings from disk, or defaults when the settings file is unusable
fn settings_or_default(store: Result<SettingsStore, AppError>) -> AppSettings {
    match store {
        Ok(store) => store.get().clone(),
        Err(e) => {
            tracing::warn!("Settings unavailable, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

/// The stored copy of a favorite, so removal works offline or after the
/// catalog dropped the item; only additions go to the catalog.
async fn toggle_target<S: KeyValueStorage>(
    favorites: &FavoritesStore<S>,
    client: &CatalogClient,
    id: ItemId,
) -> Result<Item, AppError> {
    match favorites.favorites().await.get(&id) {
        Some(stored) => Ok(stored.clone()),
        None => client.get_item(&id).await,
    }
}

async fn run<S: KeyValueStorage>(
    command: Commands,
    client: &CatalogClient,
    storage: S,
) -> anyhow::Result<()> {
    let favorites = FavoritesStore::new(storage);

    match command {
        Commands::List => {
            let items = client.list_items().await?;
            favorites.synchronize().await?;
            for item in &items {
                let favorited = favorites.is_favorite(&item.id).await;
                println!("{}", render::list_row(item, favorited));
            }
        }
        Commands::Show { id } => {
            let item = client.get_item(&ItemId::from(id)).await?;
            favorites.synchronize().await?;
            let favorited = favorites.is_favorite(&item.id).await;
            println!("{}", render::detail(&item, favorited));
        }
        Commands::Favorites => {
            let set = favorites.synchronize().await?;
            if set.is_empty() {
                println!("No favorites yet!");
            }
            for item in set.iter() {
                println!("{}", render::list_row(item, true));
            }
        }
        Commands::Toggle { id } => {
            favorites.synchronize().await?;
            let item = toggle_target(&favorites, client, ItemId::from(id)).await?;
            let set = favorites.toggle(&item).await?;
            let verb = if set.contains(&item.id) { "Added" } else { "Removed" };
            println!("{} {} ({} favorites)", verb, item.name, set.len());
        }
        Commands::Clear => {
            favorites.clear().await?;
            println!("Favorites cleared");
        }
    }

    Ok(())
}

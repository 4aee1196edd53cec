//! Command line interface: index, search and clear a collection.

use crate::collection::Collection;
use crate::config::CollectionConfig;
use crate::error::Result;
use crate::store::RedisStore;
use crate::types::Document;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const DEFAULT_URL: &str = "redis://127.0.0.1:6379/0";

#[derive(Parser)]
#[command(name = "redsearch")]
#[command(about = "Index and search JSON documents in Redis", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index documents from a file containing a JSON array.
    Index {
        /// Collection config file (JSON).
        config: PathBuf,
        /// File containing a JSON array of documents.
        docs: PathBuf,
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
        #[arg(short, long, default_value = "1000")]
        batch_size: usize,
    },
    /// Run a query expression and print matching document ids.
    Search {
        config: PathBuf,
        query: String,
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// Delete every key belonging to the collection.
    Clear {
        config: PathBuf,
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Index {
            config,
            docs,
            url,
            batch_size,
        } => {
            let col = open_collection(&config, &url).await?;
            let raw = std::fs::read_to_string(&docs)
                .with_context(|| format!("reading {}", docs.display()))?;
            let docs: Vec<Document> = serde_json::from_str(&raw)
                .context("documents file must be a JSON array of objects")?;
            let count = col.index_documents(&docs, batch_size).await?;
            println!("indexed {count} documents into '{}'", col.name());
        }
        Commands::Search { config, query, url } => {
            let col = open_collection(&config, &url).await?;
            let mut ids: Vec<String> = col.search_str(&query).await?.into_iter().collect();
            ids.sort();
            for id in &ids {
                println!("{id}");
            }
            eprintln!("{} matching documents", ids.len());
        }
        Commands::Clear { config, url } => {
            let col = open_collection(&config, &url).await?;
            let deleted = col.clear().await?;
            println!("deleted {deleted} keys for collection '{}'", col.name());
        }
    }
    Ok(())
}

async fn open_collection(config: &Path, url: &str) -> Result<Collection<RedisStore>> {
    let raw = std::fs::read_to_string(config)
        .with_context(|| format!("reading {}", config.display()))?;
    let cfg: CollectionConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing collection config {}", config.display()))?;
    let store = RedisStore::connect(url)
        .await
        .with_context(|| format!("connecting to {url}"))?;
    Collection::new(store, cfg)
}

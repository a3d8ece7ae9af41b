//! Todolist - server-rendered to-do lists

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todolist::{
    config::{Args, StoreKind},
    db::MongoClient,
    lists::{MemoryTodoStore, MongoTodoStore, TodoStore},
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("todolist={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Todolist");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("Store: {}", args.store.as_str());
    if args.store == StoreKind::Mongo {
        info!("MongoDB: {} (db: {})", args.mongodb_uri, args.mongodb_db);
    }
    info!("Default list: {}", args.default_list);
    info!("======================================");

    let store = open_store(&args).await;
    let state = Arc::new(AppState::new(args, store));

    server::run(state).await?;

    Ok(())
}

/// Open the configured store. In dev mode an unreachable MongoDB falls back to memory.
async fn open_store(args: &Args) -> Arc<dyn TodoStore> {
    if args.store == StoreKind::Memory {
        return Arc::new(MemoryTodoStore::new());
    }

    let opened = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => MongoTodoStore::new(&client).await,
        Err(e) => Err(e),
    };

    match opened {
        Ok(store) => {
            info!("MongoDB connected successfully");
            Arc::new(store)
        }
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB unavailable (dev mode, using memory store): {}", e);
                Arc::new(MemoryTodoStore::new())
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}

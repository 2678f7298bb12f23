//! Farm Market Server - storefront backend for local farm produce
//!
//! # Architecture
//!
//! - **Session** (`session`): identity registration, login, current identity
//! - **Catalog** (`catalog`): seeded product listings, search and filters
//! - **Cart** (`cart`): line items with split-by-seller checkout
//! - **Orders** (`orders`): order book, status advancement, event push
//! - **Database** (`db`): embedded redb key-value storage
//! - **HTTP API** (`api`): RESTful API surface
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # Config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── session/       # Identity and login state
//! ├── catalog/       # Product listings
//! ├── cart/          # Cart engine
//! ├── orders/        # Order book and events
//! ├── db/            # Storage layer
//! └── utils/         # Logging
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod core;
pub mod db;
pub mod orders;
pub mod session;
pub mod utils;

pub use cart::CartEngine;
pub use catalog::Catalog;
pub use core::{Config, Server, ServerState};
pub use db::MarketStorage;
pub use orders::OrderBook;
pub use session::SessionStore;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ______
   / ____/___ _________ ___
  / /_  / __ `/ ___/ __ `__ \
 / __/ / /_/ / /  / / / / / /
/_/    \__,_/_/  /_/ /_/ /_/
    __  ___           __        __
   /  |/  /___ ______/ /_____  / /_
  / /|_/ / __ `/ ___/ //_/ _ \/ __/
 / /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}

//! # VF-02 Update Channel
//!
//! Receives rule changes from the SDN controller over TCP, applies them
//! through the verifier and answers with the verdict.
//!
//! ## Architecture
//!
//! - **Protocol** (`protocol`): strict command grammar (`Command`) and reply
//!   rendering (`Response`)
//! - **Ports** (`ports`): `CommandDispatcher`, the driving port the server calls
//! - **Handler** (`handler`): `CommandHandler`, routes mutations through the
//!   queue and serves queries from the read lock
//! - **Queue** (`queue`): `MutationQueue`, bounded channel into one writer
//! - **Server** (`server`): `UpdateServer`, accept loop with a bounded
//!   connection pool
//!
//! ## Concurrency
//!
//! Connections are served concurrently, up to `max_connections`. Every
//! mutation is funnelled to a single writer, so mutate + re-verify never
//! interleave. There are no timeouts: a slow verification delays every
//! queued mutation behind it.
//!
//! ## Usage Example
//!
//! ```ignore
//! let service: Arc<dyn VerifierApi> = Arc::new(VerifierService::new(network));
//! let (queue, writer) = MutationQueue::spawn(service.clone(), config.queue_capacity);
//! let server = UpdateServer::new(config, Arc::new(CommandHandler::new(service, queue)));
//! let listener = server.bind().await?;
//! server.run(listener, shutdown_rx).await?;
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod ports;
pub mod protocol;
pub mod queue;
pub mod server;

pub use config::ChannelConfig;
pub use error::{ChannelError, CommandError};
pub use handler::CommandHandler;
pub use ports::CommandDispatcher;
pub use protocol::{parse_command, Command, Response, CONTROLLER_TAG, RESPONSE_TAG};
pub use queue::{Mutation, MutationQueue};
pub use server::UpdateServer;

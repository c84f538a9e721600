//! Library surface for pulsedeck: the sync core plus the terminal UI.

pub mod app;
pub mod client;
pub mod credential;
pub mod error;
pub mod logging;
pub mod panels;
pub mod profiles;
pub mod router;
pub mod scheduler;
pub mod tree;
pub mod types;
pub mod ui;
pub mod viewer;

pub use app::App;
pub use client::RemoteClient;
pub use credential::CredentialStore;
pub use error::Failure;

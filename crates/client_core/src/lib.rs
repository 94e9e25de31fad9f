pub mod config;
pub mod contribution;
pub mod error;
mod list_controller;
pub mod page;
pub mod scroll;
pub mod transport;

pub use config::{load_settings, Resource, Settings};
pub use error::ListError;
pub use list_controller::{
    FetchOutcome, ListController, ListEvent, ListOptions, ListSnapshot, ViewState,
    DEFAULT_LOAD_FALLBACK, DEFAULT_MUTATE_FALLBACK,
};
pub use scroll::ScrollPosition;
pub use transport::{HttpListTransport, ListTransport};

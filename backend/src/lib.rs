pub mod catchers;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod registry;
pub mod routes;
pub use shared::{models::*, error::*, vote_logic::*};

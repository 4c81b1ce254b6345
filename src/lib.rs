#![deny(missing_docs)]

//! This crate runs a small directory of users over HTTP.
//!
//! Users register with a unique name, optionally as admins.
//! A registered user may then search for other users by the start of their name,
//! or connect to another user by name.
//! Connections are recorded on both users.
//!
//! Admins may list every user in the directory, including their connections.
//!
//! The directory itself ([`directory::UserDirectory`]) does not know about HTTP.
//! It talks to storage through the [`repository::UserRepository`] trait,
//! which [`store::UserStore`] implements in memory with an optional snapshot file.

/// Users and their identifiers.
pub mod user;

/// The storage interface the directory depends on.
pub mod repository;

/// In-memory user storage, optionally persisted to a file.
pub mod store;

/// The user directory service: register, search, connect and list.
pub mod directory;

/// Possible errors in this library.
pub mod error;

/// The JSON envelope every HTTP response is wrapped in.
pub mod response;

/// HTTP handlers.
pub(crate) mod routes;

/// Code relating to setting up the server which routes requests to the directory.
pub mod server;

/// Relates to config files.
pub mod config;

/// The command line interface.
pub mod cli;

/// Logging/tracing setup.
pub mod logging;

use std::{io, net::SocketAddr};

use orchest_core::blueprint::RouteConflict;
use sea_orm::DbErr;
use thiserror::Error;

use crate::config::LoadError;

/// Everything that can stop the process from starting. None of these are
/// recovered from.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] LoadError),

    #[error("route registration failed: {0}")]
    Routes(#[from] RouteConflict),

    #[error("configuration must be loaded before {0}")]
    NotConfigured(&'static str),

    #[error("no persistence extension is attached to the application")]
    ExtensionMissing,

    #[error("the application context belongs to another application")]
    ForeignContext,

    #[error("failed to connect to the database")]
    Connect(#[source] DbErr),

    #[error("failed to create the database schema")]
    Schema(#[source] DbErr),

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server terminated")]
    Serve(#[source] io::Error),
}

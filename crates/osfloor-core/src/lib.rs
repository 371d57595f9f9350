//! # osfloor Core Library
//!
//! Keeps one MDM device compliance policy's minimum OS version in step with
//! the newest Apple release announced on the public developer releases feed.
//! All behaviour lives here; the `osfloor` binary is a thin CLI over it.
//!
//! ## Architecture
//!
//! - **Policies**: list and patch compliance policies through the management API
//! - **Feed**: download, sanitize and parse the release RSS feed, then filter titles
//! - **Sync**: the linear workflow tying both together, with no-op suppression
//! - **Config / Auth**: TOML configuration and bearer token sources
//!
//! ## Key Components
//!
//! - [`PolicyClient`]: compliance policy fetch and update
//! - [`ReleaseFeedReader`]: newest matching release announcement
//! - [`run_sync`]: one sync run producing a [`SyncReport`]
//! - [`Config`]: configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod json;
pub mod policy;
pub mod sync;
pub mod version;

pub use auth::{KeyringToken, StaticToken, TokenSource};
pub use config::Config;
pub use error::{ApiError, AuthError, ConfigError, CoreError, FeedError, ValidationError};
pub use feed::{ReleaseAnnouncement, ReleaseFeedReader, TitleFilter};
pub use policy::{CompliancePolicy, Platform, PolicyClient, UpdatePayload};
pub use sync::{run_sync, SyncOutcome, SyncReport, SyncSettings};

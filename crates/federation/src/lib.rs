//! `ActivityPub` federation for fedigram.
//!
//! This crate computes what the federation layer needs about profiles:
//!
//! - **URLs**: actor, inbox, outbox and key URLs for local and remote profiles
//! - **Audience**: `to`/`cc` addressing and shared-inbox fan-out targets
//! - **Actors**: Person documents for local profiles
//! - **Handlers**: actor, followers collection and `WebFinger` endpoints
//!
//! Signing and delivering activities is left to a separate delivery layer.

pub mod actor;
pub mod audience;
pub mod handler;
pub mod urls;

pub use actor::{ApEndpoints, ApImage, ApPerson, ApPublicKey, to_ap_person};
pub use audience::{Audience, PUBLIC_COLLECTION, Scope, audience, default_scope, fanout_inboxes};
pub use handler::{FederationState, router};
pub use urls::{ProfileUrls, UrlConfig};

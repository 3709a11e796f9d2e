//! Finds fanfiction links in chat messages and renders summaries of the
//! works and series behind them.
//!
//! The entrypoint is [`Abstractor`]: [`summarize`](Abstractor::summarize)
//! handles a message, [`react`](Abstractor::react) handles a numbered
//! reaction to an earlier series summary. Everything below it is usable on
//! its own:
//!
//! - [`LinkScanner`] proposes candidate links,
//! - [`GlobalParser`] routes them to the [`SiteParser`]s,
//! - each parser keeps a [`ParsedCache`] of [`Entity`]s for the message,
//! - [`render`] turns an entity into chat text.

mod assembler;
mod cache;
mod context;
mod entity;
pub mod error;
mod links;
mod reaction;
mod registry;
mod render;
pub mod site;
#[cfg(test)]
mod test_support;

pub use crate::assembler::{Abstractor, DEFAULT_MAX_LINKS};
pub use crate::cache::{ParsedCache, ParsedEntry};
pub use crate::context::Context;
pub use crate::entity::{Entity, LinkMatch, SeriesEntity};
pub use crate::links::LinkScanner;
pub use crate::reaction::{MAX_REACTION, resolve_reaction, series_id};
pub use crate::registry::GlobalParser;
pub use crate::render::{render, render_series, render_work};
pub use crate::site::SiteParser;

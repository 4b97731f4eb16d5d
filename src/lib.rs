//! discord-relay — one-way mirroring of a Discord channel.
//!
//! Watches a single source channel and republishes every message posted
//! there (text, attachments, embeds) into a target channel. The relay core
//! ([`relay`]) is platform-agnostic plain data plus a few traits; the
//! serenity adapter lives in [`discord`].
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod logging;

pub mod discord;
pub mod relay;

// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Deal Market Protocol: Core Library
//!
//! The records a storage client and a storage provider exchange when making
//! a deal, and the one piece of real decision logic they share: working out
//! which host a data transfer will contact, given either a plain URL or a
//! multiaddr-based `libp2p://` URL.
//!
//! ## Architecture
//!
//! - **address**: Multiaddr-style protocol stacks and their resolution to a
//!   canonical `{scheme, host, path}`.
//! - **transfer**: The transfer descriptor embedded in deal params, its
//!   opaque params blob, and host derivation.
//! - **deal**: Proposals, asks, status queries, the status responder and
//!   the collaborator traits for everything stateful.
//! - **config**: Protocol IDs and constants.
//!
//! ## Ground Rules
//!
//! 1. Decoding and resolution never do I/O. No DNS, no sockets.
//! 2. Every failure is scoped to one deal or one request and surfaces as a
//!    typed error or a protocol-level error field.
//! 3. Anything that talks to the chain, the sealer or the index is a trait.

pub mod address;
pub mod config;
pub mod deal;
pub mod transfer;

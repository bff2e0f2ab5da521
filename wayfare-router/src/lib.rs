//! Route sequencing for itinerary days.
//!
//! This crate provides [`NearestNeighbourSequencer`], the default
//! implementation of the [`RouteSequencer`](wayfare_core::RouteSequencer)
//! trait. It builds a greedy nearest-neighbour tour from the day's entry point
//! and, for days with many stops, refines it with 2-opt segment reversals.
//! Stops without coordinates never move relative to each other and are
//! appended after the sequenced stops.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod sequencer;
mod two_opt;

pub use sequencer::{NearestNeighbourSequencer, SequencerConfig};

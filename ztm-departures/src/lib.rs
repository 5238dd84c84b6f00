//! Departure board server for Warsaw public transport.
//!
//! A web application that answers: "which of my buses or trams leaves
//! this stop soonest?"

pub mod board;
pub mod cache;
pub mod config;
pub mod domain;
pub mod web;
pub mod ztm;

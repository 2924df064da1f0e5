//! # rf-reels — Reel spin lifecycle engine
//!
//! Owns the reels of a slot mini-game and drives one spin at a time:
//! staggered reel stops with a back-out settle, texture recycling as symbols
//! scroll past the wrap boundary, an outcome-fixing override for demos, and
//! extraction of the visible result grid once every reel has landed.
//!
//! ## Architecture
//!
//! ```text
//! CashBalance ──broke──> LockState ──> press_spin()
//!                                         │
//! FixerService ──settings──> OverrideSlots │ (pending / active)
//!                                 │        v
//!                                 └──> SpinController ──tween_to──> TweenEngine
//!                                          │  ^                        │
//!                                          │  └────── TweenStep ───────┘
//!                                          v
//!                              update_reels_on_spin (per frame)
//!                                          │
//!                                          v
//!                                ResultGrid ──> ResultSink
//! ```
//!
//! Rendering, prize evaluation and UI chrome live outside this crate.

pub mod balance;
pub mod config;
pub mod controller;
pub mod error;
pub mod fixer;
pub mod lock;
pub mod reel;
pub mod result;
pub mod symbols;
pub mod timing;

pub use balance::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use fixer::*;
pub use lock::*;
pub use reel::*;
pub use result::*;
pub use symbols::*;
pub use timing::*;

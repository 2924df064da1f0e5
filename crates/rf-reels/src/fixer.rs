//! Outcome fixing: forcing chosen symbols into chosen cells
//!
//! A debug/demo override, not a regulated RNG. The [`FixerService`] is the
//! store an external trusted caller writes to; [`OverrideSlots`] is the
//! controller's view of it, which only changes between spins.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ReelError;
use crate::reel::VISIBLE_ROWS;

/// Force one cell to a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSymbol {
    pub reel_index: i32,
    pub row: i32,
    /// `None` leaves the cell random
    #[serde(default)]
    pub forced_symbol: Option<String>,
}

impl FixedSymbol {
    pub fn new(reel_index: i32, row: i32, symbol: impl Into<String>) -> Self {
        Self {
            reel_index,
            row,
            forced_symbol: Some(symbol.into()),
        }
    }

    /// Entry that names a cell but forces nothing
    pub fn unforced(reel_index: i32, row: i32) -> Self {
        Self {
            reel_index,
            row,
            forced_symbol: None,
        }
    }
}

impl fmt::Display for FixedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.reel_index,
            self.row,
            self.forced_symbol.as_deref().unwrap_or("")
        )
    }
}

/// Parses `reel:row:SYMBOL`; an empty or missing symbol means unforced.
impl FromStr for FixedSymbol {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let invalid = || ReelError::InvalidOverride(format!("expected reel:row:SYMBOL, got '{s}'"));

        let reel_index = parts
            .next()
            .and_then(|p| p.trim().parse::<i32>().ok())
            .ok_or_else(invalid)?;
        let row = parts
            .next()
            .and_then(|p| p.trim().parse::<i32>().ok())
            .ok_or_else(invalid)?;
        let forced_symbol = parts
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            reel_index,
            row,
            forced_symbol,
        })
    }
}

/// A full outcome-fixing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixerSettings {
    pub entries: Vec<FixedSymbol>,
}

impl FixerSettings {
    pub fn new(entries: Vec<FixedSymbol>) -> Self {
        Self { entries }
    }

    /// First entry addressing the cell
    pub fn find(&self, reel_index: usize, row: i32) -> Option<&FixedSymbol> {
        self.entries
            .iter()
            .find(|e| usize::try_from(e.reel_index).ok() == Some(reel_index) && e.row == row)
    }

    /// Forced symbol for a visible cell, if any
    pub fn forced_symbol(&self, reel_index: usize, row: i32) -> Option<&str> {
        if row < 0 || row as usize >= VISIBLE_ROWS {
            return None;
        }
        self.find(reel_index, row)
            .and_then(|e| e.forced_symbol.as_deref())
    }

    /// Symbols named by entries, in order
    pub fn forced_symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.forced_symbol.as_deref())
    }
}

struct FixerInner {
    settings: Option<FixerSettings>,
    subscribers: Vec<Sender<Option<FixerSettings>>>,
}

/// Shared override store broadcasting every change to its subscribers
#[derive(Clone)]
pub struct FixerService {
    inner: Arc<RwLock<FixerInner>>,
}

impl FixerService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(FixerInner {
                settings: None,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current settings
    pub fn settings(&self) -> Option<FixerSettings> {
        self.inner.read().settings.clone()
    }

    /// Replace the settings; `None` returns every cell to random symbols
    pub fn set_settings(&self, settings: Option<FixerSettings>) {
        let mut inner = self.inner.write();
        inner.settings = settings;
        let current = inner.settings.clone();
        inner
            .subscribers
            .retain(|tx| tx.send(current.clone()).is_ok());
    }

    /// Receive the current settings now and every change after
    pub fn subscribe(&self) -> Receiver<Option<FixerSettings>> {
        let (tx, rx) = unbounded();
        let mut inner = self.inner.write();
        // Receiver is alive, send cannot fail
        let _ = tx.send(inner.settings.clone());
        inner.subscribers.push(tx);
        rx
    }
}

impl Default for FixerService {
    fn default() -> Self {
        Self::new()
    }
}

/// Pending and active override settings.
///
/// Updates land in `pending`; only [`OverrideSlots::commit`] moves them to
/// `active`, and the controller commits only while no spin is running.
#[derive(Debug, Clone, Default)]
pub struct OverrideSlots {
    pending: Option<Option<FixerSettings>>,
    active: Option<FixerSettings>,
}

impl OverrideSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer an update, replacing any earlier uncommitted one
    pub fn receive(&mut self, update: Option<FixerSettings>) {
        self.pending = Some(update);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Promote the pending update. Returns true if `active` changed.
    pub fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(next) if next != self.active => {
                self.active = next;
                true
            }
            _ => false,
        }
    }

    pub fn active(&self) -> Option<&FixerSettings> {
        self.active.as_ref()
    }

    pub fn forced_symbol(&self, reel_index: usize, row: i32) -> Option<&str> {
        self.active
            .as_ref()
            .and_then(|s| s.forced_symbol(reel_index, row))
    }
}

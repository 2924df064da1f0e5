//! Cash balance and the balance gate the controller consults

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Starting cash for a new session
pub const DEFAULT_CASH: i64 = 10;

/// Funds check and stake collection used by the spin controller
pub trait BalanceGate {
    /// Receive the current broke flag now and again after every balance change
    fn subscribe_broke(&self) -> Receiver<bool>;

    /// Collect a stake
    fn decrease_cash(&self, amount: i64);
}

/// A prize paid out after a spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub name: String,
    pub amount: i64,
}

impl Prize {
    pub fn new(name: impl Into<String>, amount: i64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

struct BalanceInner {
    cash: i64,
    broke_subscribers: Vec<Sender<bool>>,
}

impl BalanceInner {
    fn is_broke(&self) -> bool {
        self.cash <= 0
    }

    fn publish(&mut self) {
        let broke = self.is_broke();
        self.broke_subscribers.retain(|tx| tx.send(broke).is_ok());
    }
}

/// Shared cash balance
#[derive(Clone)]
pub struct CashBalance {
    inner: Arc<RwLock<BalanceInner>>,
}

impl CashBalance {
    pub fn new(cash: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(BalanceInner {
                cash,
                broke_subscribers: Vec::new(),
            })),
        }
    }

    pub fn cash(&self) -> i64 {
        self.inner.read().cash
    }

    pub fn is_broke(&self) -> bool {
        self.inner.read().is_broke()
    }

    /// Overwrite the balance, e.g. a top-up
    pub fn set_cash(&self, cash: i64) {
        let mut inner = self.inner.write();
        inner.cash = cash;
        inner.publish();
    }

    /// Credit the sum of all prizes
    pub fn credit_prizes(&self, prizes: &[Prize]) {
        let pot: i64 = prizes.iter().map(|p| p.amount).sum();
        let mut inner = self.inner.write();
        inner.cash += pot;
        log::debug!("Credited {} from {} prize(s), cash now {}", pot, prizes.len(), inner.cash);
        inner.publish();
    }
}

impl Default for CashBalance {
    fn default() -> Self {
        Self::new(DEFAULT_CASH)
    }
}

impl BalanceGate for CashBalance {
    fn subscribe_broke(&self) -> Receiver<bool> {
        let (tx, rx) = unbounded();
        let mut inner = self.inner.write();
        // Receiver is alive, send cannot fail
        let _ = tx.send(inner.is_broke());
        inner.broke_subscribers.push(tx);
        rx
    }

    fn decrease_cash(&self, amount: i64) {
        let mut inner = self.inner.write();
        inner.cash -= amount;
        inner.publish();
    }
}

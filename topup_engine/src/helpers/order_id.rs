use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::Utc;

use crate::db_types::OrderId;

/// Issues `ORD-<unix millis>` order ids.
///
/// Ids are strictly increasing across all clones of a generator: if two orders are created in the same millisecond,
/// the second one is bumped to the next millisecond value.
#[derive(Debug, Clone, Default)]
pub struct OrderIdGenerator {
    last: Arc<AtomicI64>,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> OrderId {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let next = now.max(last + 1);
            match self.last.compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return OrderId(format!("ORD-{next}")),
                Err(current) => last = current,
            }
        }
    }
}

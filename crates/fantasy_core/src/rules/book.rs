use std::sync::{Arc, RwLock};

use tracing::info;

use super::ScoringRuleSet;

/// Holder of the rule set currently in force.
///
/// Batches take an `Arc` snapshot and keep it for their whole run; a reload
/// swaps in a new snapshot without touching the one a batch already holds.
#[derive(Debug)]
pub struct RuleBook {
    current: RwLock<Snapshot>,
}

#[derive(Debug, Clone)]
struct Snapshot {
    version: u64,
    rules: Arc<ScoringRuleSet>,
}

impl RuleBook {
    pub fn new(rules: ScoringRuleSet) -> Self {
        Self { current: RwLock::new(Snapshot { version: 1, rules: Arc::new(rules) }) }
    }

    /// Rule set to use for one scoring batch.
    pub fn snapshot(&self) -> Arc<ScoringRuleSet> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard.rules)
    }

    /// Incremented on every [`RuleBook::replace`].
    pub fn version(&self) -> u64 {
        self.current.read().unwrap_or_else(|e| e.into_inner()).version
    }

    /// Install a new rule set, returning the one it replaces.
    pub fn replace(&self, rules: ScoringRuleSet) -> Arc<ScoringRuleSet> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let next = Snapshot { version: guard.version + 1, rules: Arc::new(rules) };
        info!(
            from = guard.rules.name(),
            to = next.rules.name(),
            version = next.version,
            "Rule set replaced"
        );
        std::mem::replace(&mut *guard, next).rules
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::new(ScoringRuleSet::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_survives_replace() {
        let book = RuleBook::new(ScoringRuleSet::standard());
        let held = book.snapshot();
        assert_eq!(book.version(), 1);

        let previous = book.replace(ScoringRuleSet::flat());
        assert_eq!(previous.name(), "standard");
        assert_eq!(book.version(), 2);

        // The batch that took a snapshot before the reload still sees the old rules.
        assert_eq!(held.name(), "standard");
        assert_eq!(book.snapshot().name(), "flat");
    }

    #[test]
    fn test_snapshots_shared_across_threads() {
        let book = Arc::new(RuleBook::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let book = Arc::clone(&book);
                std::thread::spawn(move || book.snapshot().name().to_string())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "standard");
        }
    }
}

use std::mem;

use crate::cref::ClauseRef;
use crate::idx::LitVec;
use crate::lit::{Lit, Var};

#[derive(Debug, Copy, Clone)]
pub struct Watcher {
    pub(crate) cref: ClauseRef,
    pub(crate) blocker: Lit,
}

/// `watchlist[lit]` holds the clauses currently watching `lit`.
#[derive(Debug)]
pub struct WatchList {
    watchlist: LitVec<Vec<Watcher>>,
}

impl WatchList {
    pub const fn new() -> Self {
        Self { watchlist: LitVec::new() }
    }

    pub fn init(&mut self, var: Var) {
        self.watchlist.init_by(&Lit::new(var, true), Vec::new);
    }

    pub fn insert(&mut self, lit: Lit, watch: Watcher) {
        self.watchlist[lit].push(watch);
    }

    /// Detach the watchers of `lit` so they can be scanned while other lists are modified.
    pub fn take(&mut self, lit: Lit) -> Vec<Watcher> {
        mem::take(&mut self.watchlist[lit])
    }

    pub fn restore(&mut self, lit: Lit, watchers: Vec<Watcher>) {
        let added = mem::replace(&mut self.watchlist[lit], watchers);
        self.watchlist[lit].extend(added);
    }
}

impl Default for WatchList {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use itertools::Itertools;
use tap::Tap;
use tracing::{debug, trace};

use crate::assignment::{Assignment, LBool};
use crate::budget::Budget;
use crate::clause_allocator::ClauseAllocator;
use crate::clause_database::ClauseDatabase;
use crate::cref::ClauseRef;
use crate::idx::VarVec;
use crate::learning::LearntLimit;
use crate::lit::{Lit, Var};
use crate::options::{Minimization, Options};
use crate::restart::RestartStrategy;
use crate::var_order::VarOrder;
use crate::watch::{WatchList, Watcher};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveResult {
    Sat,
    Unsat,
    Unknown,
}

impl Display for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveResult::Sat => write!(f, "SAT"),
            SolveResult::Unsat => write!(f, "UNSAT"),
            SolveResult::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

enum SearchResult {
    Sat,
    Unsat,
    Restart,
    Interrupted,
}

#[derive(Debug, Default, Clone)]
pub struct Stats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub restarts: u64,
    pub time_search: Duration,
}

/// Incremental CDCL solver (MiniSat-style: 2-watched literals, VSIDS,
/// phase saving, Luby restarts, activity-based learnt clause deletion).
///
/// Clauses may be added between calls to [`Solver::solve_under_assumptions`];
/// after a SAT answer the model stays readable through [`Solver::value`]
/// until the next call.
#[derive(Debug)]
pub struct Solver {
    options: Options,
    ca: ClauseAllocator,
    db: ClauseDatabase,
    watchlist: WatchList,
    assignment: Assignment,
    var_order: VarOrder,
    polarity: VarVec<bool>,
    seen: VarVec<bool>,
    model: Vec<LBool>,
    ok: bool,
    next_var: u32,
    num_added: usize,
    simp_trail: Option<usize>,
    restart: RestartStrategy,
    learnt_limit: LearntLimit,
    budget: Budget,
    stats: Stats,
}

impl Solver {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            ca: ClauseAllocator::new(),
            db: ClauseDatabase::new(options.clause_decay),
            watchlist: WatchList::new(),
            assignment: Assignment::new(),
            var_order: VarOrder::new(options.var_decay),
            polarity: VarVec::new(),
            seen: VarVec::new(),
            model: Vec::new(),
            ok: true,
            next_var: 0,
            num_added: 0,
            simp_trail: None,
            restart: RestartStrategy::from_options(&options),
            learnt_limit: LearntLimit::new(&options),
            budget: Budget::unlimited(),
            stats: Stats::default(),
            options,
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Solver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solver(vars={}, clauses={}, learnts={}, conflicts={})",
            self.num_vars(),
            self.num_clauses(),
            self.num_learnts(),
            self.stats.conflicts
        )
    }
}

impl Solver {
    pub fn num_vars(&self) -> usize {
        self.next_var as _
    }
    pub fn num_clauses(&self) -> usize {
        self.num_added
    }
    pub fn num_learnts(&self) -> usize {
        self.db.num_learnts()
    }
    pub fn stats(&self) -> &Stats {
        &self.stats
    }
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Limits applied to every subsequent `solve` call.
    pub fn set_budget(&mut self, budget: Budget) {
        self.budget = budget;
    }

    pub fn new_var(&mut self) -> Var {
        let var = Var::new(self.next_var);
        self.next_var += 1;

        self.watchlist.init(var);
        self.assignment.init(var);
        // `polarity` holds the sign of the literal to branch on
        let negated = !self.options.initial_phase;
        self.polarity.init_by(&var, || negated);
        self.seen.init_by(&var, || false);
        self.var_order.init(var);

        var
    }

    /// Value of the literal in the last model found.
    /// Returns `Undef` when there is no model (or the variable is unknown to it).
    pub fn value(&self, lit: Lit) -> LBool {
        match self.model.get(lit.var().index()) {
            Some(&value) => value ^ lit.negated(),
            None => LBool::Undef,
        }
    }

    /// Add a clause at the root level. Returns `false` if the solver became (or already was) UNSAT.
    pub fn add_clause(&mut self, lits: &[Lit]) -> bool {
        debug_assert_eq!(self.assignment.decision_level(), 0);
        self.num_added += 1;

        if !self.ok {
            return false;
        }

        // Auto-create missing variables:
        if let Some(max_var) = lits.iter().map(|lit| lit.var().inner() + 1).max() {
            while self.next_var < max_var {
                self.new_var();
            }
        }

        let lits = lits.iter().copied().sorted().dedup().collect_vec();
        let mut simplified = Vec::with_capacity(lits.len());
        for (i, &lit) in lits.iter().enumerate() {
            // complementary literals are adjacent after sorting
            if i > 0 && lits[i - 1] == !lit {
                return true;
            }
            match self.assignment.value(lit) {
                LBool::True => return true,
                LBool::False => {}
                LBool::Undef => simplified.push(lit),
            }
        }

        match simplified.len() {
            0 => {
                self.ok = false;
            }
            1 => {
                self.assignment.unchecked_enqueue(simplified[0], None);
                self.ok = self.propagate().is_none();
            }
            _ => {
                let cref = self.db.new_clause(simplified, false, &mut self.ca);
                self.attach_clause(cref);
            }
        }
        self.ok
    }

    fn attach_clause(&mut self, cref: ClauseRef) {
        let clause = &self.ca[cref];
        debug_assert!(clause.len() >= 2, "Clause must have at least 2 literals");
        let (a, b) = (clause[0], clause[1]);
        self.watchlist.insert(a, Watcher { cref, blocker: b });
        self.watchlist.insert(b, Watcher { cref, blocker: a });
    }

    pub fn solve(&mut self) -> SolveResult {
        self.solve_under_assumptions(&[])
    }

    pub fn solve_under_assumptions(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.model.clear();
        if !self.ok {
            return SolveResult::Unsat;
        }
        for lit in assumptions.iter() {
            while self.next_var <= lit.var().inner() {
                self.new_var();
            }
        }

        debug!(
            "Solving {} vars, {} clauses, {} assumptions",
            self.num_vars(),
            self.db.num_clauses(),
            assumptions.len()
        );
        let time_start = Instant::now();
        self.learnt_limit.start(self.db.num_clauses());

        let mut restarts = 0;
        let result = loop {
            if self.budget.exhausted() {
                break SolveResult::Unknown;
            }
            let num_confl = self.restart.num_confl(restarts);
            match self.search(num_confl, assumptions) {
                SearchResult::Sat => {
                    self.model = self.assignment.assignment.as_slice().to_vec();
                    break SolveResult::Sat;
                }
                SearchResult::Unsat => break SolveResult::Unsat,
                SearchResult::Interrupted => break SolveResult::Unknown,
                SearchResult::Restart => {
                    restarts += 1;
                    self.stats.restarts += 1;
                    trace!("restart #{}: {}", restarts, self);
                }
            }
        };

        self.backtrack(0);
        self.stats.time_search += time_start.elapsed();
        debug!("{} in {:.3}s: {:?}", result, time_start.elapsed().as_secs_f64(), self.stats);
        result
    }

    /// The main CDCL loop. Runs until a model is found, the problem (or the
    /// assumptions) are refuted, `num_confl` conflicts pass, or the budget runs out.
    fn search(&mut self, num_confl: usize, assumptions: &[Lit]) -> SearchResult {
        debug_assert!(self.ok);
        let mut current_conflicts = 0;

        loop {
            if let Some(conflict) = self.propagate() {
                self.stats.conflicts += 1;
                current_conflicts += 1;

                if self.assignment.decision_level() == 0 {
                    self.ok = false;
                    return SearchResult::Unsat;
                }

                let (lemma, backtrack_level) = self.analyze(conflict);
                self.backtrack(backtrack_level);
                if lemma.len() == 1 {
                    self.assignment.unchecked_enqueue(lemma[0], None);
                } else {
                    let asserting = lemma[0];
                    let cref = self.db.new_clause(lemma, true, &mut self.ca);
                    self.attach_clause(cref);
                    self.db.cla_bump_activity(cref, &mut self.ca);
                    self.assignment.unchecked_enqueue(asserting, Some(cref));
                }

                self.var_order.var_decay_activity();
                self.db.cla_decay_activity();
                self.learnt_limit.on_conflict();

                if self.budget.exhausted() {
                    return SearchResult::Interrupted;
                }
            } else {
                if current_conflicts >= num_confl {
                    self.backtrack(0);
                    return SearchResult::Restart;
                }

                if self.assignment.decision_level() == 0 && self.simp_trail != Some(self.assignment.num_assigned()) {
                    self.db.simplify(&self.assignment, &mut self.ca);
                    self.simp_trail = Some(self.assignment.num_assigned());
                }

                if self.db.num_learnts() >= self.learnt_limit.limit(self.assignment.num_assigned()) {
                    self.db.reduce(&self.assignment, &mut self.ca);
                }

                let mut next = None;
                while self.assignment.decision_level() < assumptions.len() {
                    let p = assumptions[self.assignment.decision_level()];
                    match self.assignment.value(p) {
                        // dummy decision level
                        LBool::True => self.assignment.new_decision_level(),
                        LBool::False => return SearchResult::Unsat,
                        LBool::Undef => {
                            next = Some(p);
                            break;
                        }
                    }
                }

                let next = match next {
                    Some(p) => p,
                    None => {
                        self.stats.decisions += 1;
                        if self.stats.decisions % 1024 == 0 && self.budget.exhausted() {
                            return SearchResult::Interrupted;
                        }
                        match self.pick_branching_literal() {
                            Some(lit) => lit,
                            None => return SearchResult::Sat,
                        }
                    }
                };

                self.assignment.new_decision_level();
                self.assignment.unchecked_enqueue(next, None);
            }
        }
    }

    fn pick_branching_literal(&mut self) -> Option<Lit> {
        let var = self.var_order.pick_branching_variable(&self.assignment.assignment)?;
        Some(Lit::new(var, self.polarity[var]))
    }

    /// Propagate all enqueued facts. Returns the conflicting clause, if any.
    fn propagate(&mut self) -> Option<ClauseRef> {
        let mut conflict = None;

        while let Some(p) = self.assignment.dequeue() {
            self.stats.propagations += 1;
            let false_literal = !p;
            let mut watchers = self.watchlist.take(false_literal);

            let mut i = 0;
            let mut j = 0;
            while i < watchers.len() {
                let w = watchers[i];
                i += 1;

                // Try to avoid inspecting the clause:
                if self.assignment.value(w.blocker) == LBool::True {
                    watchers[j] = w;
                    j += 1;
                    continue;
                }

                let cref = w.cref;
                if self.ca[cref].is_deleted() {
                    continue;
                }

                // Make sure the false literal is lits[1]:
                let first = {
                    let clause = &mut self.ca[cref];
                    if clause[0] == false_literal {
                        clause.lits.swap(0, 1);
                    }
                    debug_assert_eq!(clause[1], false_literal);
                    clause[0]
                };

                // If the 0th watch is true, then clause is already satisfied.
                let w = Watcher { cref, blocker: first };
                if self.assignment.value(first) == LBool::True {
                    watchers[j] = w;
                    j += 1;
                    continue;
                }

                // Look for a new watch:
                let new_watch = {
                    let clause = &mut self.ca[cref];
                    let assignment = &self.assignment;
                    let pos = (2..clause.len()).find(|&k| assignment.value(clause[k]) != LBool::False);
                    pos.map(|k| {
                        clause.lits.swap(1, k);
                        clause[1]
                    })
                };
                if let Some(lit) = new_watch {
                    self.watchlist.insert(lit, w);
                    continue;
                }

                // Did not find a new watch: the clause is unit under the assignment.
                watchers[j] = w;
                j += 1;
                if self.assignment.value(first) == LBool::False {
                    conflict = Some(cref);
                    self.assignment.qhead = self.assignment.trail.len();
                    // Copy the remaining watches:
                    while i < watchers.len() {
                        watchers[j] = watchers[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    self.assignment.unchecked_enqueue(first, Some(cref));
                }
            }

            watchers.truncate(j);
            self.watchlist.restore(false_literal, watchers);

            if conflict.is_some() {
                break;
            }
        }

        conflict
    }

    /// First-UIP conflict analysis. Returns the learnt clause (asserting literal first,
    /// a literal of the backtrack level second) and the level to backtrack to.
    fn analyze(&mut self, conflict: ClauseRef) -> (Vec<Lit>, usize) {
        let current_level = self.assignment.decision_level();
        let mut lemma = Vec::new();
        let mut path_count = 0;
        let mut index = self.assignment.trail.len();
        let mut confl = conflict;
        let mut p: Option<Lit> = None;

        loop {
            self.db.cla_bump_activity(confl, &mut self.ca);

            let start = if p.is_some() { 1 } else { 0 };
            let clause = &self.ca[confl];
            for &q in &clause.lits()[start..] {
                let v = q.var();
                if !self.seen[v] && self.assignment.level(v) > 0 {
                    self.var_order.var_bump_activity(v);
                    self.seen[v] = true;
                    if self.assignment.level(v) >= current_level {
                        path_count += 1;
                    } else {
                        lemma.push(q);
                    }
                }
            }

            // Select next clause to look at:
            loop {
                index -= 1;
                if self.seen[self.assignment.trail[index].var()] {
                    break;
                }
            }
            let pl = self.assignment.trail[index];
            self.seen[pl.var()] = false;
            path_count -= 1;
            p = Some(pl);

            if path_count == 0 {
                break;
            }
            match self.assignment.reason(pl.var()) {
                Some(reason) => confl = reason,
                None => unreachable!("non-UIP literal {} on the conflict level has no reason", pl),
            }
        }

        let uip = match p {
            Some(uip) => uip,
            None => unreachable!("conflict analysis visited no literal"),
        };
        let mut to_clear = lemma.clone();

        match self.options.minimization {
            Minimization::None => {}
            Minimization::Local => {
                lemma.retain(|&q| match self.assignment.reason(q.var()) {
                    None => true,
                    Some(reason) => self.ca[reason].lits()[1..]
                        .iter()
                        .any(|&r| !self.seen[r.var()] && self.assignment.level(r.var()) > 0),
                });
            }
            Minimization::Recursive => {
                let levels = lemma.iter().fold(0, |acc, q| acc | self.abstract_level(q.var()));
                let candidates = std::mem::take(&mut lemma);
                for q in candidates {
                    if self.assignment.reason(q.var()).is_none() || !self.is_redundant(q, levels, &mut to_clear) {
                        lemma.push(q);
                    }
                }
            }
        }

        for lit in to_clear {
            self.seen[lit.var()] = false;
        }

        lemma.insert(0, !uip);

        // Find the backtrack level and move a literal of that level to lemma[1]:
        let backtrack_level = if lemma.len() == 1 {
            0
        } else {
            let (max_i, level) = lemma
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, lit)| (i, self.assignment.level(lit.var())))
                .max_by_key(|&(_, level)| level)
                .unwrap_or((1, 0));
            lemma.swap(1, max_i);
            level
        };

        trace!("learnt {:?} -> backtrack to {}", lemma.iter().map(|l| l.to_external()).collect_vec(), backtrack_level);
        (lemma, backtrack_level)
    }

    fn abstract_level(&self, var: Var) -> u32 {
        1 << (self.assignment.level(var) & 31)
    }

    /// Whether `p` follows from literals already marked `seen`, walking reasons
    /// only through decision levels present in `levels`. Newly marked literals go
    /// to `to_clear`; on failure the marks of this walk are undone.
    fn is_redundant(&mut self, p: Lit, levels: u32, to_clear: &mut Vec<Lit>) -> bool {
        let top = to_clear.len();
        let mut stack = vec![p];
        while let Some(q) = stack.pop() {
            let reason = match self.assignment.reason(q.var()) {
                Some(reason) => reason,
                None => unreachable!("literal {} on the redundancy stack has no reason", q),
            };
            for &r in &self.ca[reason].lits()[1..] {
                let v = r.var();
                if self.seen[v] || self.assignment.level(v) == 0 {
                    continue;
                }
                if self.assignment.reason(v).is_some() && self.abstract_level(v) & levels != 0 {
                    self.seen[v] = true;
                    stack.push(r);
                    to_clear.push(r);
                } else {
                    for lit in to_clear.drain(top..) {
                        self.seen[lit.var()] = false;
                    }
                    return false;
                }
            }
        }
        true
    }

    fn backtrack(&mut self, level: usize) {
        for lit in self.assignment.cancel_until(level) {
            let var = lit.var();
            // phase saving
            self.polarity[var] = lit.negated();
            self.var_order.insert_var_order(var);
        }
    }

    /// Literals fixed at the root level, sorted.
    pub fn fixed_literals(&self) -> Vec<Lit> {
        let root = self.assignment.trail_lim.first().copied().unwrap_or(self.assignment.trail.len());
        self.assignment.trail[..root].to_vec().tap_mut(|lits| lits.sort())
    }
}

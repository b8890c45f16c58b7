//! Finite space of states: bit-vectors over `n` atomic state bits.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State(u32);

impl State {
    pub const NULL: State = State(0);

    pub const fn new(bits: u32) -> Self {
        State(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    pub const fn fusion(self, other: State) -> State {
        State(self.0 | other.0)
    }

    pub const fn overlaps(self, other: State) -> bool {
        self.0 & other.0 != 0
    }

    /// `self ⊑ other`
    pub const fn is_part_of(self, other: State) -> bool {
        self.0 | other.0 == other.0
    }

    /// `self ⊏ other`
    pub const fn is_proper_part_of(self, other: State) -> bool {
        self.is_part_of(other) && self.0 != other.0
    }

    pub const fn size(self) -> u32 {
        self.0.count_ones()
    }

    /// The state with atomic bits `i` and `j` exchanged.
    pub const fn swap_bits(self, i: usize, j: usize) -> State {
        let differ = ((self.0 >> i) ^ (self.0 >> j)) & 1;
        State(self.0 ^ (differ << i | differ << j))
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "□");
        }
        let letters = (0..u32::BITS)
            .filter(|i| self.0 >> i & 1 == 1)
            .map(|i| char::from(b'a' + i as u8))
            .collect::<String>();
        write!(f, "{}", letters)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StateSpace {
    n: usize,
}

impl StateSpace {
    pub const fn new(n: usize) -> Self {
        Self { n }
    }

    pub const fn n(&self) -> usize {
        self.n
    }

    /// Number of states, `2^n`.
    pub const fn len(&self) -> usize {
        1 << self.n
    }

    pub const fn full(&self) -> State {
        State(((1u64 << self.n) - 1) as u32)
    }

    pub fn states(&self) -> impl Iterator<Item = State> {
        (0..self.len() as u32).map(State)
    }

    /// The single-bit states.
    pub fn atoms(&self) -> impl Iterator<Item = State> {
        (0..self.n).map(|i| State(1 << i))
    }

    /// Single-bit states that are not part of `s`.
    pub fn extensions(&self, s: State) -> impl Iterator<Item = State> {
        self.atoms().filter(move |b| !b.is_part_of(s))
    }

    /// All parts of `s`, including the null state and `s` itself.
    pub fn parts(&self, s: State) -> impl Iterator<Item = State> {
        // Walk the subsets of `s` by the standard `(sub - 1) & s` trick, in ascending order.
        let mut subsets = Vec::with_capacity(1 << s.size());
        let mut sub = s.0;
        loop {
            subsets.push(State(sub));
            if sub == 0 {
                break;
            }
            sub = (sub - 1) & s.0;
        }
        subsets.into_iter().rev()
    }

    pub fn supersets(&self, s: State) -> impl Iterator<Item = State> {
        self.states().filter(move |t| s.is_part_of(*t))
    }

    /// Pairs `(a, b)` with `a | b == s`.
    pub fn decompositions(&self, s: State) -> Vec<(State, State)> {
        self.parts(s)
            .cartesian_product(self.parts(s).collect_vec())
            .filter(|(a, b)| a.fusion(*b) == s)
            .collect()
    }
}

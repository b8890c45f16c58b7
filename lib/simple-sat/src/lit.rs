use std::fmt::{Display, Formatter};
use std::ops;

/// 0-based variable index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Var(pub(crate) u32);

impl Var {
    pub const fn new(var: u32) -> Self {
        Self(var)
    }

    pub const fn inner(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Internal literal: `var << 1 | negated`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Lit(pub(crate) u32);

impl Lit {
    pub const fn new(var: Var, negated: bool) -> Self {
        Lit(var.0 << 1 | negated as u32)
    }

    pub const fn positive(var: Var) -> Self {
        Self::new(var, false)
    }

    pub const fn inner(self) -> u32 {
        self.0
    }

    pub const fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    pub const fn negated(self) -> bool {
        (self.0 & 1) != 0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn to_external(self) -> i32 {
        let var = (self.var().0 + 1) as i32;
        if self.negated() {
            -var
        } else {
            var
        }
    }

    pub const fn from_external(lit: i32) -> Lit {
        debug_assert!(lit != 0);
        let var = lit.unsigned_abs() - 1;
        Lit::new(Var(var), lit < 0)
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_external())
    }
}

// !Lit
impl ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

// Lit ^ bool
impl ops::BitXor<bool> for Lit {
    type Output = Lit;

    fn bitxor(self, rhs: bool) -> Self::Output {
        Lit(self.0 ^ rhs as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_conversion() {
        let lit = Lit::from_external(-3);
        assert_eq!(lit.var(), Var::new(2));
        assert!(lit.negated());
        assert_eq!(lit.to_external(), -3);
        assert_eq!((!lit).to_external(), 3);
        assert_eq!(format!("{}", !lit), "3");
    }

    #[test]
    fn test_bitxor() {
        let lit = Lit::positive(Var::new(0));
        assert_eq!(lit ^ false, lit);
        assert_eq!(lit ^ true, !lit);
    }
}

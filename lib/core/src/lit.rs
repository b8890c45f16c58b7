use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// DIMACS-style literal: a non-zero signed variable index.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Lit(i32);

impl Lit {
    pub const fn new(val: i32) -> Self {
        debug_assert!(val != 0, "literal must not be zero");
        Lit(val)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub const fn var(self) -> u32 {
        self.get().unsigned_abs()
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// The positive literal of the same variable.
    pub const fn abs(self) -> Lit {
        Lit(self.0.abs())
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl<L> From<&L> for Lit
where
    L: Into<Lit> + Copy,
{
    fn from(val: &L) -> Self {
        (*val).into()
    }
}

impl From<i32> for Lit {
    fn from(val: i32) -> Self {
        Self::new(val)
    }
}

impl From<usize> for Lit {
    fn from(val: usize) -> Self {
        Self::new(val as i32)
    }
}

// Into<i32>
impl From<Lit> for i32 {
    fn from(lit: Lit) -> Self {
        lit.get()
    }
}

// -Lit
impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lit_var_and_sign() {
        let lit = Lit::new(-42);
        assert_eq!(lit.var(), 42);
        assert!(!lit.is_positive());
        assert_eq!(lit.abs(), Lit::new(42));
    }

    #[test]
    fn test_lit_display() {
        assert_eq!(format!("{}", Lit::new(-7)), "-7");
    }

    #[test]
    fn test_lit_conversions() {
        let lit: Lit = 42.into();
        assert_eq!(lit.get(), 42);
        let lit: Lit = (&5).into();
        assert_eq!(lit.get(), 5);
        let lit = Lit::from(3usize);
        assert_eq!(i32::from(lit), 3);
    }

    #[test]
    fn test_lit_neg() {
        let lit = Lit::new(42);
        assert_eq!((-lit).get(), -42);
        assert_eq!(-(-lit), lit);
    }
}

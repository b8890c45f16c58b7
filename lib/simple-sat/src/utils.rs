use std::cmp::Ordering;

/// Finite subsequences of the Luby sequence:
///
/// ```text
/// 0: 1
/// 1: 1 1 2
/// 2: 1 1 2 1 1 2 4
/// 3: 1 1 2 1 1 2 4 1 1 2 1 1 2 4 8
/// ```
pub fn luby(y: f64, mut x: u32) -> f64 {
    // Find the finite subsequence that contains index 'x',
    // and the size of that subsequence:
    let mut size = 1;
    let mut seq = 0;

    while size < x + 1 {
        seq += 1;
        size = 2 * size + 1;
    }

    while size - 1 != x {
        size = (size - 1) >> 1;
        seq -= 1;
        x %= size;
    }

    y.powi(seq)
}

pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

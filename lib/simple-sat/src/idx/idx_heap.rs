use super::Idx;

/// Binary max-heap over indexable keys with O(1) membership checks.
///
/// The ordering is supplied by the caller on every operation (`higher(a, b)`
/// must return `true` iff `a` should be popped before `b`), so the heap never
/// owns the priorities themselves.
#[derive(Debug)]
pub struct IdxHeap<K> {
    heap: Vec<K>,
    positions: Vec<Option<usize>>,
}

impl<K> IdxHeap<K> {
    pub const fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: Vec::new(),
        }
    }
}

impl<K> Default for IdxHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> IdxHeap<K>
where
    K: Idx + Copy,
{
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, k: &K) -> bool {
        matches!(self.positions.get(k.idx()), Some(Some(_)))
    }

    pub fn clear(&mut self) {
        for k in self.heap.drain(..) {
            self.positions[k.idx()] = None;
        }
    }

    pub fn insert_by<F>(&mut self, k: K, higher: F)
    where
        F: Fn(K, K) -> bool,
    {
        if self.contains(&k) {
            return;
        }
        if k.idx() >= self.positions.len() {
            self.positions.resize(k.idx() + 1, None);
        }
        let i = self.heap.len();
        self.heap.push(k);
        self.positions[k.idx()] = Some(i);
        self.sift_up(i, &higher);
    }

    /// Restore the heap property after the priority of `k` has increased.
    pub fn update_by<F>(&mut self, k: K, higher: F)
    where
        F: Fn(K, K) -> bool,
    {
        if let Some(Some(i)) = self.positions.get(k.idx()).copied() {
            self.sift_up(i, &higher);
        }
    }

    pub fn pop_by<F>(&mut self, higher: F) -> Option<K>
    where
        F: Fn(K, K) -> bool,
    {
        let last = self.heap.pop()?;
        if self.heap.is_empty() {
            self.positions[last.idx()] = None;
            return Some(last);
        }
        let top = std::mem::replace(&mut self.heap[0], last);
        self.positions[top.idx()] = None;
        self.positions[last.idx()] = Some(0);
        self.sift_down(0, &higher);
        Some(top)
    }

    fn sift_up<F>(&mut self, mut i: usize, higher: &F)
    where
        F: Fn(K, K) -> bool,
    {
        let x = self.heap[i];
        while i > 0 {
            let parent = (i - 1) / 2;
            if !higher(x, self.heap[parent]) {
                break;
            }
            self.heap[i] = self.heap[parent];
            self.positions[self.heap[i].idx()] = Some(i);
            i = parent;
        }
        self.heap[i] = x;
        self.positions[x.idx()] = Some(i);
    }

    fn sift_down<F>(&mut self, mut i: usize, higher: &F)
    where
        F: Fn(K, K) -> bool,
    {
        let x = self.heap[i];
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && higher(self.heap[right], self.heap[left]) {
                right
            } else {
                left
            };
            if !higher(self.heap[child], x) {
                break;
            }
            self.heap[i] = self.heap[child];
            self.positions[self.heap[i].idx()] = Some(i);
            i = child;
        }
        self.heap[i] = x;
        self.positions[x.idx()] = Some(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Var;

    #[test]
    fn test_pop_in_priority_order() {
        let priority = [3.0, 1.0, 4.0, 1.5, 9.0, 2.6];
        let higher = |a: Var, b: Var| priority[a.index()] > priority[b.index()];

        let mut heap = IdxHeap::new();
        for i in 0..priority.len() {
            heap.insert_by(Var::new(i as u32), higher);
        }
        assert_eq!(heap.len(), priority.len());
        assert!(heap.contains(&Var::new(4)));

        let mut order = Vec::new();
        while let Some(v) = heap.pop_by(higher) {
            order.push(v.index());
        }
        assert_eq!(order, vec![4, 2, 0, 5, 3, 1]);
        assert!(!heap.contains(&Var::new(4)));
    }

    #[test]
    fn test_update_after_increase() {
        let mut priority = vec![1.0, 2.0, 3.0];
        let mut heap = IdxHeap::new();
        for i in 0..3 {
            heap.insert_by(Var::new(i), |a: Var, b: Var| priority[a.index()] > priority[b.index()]);
        }
        priority[0] = 10.0;
        heap.update_by(Var::new(0), |a: Var, b: Var| priority[a.index()] > priority[b.index()]);
        assert_eq!(heap.pop_by(|a: Var, b: Var| priority[a.index()] > priority[b.index()]), Some(Var::new(0)));
    }
}

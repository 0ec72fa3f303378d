/// Disjoint-set forest over a dense integer index space.
///
/// Path halving on find, union by size. Each class additionally tracks its
/// smallest member index so the exposed representative does not depend on
/// traversal order.
#[derive(Clone, Debug, Default)]
pub struct DisjointSet {
    parent: Vec<u32>,
    size: Vec<u32>,
    min_member: Vec<u32>,
}

impl DisjointSet {
    pub fn new(n: usize) -> Self {
        let mut dsu = Self::default();
        dsu.reset(n);
        dsu
    }

    /// Reinitialize for `n` singleton classes, reusing storage.
    pub fn reset(&mut self, n: usize) {
        self.parent.clear();
        self.parent.extend(0..n as u32);
        self.size.clear();
        self.size.resize(n, 1);
        self.min_member.clear();
        self.min_member.extend(0..n as u32);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] as usize != i {
            let grandparent = self.parent[self.parent[i] as usize];
            self.parent[i] = grandparent;
            i = grandparent as usize;
        }
        i
    }

    /// Union the classes of `a` and `b`; returns the surviving root.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big as u32;
        self.size[big] += self.size[small];
        self.min_member[big] = self.min_member[big].min(self.min_member[small]);
        big
    }

    /// Number of elements in the class containing `i`.
    pub fn class_size(&mut self, i: usize) -> usize {
        let r = self.find(i);
        self.size[r] as usize
    }

    /// Smallest member index of the class containing `i`.
    pub fn class_min(&mut self, i: usize) -> usize {
        let r = self.find(i);
        self.min_member[r] as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_their_own_roots() {
        let mut dsu = DisjointSet::new(4);
        for i in 0..4 {
            assert_eq!(dsu.find(i), i);
            assert_eq!(dsu.class_size(i), 1);
        }
    }

    #[test]
    fn union_tracks_size_and_min_member() {
        let mut dsu = DisjointSet::new(6);
        dsu.union(4, 5);
        dsu.union(2, 4);
        assert_eq!(dsu.class_size(5), 3);
        assert_eq!(dsu.class_min(5), 2);
        assert_eq!(dsu.find(2), dsu.find(5));
        assert_ne!(dsu.find(0), dsu.find(2));
    }

    #[test]
    fn min_member_is_traversal_order_independent() {
        let mut a = DisjointSet::new(8);
        a.union(0, 1);
        a.union(6, 7);
        a.union(1, 7);

        let mut b = DisjointSet::new(8);
        b.union(7, 6);
        b.union(6, 1);
        b.union(1, 0);

        assert_eq!(a.class_min(6), 0);
        assert_eq!(b.class_min(6), 0);
        assert_eq!(a.class_size(0), b.class_size(0));
    }

    #[test]
    fn reset_reuses_storage() {
        let mut dsu = DisjointSet::new(3);
        dsu.union(0, 2);
        dsu.reset(5);
        assert_eq!(dsu.len(), 5);
        for i in 0..5 {
            assert_eq!(dsu.find(i), i);
        }
    }
}

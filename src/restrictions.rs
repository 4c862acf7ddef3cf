use ahash::{HashMap, HashMapExt};

use crate::graphs::VertexId;

/// An ordered vertex sequence that may not be traveled in this order. A
/// single vertex marks a vertex that may not be passed at all.
pub type Restriction = Vec<VertexId>;

/// Turn-restriction lookup.
pub trait RestrictionProvider: Send + Sync {
    /// Every restriction whose sequence contains `vertex`.
    fn restrictions(&self, vertex: VertexId) -> Vec<Restriction>;

    fn has_restrictions(&self, vertex: VertexId) -> bool {
        !self.restrictions(vertex).is_empty()
    }
}

pub struct NoRestrictions;

impl RestrictionProvider for NoRestrictions {
    fn restrictions(&self, _vertex: VertexId) -> Vec<Restriction> {
        Vec::new()
    }

    fn has_restrictions(&self, _vertex: VertexId) -> bool {
        false
    }
}

impl<F> RestrictionProvider for F
where
    F: Fn(VertexId) -> Vec<Restriction> + Send + Sync,
{
    fn restrictions(&self, vertex: VertexId) -> Vec<Restriction> {
        self(vertex)
    }
}

/// Restrictions indexed by every vertex they touch.
#[derive(Clone, Default)]
pub struct RestrictionMap {
    restrictions: Vec<Restriction>,
    by_vertex: HashMap<VertexId, Vec<usize>>,
}

impl RestrictionMap {
    pub fn new() -> Self {
        RestrictionMap {
            restrictions: Vec::new(),
            by_vertex: HashMap::new(),
        }
    }

    pub fn from_restrictions(restrictions: impl IntoIterator<Item = Restriction>) -> Self {
        let mut map = RestrictionMap::new();
        for restriction in restrictions {
            map.add(restriction);
        }
        map
    }

    pub fn add(&mut self, restriction: Restriction) {
        if restriction.is_empty() {
            return;
        }

        let index = self.restrictions.len();
        let mut touched = restriction.clone();
        touched.sort_unstable();
        touched.dedup();
        for vertex in touched {
            self.by_vertex.entry(vertex).or_default().push(index);
        }
        self.restrictions.push(restriction);
    }

    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }
}

impl RestrictionProvider for RestrictionMap {
    fn restrictions(&self, vertex: VertexId) -> Vec<Restriction> {
        self.by_vertex
            .get(&vertex)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| self.restrictions[index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn has_restrictions(&self, vertex: VertexId) -> bool {
        self.by_vertex.contains_key(&vertex)
    }
}

/// Whether `path` ends with one of `restrictions`.
pub fn completes_restriction(path: &[VertexId], restrictions: &[Restriction]) -> bool {
    restrictions
        .iter()
        .any(|restriction| path.ends_with(restriction))
}

#[cfg(test)]
mod tests {
    use super::{
        completes_restriction, NoRestrictions, Restriction, RestrictionMap, RestrictionProvider,
    };
    use crate::graphs::VertexId;

    #[test]
    fn map_indexes_every_touched_vertex() {
        let map = RestrictionMap::from_restrictions(vec![vec![1, 2, 3], vec![5]]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.restrictions(2), vec![vec![1, 2, 3]]);
        assert!(map.has_restrictions(3));
        assert!(map.has_restrictions(5));
        assert!(!map.has_restrictions(4));
        assert!(!NoRestrictions.has_restrictions(1));
    }

    #[test]
    fn closures_are_providers() {
        let provider = |vertex: VertexId| -> Vec<Restriction> {
            if vertex == 7 {
                vec![vec![6, 7, 8]]
            } else {
                Vec::new()
            }
        };
        assert!(provider.has_restrictions(7));
        assert!(!provider.has_restrictions(6));
    }

    #[test]
    fn restriction_suffix() {
        let restrictions = vec![vec![1, 2, 3]];
        assert!(completes_restriction(&[0, 1, 2, 3], &restrictions));
        assert!(!completes_restriction(&[1, 2], &restrictions));
        assert!(!completes_restriction(&[2, 1, 3], &restrictions));
    }
}

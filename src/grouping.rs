use std::collections::HashMap;

/// Keyed accumulators that iterate in first-seen key order.
///
/// Lookups go through a hash index; the values live in a `Vec`, so iteration
/// order never depends on hashing.
#[derive(Debug, Clone)]
pub struct OrderedGroups<V> {
    index: HashMap<String, usize>,
    groups: Vec<(String, V)>,
}

impl<V> Default for OrderedGroups<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<V> OrderedGroups<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulator for `key`, creating it with `init` on first sight.
    pub fn entry_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> V) -> &mut V {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.groups.push((key.to_string(), init()));
                self.index.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, V)> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut groups: OrderedGroups<u32> = OrderedGroups::new();
        for key in ["b", "a", "b", "c", "a", "b"] {
            *groups.entry_or_insert_with(key, || 0) += 1;
        }

        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups.into_vec(),
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_init_runs_once_per_key() {
        let mut groups: OrderedGroups<Vec<u32>> = OrderedGroups::new();
        let mut created = 0;
        for (key, value) in [("x", 1), ("x", 2), ("y", 3)] {
            groups
                .entry_or_insert_with(key, || {
                    created += 1;
                    Vec::new()
                })
                .push(value);
        }
        assert_eq!(created, 2);
        assert!(!groups.is_empty());
    }
}

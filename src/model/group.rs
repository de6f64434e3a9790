use indexmap::IndexMap;

/// Records grouped by category key. Keys keep first-seen order and are never
/// re-sorted; records keep input order within their key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<T> {
    entries: IndexMap<String, Vec<T>>,
}

impl<T> Default for CategoryGroup<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> CategoryGroup<T> {
    /// Groups `records` in one pass, using `key` to pick each record's category.
    pub fn from_records<I, F>(records: I, key: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> &str,
    {
        let mut group = Self::default();
        for record in records {
            group.insert(key(&record).to_string(), record);
        }
        group
    }

    pub fn insert(&mut self, key: String, record: T) {
        self.entries.entry(key).or_default().push(record);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records across all keys.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

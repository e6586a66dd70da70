/// Paging window. Dialect-specific syntax is left to the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    /// Maximum number of rows, `None` for no upper bound
    pub limit: Option<u64>,

    /// Number of rows to skip
    pub offset: u64,
}

impl Limit {
    pub fn new(limit: Option<u64>, offset: u64) -> Self {
        Self { limit, offset }
    }

    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none() && self.offset == 0
    }

    /// Applies the window to an in-memory list of rows.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset as usize);
        match self.limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        }
    }
}

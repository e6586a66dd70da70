use crate::{
    stmt::{Row, Value},
    Result,
};

use std::{collections::VecDeque, fmt};

/// A forward-only cursor over rows produced by a driver.
pub trait Cursor: Send + 'static {
    /// Returns the next row, or `None` once the cursor is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

impl Cursor for VecDeque<Row> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.pop_front())
    }
}

impl Cursor for std::vec::IntoIter<Row> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.next())
    }
}

/// Uniform access to the rows of an executed query.
///
/// Rows are pulled from the underlying cursor lazily, up to the highest index
/// requested so far, and cached so they can be read again in any order.
pub struct ResultSet {
    columns: Vec<String>,
    cursor: Option<Box<dyn Cursor>>,
    cache: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, cursor: impl Cursor) -> ResultSet {
        ResultSet {
            columns,
            cursor: Some(Box::new(cursor)),
            cache: vec![],
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> ResultSet {
        ResultSet {
            columns,
            cursor: None,
            cache: rows,
        }
    }

    pub fn empty() -> ResultSet {
        ResultSet::from_rows(vec![], vec![])
    }

    /// Column names, in select order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows in the result. Drains the cursor.
    pub fn count_rows(&mut self) -> Result<usize> {
        self.fill(usize::MAX)?;
        Ok(self.cache.len())
    }

    /// Returns row `n`, or an empty row when `n` is past the end.
    pub fn fetch_row(&mut self, n: usize) -> Result<Row> {
        self.fill(n)?;
        Ok(self.cache.get(n).cloned().unwrap_or_default())
    }

    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        self.fill(usize::MAX)?;
        Ok(self.cache.clone())
    }

    /// Consumes the result set, returning every row.
    pub fn into_rows(mut self) -> Result<Vec<Row>> {
        self.fill(usize::MAX)?;
        Ok(self.cache)
    }

    /// Values of the `i`-th column of every row.
    pub fn fetch_column(&mut self, i: usize) -> Result<Vec<Value>> {
        self.fill(usize::MAX)?;
        Ok(self
            .cache
            .iter()
            .map(|row| row.get_index(i).map(|(_, v)| v.clone()).unwrap_or(Value::Null))
            .collect())
    }

    /// Value of `column` in row `row`; `Null` when either is absent.
    pub fn fetch_one(&mut self, column: &str, row: usize) -> Result<Value> {
        self.fill(row)?;
        Ok(self
            .cache
            .get(row)
            .and_then(|r| r.get(column))
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// Pulls rows until index `n` is cached or the cursor runs dry.
    fn fill(&mut self, n: usize) -> Result<()> {
        while self.cache.len() <= n {
            let Some(cursor) = &mut self.cursor else {
                break;
            };

            match cursor.next_row()? {
                Some(row) => self.cache.push(row),
                None => {
                    self.cursor = None;
                    break;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("columns", &self.columns)
            .field("cached", &self.cache.len())
            .field("exhausted", &self.cursor.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// Counts how many rows were pulled from it.
    struct Counting {
        rows: VecDeque<Row>,
        pulled: Arc<AtomicUsize>,
    }

    impl Cursor for Counting {
        fn next_row(&mut self) -> Result<Option<Row>> {
            let row = self.rows.pop_front();
            if row.is_some() {
                self.pulled.fetch_add(1, Ordering::SeqCst);
            }
            Ok(row)
        }
    }

    fn rows() -> Vec<Row> {
        (1..=3)
            .map(|id| Row::from([("id", Value::from(id)), ("name", Value::from(format!("n{id}")))]))
            .collect()
    }

    fn counting() -> (ResultSet, Arc<AtomicUsize>) {
        let pulled = Arc::new(AtomicUsize::new(0));
        let cursor = Counting {
            rows: rows().into(),
            pulled: pulled.clone(),
        };
        let columns = vec!["id".to_string(), "name".to_string()];
        (ResultSet::new(columns, cursor), pulled)
    }

    #[test]
    fn fetches_lazily_and_rewinds_from_cache() {
        let (mut rs, pulled) = counting();

        assert_eq!(rs.fetch_row(1).unwrap().get("id"), Some(&Value::I64(2)));
        assert_eq!(pulled.load(Ordering::SeqCst), 2);

        // Earlier rows come from the cache.
        assert_eq!(rs.fetch_row(0).unwrap().get("id"), Some(&Value::I64(1)));
        assert_eq!(pulled.load(Ordering::SeqCst), 2);

        assert_eq!(rs.count_rows().unwrap(), 3);
        assert_eq!(pulled.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn past_the_end_is_empty() {
        let (mut rs, _) = counting();
        assert!(rs.fetch_row(10).unwrap().is_empty());
        assert_eq!(rs.fetch_one("name", 10).unwrap(), Value::Null);
        assert_eq!(rs.fetch_one("missing", 0).unwrap(), Value::Null);
    }

    #[test]
    fn columns_and_scalars() {
        let (mut rs, _) = counting();
        assert_eq!(rs.column_names(), ["id", "name"]);
        assert_eq!(
            rs.fetch_column(1).unwrap(),
            vec![Value::from("n1"), Value::from("n2"), Value::from("n3")]
        );
        assert_eq!(rs.fetch_one("NAME", 2).unwrap(), Value::from("n3"));
        assert_eq!(rs.fetch_all().unwrap().len(), 3);
    }

    #[test]
    fn empty() {
        let mut rs = ResultSet::empty();
        assert_eq!(rs.count_rows().unwrap(), 0);
        assert!(rs.fetch_all().unwrap().is_empty());
    }
}

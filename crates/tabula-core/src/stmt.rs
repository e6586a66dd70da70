mod condition;
pub use condition::Condition;

mod eval;

mod insert;
pub use insert::Insert;

mod limit;
pub use limit::Limit;

mod order_by;
pub use order_by::{Direction, OrderBy};

mod query;
pub use query::Query;

mod remove;
pub use remove::Remove;

mod row;
pub use row::Row;

mod select;
pub use select::Select;

mod update;
pub use update::{Assignment, Update};

mod value;
pub use value::{Array, Value};

mod value_cmp;

mod builder;
pub use builder::{Builder, TableBuilder};

mod column;
pub use column::Column;

mod database;
pub use database::Schema;

mod def;
pub use def::{ColumnDef, FieldDef, SchemaDef, TableDef, TypeDef, ViewDef};

mod factory;
pub use factory::SchemaFactory;

mod table;
pub use table::Table;

mod ty;
pub use ty::Type;

mod verify;

mod view;
pub use view::{CheckOption, Field, View};

mod body;
mod descriptor;
mod dispatch_table;
mod hierarchy;
mod table;

#[cfg(test)]
mod table_test;

pub use body::*;
pub use descriptor::*;
pub use dispatch_table::DispatchTable;
pub use hierarchy::Hierarchy;
pub use table::{Ancestors, ClassTable};

pub mod icons;
pub mod output;
pub mod table;

pub use icons::Icons;
pub use output::{header, info, is_quiet, print_table, section, success, warn};
pub use table::{stats_table, TableBuilder};

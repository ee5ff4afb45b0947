//! Terminal presentation helpers: box-drawn tables, an overwritable status line,
//! structural URL prefix matching and priority-aware sort indices.

pub mod box_model;
pub mod domain;
pub mod model;
pub mod sort_index;
pub mod status;
pub mod table;
pub mod url_match;

pub use box_model::{BoxModel, DOUBLE_HEADER, HEAVY_HEADER, LineRole, LineTemplate};
pub use domain::{Error, Result, TableOptions};
pub use model::Model;
pub use sort_index::build_sort_index;
pub use status::{StatusLine, add_status_msg, set_status_msg};
pub use table::{Cell, CellFilter, Center, Ellipsis, LeftJustify, RightJustify, render};
pub use url_match::{UrlParts, starts_with};

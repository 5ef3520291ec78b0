#![allow(clippy::type_complexity)]
#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod error;
mod events;
mod model;
mod options;
mod pagination;
mod partner_list;
mod source;
mod utils;

pub use error::*;
pub use events::*;
pub use model::*;
pub use options::*;
pub use pagination::*;
pub use partner_list::*;
pub use source::*;

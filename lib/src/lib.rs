pub mod card;
pub mod catalog;
pub mod err;
pub mod filter;
pub mod input;
pub mod query;

pub use card::Card;
pub use catalog::{Catalog, Tile};
pub use filter::LiveFilter;
pub use input::{HandlerId, SearchField};
pub use query::Query;

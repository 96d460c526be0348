pub mod content;
pub mod search;
pub mod util;

pub use content::{ContentLoader, ContentStore};
pub use search::SearchService;

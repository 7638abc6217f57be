pub mod assembler;
pub mod cursor;
pub mod filter;
pub mod preview;
pub mod sort;

pub use assembler::{FeedController, FeedMode, FeedSnapshot, FeedUpdate};
pub use cursor::PaginationCursor;
pub use filter::is_eligible;
pub use sort::{sort_listings, SortKey};

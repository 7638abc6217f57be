pub mod detail;
pub mod model;

pub use detail::ListingDetail;
pub use model::{decode_listings, Bid, Listing, Media, Profile};

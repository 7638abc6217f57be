pub mod client;
pub mod queries;

pub use client::{ListingPage, ListingSource, NoroffClient};

#[cfg(test)]
pub use client::MockListingSource;

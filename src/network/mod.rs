pub mod client;
pub mod errors;
pub mod identity;

pub use client::HttpFetcher;
pub use errors::FetchError;
pub use identity::IdentityProfile;

pub mod constants;
pub mod keywords;
pub mod sources;

pub use keywords::KeywordTables;

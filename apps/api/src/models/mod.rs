pub mod matches;
pub mod profile;

pub mod encoding;
pub mod profile_url;

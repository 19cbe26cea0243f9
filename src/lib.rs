pub mod args;
pub mod capture;
pub mod host;
pub mod record;
pub mod registry;
pub mod serve;

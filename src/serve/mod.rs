pub use ftp::ftp;
pub use http::http;

mod ftp;
mod http;

pub mod base64;
pub mod http;
pub mod string;
pub mod url;
pub mod useragent;

// Re-export common utilities
pub use self::base64::{base64_decode, base64_encode, decode_or_plain};
pub use self::string::split_lines;
pub use self::url::{url_decode, url_encode};

pub mod clash;
pub mod pages;

/// Converted bodies shorter than this are treated as backend failures
pub const MIN_CONVERTED_LEN: usize = 10;

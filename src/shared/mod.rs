pub mod color;
pub mod geo;

pub use color::*;
pub use geo::*;

/// Lookup key for a line name, every line name match is case-insensitive.
pub fn line_key(name: &str) -> String {
    name.to_lowercase()
}

pub fn same_line(a: &str, b: &str) -> bool {
    line_key(a) == line_key(b)
}

pub mod meta;

use std::path;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Name of the optional substitution rule list kept inside the
/// destination library.
pub const RULES_FILE : &'static str = "rules.json";

pub fn rules_path(dest : &path::Path) -> path::PathBuf {
    dest.join(RULES_FILE)
}

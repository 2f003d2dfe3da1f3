//! Utility functions for common operations.
//!
//! Text processing only: Unicode-aware width calculation, truncation, word
//! wrapping with a line clamp, and control-sequence stripping.
//!
//! ```
//! use newsdeck::util::{display_width, truncate_to_width};
//!
//! let width = display_width("Hello 世界"); // 6 + 2*2
//! assert_eq!(width, 10);
//!
//! let truncated = truncate_to_width("Long article title", 15);
//! assert_eq!(truncated, "Long article...");
//! ```

mod text;

pub use text::{clamp_lines, display_width, strip_control_chars, truncate_to_width, wrap_to_width};

/// Maximum allowed search query length, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;

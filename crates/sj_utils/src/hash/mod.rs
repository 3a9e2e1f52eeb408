//! Hash containers over *hashbrown* and *foldhash*, re-exporting both.

use foldhash::fast::FixedState;

/// A [`hashbrown::HashMap`] hashed with a fixed [`foldhash`] seed.
///
/// Iteration order only depends on the inserted keys, never on a random seed.
///
/// # Examples
///
/// ```
/// use sj_utils::hash::HashMap;
///
/// let mut names = HashMap::<&str, usize>::default();
/// names.insert("Age", 0);
/// names.insert("Name", 1);
///
/// assert_eq!(names.get("Name"), Some(&1));
/// ```
pub type HashMap<K, V, S = FixedState> = hashbrown::HashMap<K, V, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

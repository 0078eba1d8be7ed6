/// Identifies one localization fetch.
///
/// Handles are numbered monotonically, so a larger handle always belongs to a
/// later request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Request(pub u64);

/// Dishes are keyed by a synthetic UUID assigned at parse time.
///
/// Keying by display name would collapse two dishes that share a name
/// into one cache slot, so every session map uses this id instead.
pub type DishId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

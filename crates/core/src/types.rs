/// Identifiers are assigned by the persistence service and treated as opaque
/// strings. Lexicographic comparison is meaningful only as an ordering
/// tie-break.
pub type EntityId = String;

/// Identifier of an authenticated account, as reported by the identity
/// service.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Sequential image identifiers, unique across both categories of a run.
pub type ImageId = u32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

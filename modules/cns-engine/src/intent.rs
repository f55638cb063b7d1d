//! The logical intent a raw store mutation maps to, per spec §4.3's dispatch
//! table.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Arm (or re-arm) the debounce timer.
    Rebuild,
    /// A capability-level default property was written at the owning
    /// endpoint; push it to every connection of that capability.
    Propagate { key: String, value: String },
    /// A connection-level property was written at the owning endpoint; push
    /// it to the opposite endpoint's matching connection.
    Update { key: String, value: String },
    /// Out of scope, or a key shape the classifier has nothing to do with.
    Ignore,
}

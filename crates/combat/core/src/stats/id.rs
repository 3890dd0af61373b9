use crate::id::string_id;

string_id! {
    /// Name of a stat, e.g. `"strength"` or `"critical_chance"`.
    ///
    /// Stats are data-driven: the core hardcodes no stat names except the few
    /// the combat resolver reads, and those are ordinary declared stats.
    StatId
}

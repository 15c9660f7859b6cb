use crate::frequency::FrequencyTable;
use crate::record::{Post, UNKNOWN_LOCATION};

///Counts posts per location.
///Posts without a location already carry [`UNKNOWN_LOCATION`] after loading, so a
///missing location and a literal `"Unknown"` end up in the same bucket. Empty
///strings on hand-built posts are folded into that bucket as well.
pub fn aggregate_locations<'a, I>(posts: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut frequency = FrequencyTable::new();
    for post in posts {
        let location = post.location.trim();
        let key = if location.is_empty() {
            UNKNOWN_LOCATION
        } else {
            location
        };
        *frequency.entry(key.to_string()).or_insert(0) += 1;
    }
    frequency
}

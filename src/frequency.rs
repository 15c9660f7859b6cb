use std::collections::HashMap;

/// Mapping from a key (word, phrase, hashtag, location) to its count.
pub type FrequencyTable = HashMap<String, usize>;

///Counts the occurrences of each item. Returns a [`FrequencyTable`].
/// # Example
/// ```
/// use social_pulse::count_items;
/// let counted = count_items(["one", "two", "two"]);
/// assert_eq!(counted["two"], 2);
/// assert_eq!(counted["one"], 1);
/// ```
pub fn count_items<I, S>(items: I) -> FrequencyTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut frequency = FrequencyTable::new();
    for item in items {
        let item = item.as_ref();
        match frequency.get_mut(item) {
            Some(n) => *n += 1,
            None => {
                frequency.insert(item.to_owned(), 1);
            }
        }
    }
    frequency
}

///Sorts a frequency table into a Vec: count descending, ties by key ascending.
/// # Example
/// ```
/// use social_pulse::{count_items, rank_by_count};
/// let ranked = rank_by_count(count_items(["b", "a", "c", "c"]));
/// let expected = vec![("c".to_string(), 2), ("a".to_string(), 1), ("b".to_string(), 1)];
/// assert_eq!(ranked, expected);
/// ```
pub fn rank_by_count(frequency: FrequencyTable) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Keep the first `k` entries of a ranked table.
pub fn top<T>(mut ranked: Vec<T>, k: usize) -> Vec<T> {
    ranked.truncate(k);
    ranked
}

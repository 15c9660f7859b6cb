use std::sync::LazyLock;

use regex::Regex;

use crate::frequency::FrequencyTable;
use crate::record::Post;

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid hashtag pattern"));

///Counts hashtags across texts. Matching works on the lowercased raw text (no
///tokenizer, no stopwords); the stored key omits the leading `#`.
///`None` entries are skipped.
/// # Example
/// ```
/// use social_pulse::extract_hashtags;
/// let tags = extract_hashtags([Some("Great results! #MARIPOSA #EGFR"), None, Some("# #egfr")]);
/// assert_eq!(tags["egfr"], 2);
/// assert_eq!(tags["mariposa"], 1);
/// assert_eq!(tags.len(), 2);
/// ```
pub fn extract_hashtags<'a, I>(texts: I) -> FrequencyTable
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut frequency = FrequencyTable::new();
    for text in texts.into_iter().flatten() {
        let lowered = text.to_lowercase();
        for cap in HASHTAG.captures_iter(&lowered) {
            *frequency.entry(cap[1].to_string()).or_insert(0) += 1;
        }
    }
    frequency
}

/// Hashtag counts over the content of `posts`.
pub fn post_hashtags<'a, I>(posts: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a Post>,
{
    extract_hashtags(posts.into_iter().map(|p| Some(p.content.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_and_stripped() {
        let tags = extract_hashtags([Some("#EGFR #egfr #Egfr"), Some("#Lung_Cancer2024")]);
        assert_eq!(tags["egfr"], 3);
        assert_eq!(tags["lung_cancer2024"], 1);
        assert!(tags.keys().all(|k| !k.starts_with('#')));
    }

    #[test]
    fn bare_hash_and_missing_entries_are_ignored() {
        let tags = extract_hashtags([Some("# nothing here #"), None, Some(""), Some("#!?")]);
        assert!(tags.is_empty());
    }

    #[test]
    fn ignores_tokenizer_rules() {
        // stopwords and short tags survive, urls are not stripped first
        let tags = extract_hashtags([Some("#the #ai see https://x.io/#frag")]);
        assert_eq!(tags["the"], 1);
        assert_eq!(tags["ai"], 1);
        assert_eq!(tags["frag"], 1);
    }
}

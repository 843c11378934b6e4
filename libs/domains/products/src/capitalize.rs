/// Display form of a facet label: every space-separated word gets an upper-case
/// first character and the rest lower-cased.
///
/// Consecutive spaces are kept, so the output has the same word boundaries as
/// the input.
///
/// ```
/// use domain_products::capitalize_words;
///
/// assert_eq!(capitalize_words("joHN doE"), "John Doe");
/// assert_eq!(capitalize_words(""), "");
/// ```
pub fn capitalize_words(input: &str) -> String {
    input
        .to_lowercase()
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

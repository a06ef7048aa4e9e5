use crate::models::EventType;

/// Ordered keyword table. Earlier rows win, so "sports betting politics"
/// classifies as sports.
const KEYWORD_TABLE: &[(&str, EventType)] = &[
    ("sport", EventType::Sports),
    ("nfl", EventType::Sports),
    ("nba", EventType::Sports),
    ("politic", EventType::Politics),
    ("election", EventType::Politics),
    ("crypto", EventType::Crypto),
    ("bitcoin", EventType::Crypto),
    ("finance", EventType::Crypto),
    ("pop", EventType::Pop),
    ("culture", EventType::Pop),
];

/// Classify free-text tags into an `EventType` by case-insensitive substring
/// match against the keyword table. First matching keyword wins; no match
/// means `Other`.
pub fn classify_tags<'a, I>(tags: I) -> EventType
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered: Vec<String> = tags.into_iter().map(|t| t.to_lowercase()).collect();

    for (keyword, event_type) in KEYWORD_TABLE {
        if lowered.iter().any(|tag| tag.contains(keyword)) {
            return *event_type;
        }
    }

    EventType::Other
}

use crate::models::NewsArticle;

/// Sentiment contribution per keyword hit.
const SENTIMENT_STEP: f64 = 15.0;

const POSITIVE_KEYWORDS: &[&str] = &[
    "win", "lead", "surge", "rally", "gain", "rise", "boost", "soar", "approve",
    "confirm", "success", "strong", "record", "breakthrough",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "lose", "loss", "drop", "fall", "crash", "decline", "fail", "reject", "deny",
    "scandal", "weak", "slump", "fear", "lawsuit",
];

/// An article is relevant to an option if the option name, or any of its
/// words longer than 3 characters, appears in the title + description
/// (case-insensitive).
pub fn is_relevant(option_name: &str, article: &NewsArticle) -> bool {
    let haystack = format!("{} {}", article.title, article.description).to_lowercase();
    let option_lower = option_name.to_lowercase();

    if haystack.contains(&option_lower) {
        return true;
    }

    option_lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 3)
        .any(|w| haystack.contains(w))
}

/// Sentiment for one article: the supplied value when the adapter scored it,
/// otherwise the keyword heuristic. Clamped to [-100, 100] either way.
pub fn article_sentiment(article: &NewsArticle) -> f64 {
    let score = article
        .sentiment
        .unwrap_or_else(|| heuristic_sentiment(article));
    score.clamp(-100.0, 100.0)
}

fn heuristic_sentiment(article: &NewsArticle) -> f64 {
    let text = format!("{} {}", article.title, article.description).to_lowercase();

    let positive: usize = POSITIVE_KEYWORDS
        .iter()
        .map(|kw| text.matches(kw).count())
        .sum();
    let negative: usize = NEGATIVE_KEYWORDS
        .iter()
        .map(|kw| text.matches(kw).count())
        .sum();

    SENTIMENT_STEP * (positive as f64 - negative as f64)
}

/// News score for an option: rounded mean sentiment over relevant articles,
/// 0 when none are relevant.
pub fn news_score(option_name: &str, articles: &[NewsArticle]) -> f64 {
    let sentiments: Vec<f64> = articles
        .iter()
        .filter(|a| is_relevant(option_name, a))
        .map(article_sentiment)
        .collect();

    if sentiments.is_empty() {
        return 0.0;
    }

    (sentiments.iter().sum::<f64>() / sentiments.len() as f64).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: &str) -> NewsArticle {
        NewsArticle {
            title: title.into(),
            description: description.into(),
            url: None,
            source: None,
            sentiment: None,
        }
    }

    #[test]
    fn relevance_matches_full_name_and_long_words() {
        let a = article("Lakers take game seven", "");
        assert!(is_relevant("Lakers", &a));
        assert!(is_relevant("Los Angeles Lakers", &a)); // "lakers" > 3 chars
        assert!(!is_relevant("Celtics", &a));
    }

    #[test]
    fn short_words_do_not_match_on_their_own() {
        // Only words longer than 3 characters participate in the word-level
        // match; the full option name is still checked as one substring.
        let a = article("the race for the senate", "");
        assert!(!is_relevant("Bob Day", &a));

        let b = article("election day looms", "");
        assert!(is_relevant("Election Night", &b)); // "election" > 3 chars
    }

    #[test]
    fn heuristic_counts_keyword_hits() {
        // "surge" + "rally" = +2 hits, no negatives: 15 * 2 = 30.
        let a = article("Bitcoin surge continues", "a broad rally in crypto");
        assert_eq!(article_sentiment(&a), 30.0);

        // "crash" + "fall" = -2 hits: -30.
        let b = article("Markets crash", "prices fall sharply");
        assert_eq!(article_sentiment(&b), -30.0);
    }

    #[test]
    fn supplied_sentiment_wins_over_heuristic() {
        let mut a = article("Bitcoin surge continues", "");
        a.sentiment = Some(-80.0);
        assert_eq!(article_sentiment(&a), -80.0);

        a.sentiment = Some(250.0);
        assert_eq!(article_sentiment(&a), 100.0);
    }

    #[test]
    fn score_is_rounded_mean_over_relevant_articles() {
        let articles = vec![
            article("Bitcoin surge continues", ""),        // +15
            article("Bitcoin rally gains steam", ""),      // gain+rally = +30
            article("Celtics lose again", ""),             // irrelevant
        ];
        // mean(15, 30) = 22.5 → 23
        assert_eq!(news_score("Bitcoin", &articles), 23.0);
    }

    #[test]
    fn no_relevant_articles_scores_zero() {
        let articles = vec![article("Celtics lose again", "")];
        assert_eq!(news_score("Bitcoin", &articles), 0.0);
        assert_eq!(news_score("Bitcoin", &[]), 0.0);
    }
}

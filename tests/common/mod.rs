use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use polysight::cache::MemoryAnalysisStore;
use polysight::models::{EventType, MarketEvent, NewsArticle, SocialSignal};
use polysight::polymarket::{RawEvent, RawOrderBook};
use polysight::services::{Analyzer, AnalyzerConfig};
use polysight::signals::{CollectorConfig, SignalCollector};
use polysight::sources::{
    MarketSource, ModelEstimate, ModelSource, NewsSource, SocialSource, SourceError,
};

pub const TEST_COOLDOWN_MINUTES: i64 = 5;

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

/// Binary crypto event with a 62/38 split.
#[allow(dead_code)]
pub fn binary_event() -> RawEvent {
    serde_json::from_value(json!({
        "title": "Will BTC close above 100k?",
        "slug": "btc-100k",
        "category": "Crypto",
        "tags": ["Crypto", "Bitcoin"],
        "endDate": "2026-12-31T00:00:00Z",
        "volume": "250000",
        "markets": [{
            "question": "Will BTC close above 100k?",
            "outcomePrices": "[\"0.62\", \"0.38\"]",
            "outcomes": "[\"Yes\", \"No\"]",
            "oneDayPriceChange": 0.02,
            "clobTokenIds": "[\"token-yes\", \"token-no\"]"
        }]
    }))
    .expect("binary event fixture")
}

/// Grouped politics event with five open sub-markets.
#[allow(dead_code)]
pub fn grouped_event() -> RawEvent {
    let markets: Vec<serde_json::Value> = (0..5)
        .map(|i| {
            json!({
                "groupItemTitle": format!("Candidate {}", i + 1),
                "outcomePrices": format!("[\"0.{}\", \"0.9\"]", 9 - i),
                "volume": format!("{}", (5 - i) * 10_000),
            })
        })
        .collect();

    serde_json::from_value(json!({
        "title": "Who wins the primary?",
        "slug": "primary-2026",
        "category": "Politics",
        "tags": ["Politics", "Elections"],
        "endDate": "2026-11-03T00:00:00Z",
        "volume": "150000",
        "markets": markets
    }))
    .expect("grouped event fixture")
}

// ---------------------------------------------------------------------------
// Mock sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum MarketScript {
    Event(Box<RawEvent>),
    Unavailable,
    RateLimited,
    NotFound,
}

/// Scripted market source. Responses are consumed front-to-back; the last
/// one repeats once the script runs dry.
pub struct MockMarket {
    script: Mutex<VecDeque<MarketScript>>,
    pub fetch_count: AtomicU32,
    pub book_fails: bool,
    pub book: RawOrderBook,
}

impl MockMarket {
    pub fn returning(event: RawEvent) -> Self {
        Self::scripted(vec![MarketScript::Event(Box::new(event))])
    }

    pub fn scripted(script: Vec<MarketScript>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fetch_count: AtomicU32::new(0),
            book_fails: false,
            book: RawOrderBook::default(),
        }
    }

    pub fn with_book(mut self, book: RawOrderBook) -> Self {
        self.book = book;
        self
    }

    pub fn with_failing_book(mut self) -> Self {
        self.book_fails = true;
        self
    }

    pub fn fetches(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    fn next(&self) -> MarketScript {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .unwrap_or(MarketScript::Unavailable)
        }
    }
}

#[async_trait]
impl MarketSource for MockMarket {
    async fn fetch_event(&self, slug: &str) -> Result<RawEvent, SourceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        match self.next() {
            MarketScript::Event(event) => Ok(*event),
            MarketScript::Unavailable => {
                Err(SourceError::Unexpected(format!("mock outage for {slug}")))
            }
            MarketScript::RateLimited => {
                Err(SourceError::RateLimited(format!("mock quota for {slug}")))
            }
            MarketScript::NotFound => Err(SourceError::NotFound(slug.to_string())),
        }
    }

    async fn fetch_order_book(&self, token_id: &str) -> Result<RawOrderBook, SourceError> {
        if self.book_fails {
            Err(SourceError::Unexpected(format!("mock book outage for {token_id}")))
        } else {
            Ok(self.book.clone())
        }
    }
}

pub struct MockNews {
    pub articles: Vec<NewsArticle>,
    pub fails: bool,
}

impl MockNews {
    pub fn empty() -> Self {
        Self {
            articles: Vec::new(),
            fails: false,
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            articles: Vec::new(),
            fails: true,
        }
    }
}

#[async_trait]
impl NewsSource for MockNews {
    async fn fetch_news(
        &self,
        _query: &str,
        _event_type: EventType,
    ) -> Result<Vec<NewsArticle>, SourceError> {
        if self.fails {
            Err(SourceError::Unexpected("mock news outage".into()))
        } else {
            Ok(self.articles.clone())
        }
    }
}

pub struct MockSocial {
    pub signal: SocialSignal,
    pub fails: bool,
    pub call_count: AtomicU32,
}

impl MockSocial {
    pub fn neutral() -> Self {
        Self {
            signal: SocialSignal::default(),
            fails: false,
            call_count: AtomicU32::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            signal: SocialSignal::default(),
            fails: true,
            call_count: AtomicU32::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SocialSource for MockSocial {
    async fn fetch_sentiment(
        &self,
        _option: &str,
        _event_title: &str,
        _event_type: EventType,
    ) -> Result<SocialSignal, SourceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fails {
            Err(SourceError::Unexpected("mock social outage".into()))
        } else {
            Ok(self.signal)
        }
    }
}

pub struct MockModel {
    pub scores: HashMap<String, f64>,
    pub rationale: Option<String>,
    pub fails: bool,
}

#[allow(dead_code)]
impl MockModel {
    pub fn with_scores(scores: &[(&str, f64)]) -> Self {
        Self {
            scores: scores
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            rationale: None,
            fails: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            scores: HashMap::new(),
            rationale: None,
            fails: true,
        }
    }
}

#[async_trait]
impl ModelSource for MockModel {
    async fn estimate(&self, _event: &MarketEvent) -> Result<ModelEstimate, SourceError> {
        if self.fails {
            Err(SourceError::Unexpected("mock model outage".into()))
        } else {
            Ok(ModelEstimate {
                scores: self.scores.clone(),
                rationale: self.rationale.clone(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub analyzer: Analyzer,
    pub store: Arc<MemoryAnalysisStore>,
    pub market: Arc<MockMarket>,
    pub social: Arc<MockSocial>,
}

/// Analyzer wired to in-memory store and mock sources. No pacing delay so
/// tests stay fast.
pub fn harness(market: MockMarket, news: MockNews, social: MockSocial) -> Harness {
    harness_with_model(market, news, social, None)
}

pub fn harness_with_model(
    market: MockMarket,
    news: MockNews,
    social: MockSocial,
    model: Option<MockModel>,
) -> Harness {
    let store = Arc::new(MemoryAnalysisStore::new());
    let market = Arc::new(market);
    let social = Arc::new(social);

    let collector = SignalCollector::new(
        Arc::new(news),
        social.clone(),
        model.map(|m| Arc::new(m) as Arc<dyn ModelSource>),
        CollectorConfig {
            call_timeout: Duration::from_secs(2),
            social_pacing: Duration::ZERO,
        },
    );

    let analyzer = Analyzer::new(
        market.clone(),
        collector,
        store.clone(),
        AnalyzerConfig {
            deadline: Duration::from_secs(10),
            rate_limit_cooldown_minutes: TEST_COOLDOWN_MINUTES,
        },
    );

    Harness {
        analyzer,
        store,
        market,
        social,
    }
}

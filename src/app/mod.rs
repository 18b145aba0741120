use std::collections::{HashMap, HashSet};

use futures::future;
use ratatui::layout::Rect;
use tracing::warn;

use crate::chart::{PinchTracker, Range};
use crate::config::Config;
use crate::data::manifold_api::ManifoldClient;
use crate::data::series::bets_to_series;
use crate::data::types::{Market, ProbPoint};

/// Which screen is visible. Selecting a market swaps to the detail screen
/// without discarding fetched data; going back swaps back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

/// Everything one initial load produces. Fetch failures for individual
/// markets have already degraded to absent entries / empty series.
pub struct LoadOutcome {
    pub markets: Vec<Market>,
    pub series: HashMap<String, Vec<ProbPoint>>,
}

/// Per-detail-view transient state, rebuilt whenever the selection changes.
pub struct DetailState {
    pub range: Range,
    pub hover: Option<usize>,
    pub pinch: PinchTracker,
    /// Anchor contact of an in-progress zoom drag; paired with the live
    /// pointer position it forms the pinch tracker's two contacts.
    pub pinch_anchor: Option<(u16, u16)>,
    /// Inner plot area of the last rendered frame, for mapping mouse
    /// positions back to point indices.
    pub plot_area: Option<Rect>,
}

impl DetailState {
    fn new() -> Self {
        Self {
            range: Range::All,
            hover: None,
            pinch: PinchTracker::new(),
            pinch_anchor: None,
            plot_area: None,
        }
    }
}

pub struct App {
    pub config: Config,
    pub markets: Vec<Market>,
    pub series: HashMap<String, Vec<ProbPoint>>,
    pub loading: bool,
    pub screen: Screen,
    pub cursor: usize,
    pub selected: Option<usize>,
    pub detail: DetailState,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            markets: Vec::new(),
            series: HashMap::new(),
            loading: true,
            screen: Screen::List,
            cursor: 0,
            selected: None,
            detail: DetailState::new(),
        }
    }

    /// Apply a finished load. Arriving after the user already drilled in is
    /// fine: the list under the detail view just fills in.
    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        self.markets = outcome.markets;
        self.series = outcome.series;
        self.loading = false;
        if self.cursor >= self.markets.len() {
            self.cursor = self.markets.len().saturating_sub(1);
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.markets.len() {
            self.cursor += 1;
        }
    }

    /// Drill into the market under the cursor. Gesture and hover state are
    /// scoped to one market, so they reset here.
    pub fn select_cursor(&mut self) {
        if self.cursor < self.markets.len() {
            self.selected = Some(self.cursor);
            self.detail = DetailState::new();
            self.screen = Screen::Detail;
        }
    }

    pub fn back_to_list(&mut self) {
        self.screen = Screen::List;
        self.selected = None;
        self.detail = DetailState::new();
    }

    pub fn selected_market(&self) -> Option<&Market> {
        self.selected.and_then(|i| self.markets.get(i))
    }

    pub fn series_for(&self, market_id: &str) -> &[ProbPoint] {
        self.series.get(market_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_range(&mut self, range: Range) {
        self.detail.range = range;
        self.detail.hover = None;
    }

    /// Points visible in the detail chart right now: the selected market's
    /// series put through range filtering and downsampling. Recomputed per
    /// frame so the cutoff tracks the clock.
    pub fn visible_points(&self) -> Vec<ProbPoint> {
        let Some(market) = self.selected_market() else {
            return Vec::new();
        };
        let now_ms = chrono::Utc::now().timestamp_millis();
        let filtered = crate::chart::filter_range(self.series_for(&market.id), self.detail.range, now_ms);
        crate::chart::scale::downsample(&filtered, crate::chart::scale::CHART_MAX_POINTS)
    }

    /// Average probability across loaded markets, as a whole percent.
    pub fn average_percent(&self) -> Option<u8> {
        if self.markets.is_empty() {
            return None;
        }
        let sum: f64 = self.markets.iter().map(|m| m.probability * 100.0).sum();
        Some((sum / self.markets.len() as f64).round().clamp(0.0, 100.0) as u8)
    }
}

/// Merge pinned markets with search results: pinned first, search fill
/// restricted to binary markets, de-duplicated by id, truncated to `max`.
pub fn merge_markets(pinned: Vec<Market>, searched: Vec<Market>, max: usize) -> Vec<Market> {
    let pinned_ids: HashSet<String> = pinned.iter().map(|m| m.id.clone()).collect();
    let fill = max.saturating_sub(pinned.len());

    let extras = searched
        .into_iter()
        .filter(|m| m.outcome_type == "BINARY" && !pinned_ids.contains(&m.id))
        .take(fill);

    pinned.into_iter().chain(extras).collect()
}

/// Fetch the whole dashboard: pinned lookups and the search fan out
/// together, then trade histories fan out per merged market. Every fetch is
/// individually guarded; failures degrade to absent markets or empty
/// series.
pub async fn load_dashboard(client: &ManifoldClient, config: &Config) -> LoadOutcome {
    let pinned_futures = config.dashboard.pinned_slugs.iter().map(|slug| async move {
        match client.fetch_market_by_slug(slug).await {
            Ok(market) => Some(market),
            Err(err) => {
                warn!("Pinned market lookup failed for {}: {}", slug, err);
                None
            }
        }
    });

    let search_future = async {
        match client
            .search_markets(&config.dashboard.search_term, config.dashboard.search_limit)
            .await
        {
            Ok(markets) => markets,
            Err(err) => {
                warn!("Market search failed: {}", err);
                Vec::new()
            }
        }
    };

    let (pinned_results, searched) =
        tokio::join!(future::join_all(pinned_futures), search_future);
    let pinned: Vec<Market> = pinned_results.into_iter().flatten().collect();

    let markets = merge_markets(pinned, searched, config.dashboard.max_markets);

    let bets_futures = markets.iter().map(|market| async move {
        match client.fetch_bets(&market.id, config.api.bets_limit).await {
            Ok(bets) => bets,
            Err(err) => {
                warn!("Bet history fetch failed for {}: {}", market.id, err);
                Vec::new()
            }
        }
    });
    let all_bets = future::join_all(bets_futures).await;

    let series = markets
        .iter()
        .zip(&all_bets)
        .map(|(market, bets)| (market.id.clone(), bets_to_series(bets)))
        .collect();

    LoadOutcome { markets, series }
}

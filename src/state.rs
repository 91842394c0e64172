// src/state.rs

use crate::analysis::comparison::{ComparisonSlots, PickStep};
use crate::analysis::query::{self, Filters, SearchOutcome};
use crate::analysis::trends::{self, TrendKey, TrendLevel, TrendSelection, TrendView};
use crate::config::{
    Accessibility, Config, PrefStore, Theme, KEY_ACCESSIBILITY, KEY_FAVORITES, KEY_QUIZ_BEST,
    KEY_QUIZ_STREAK, KEY_THEME,
};
use crate::error::{PtError, Result};
use crate::model::{find_element, Block, Category, Element, Series};
use crate::quiz::{QuizResults, QuizSession};
use std::collections::HashSet;

/// What the painter needs to know about one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileVisual {
    /// Filtered out: drawn faded and ignores clicks
    pub dimmed: bool,
    pub highlighted: bool,
    pub focused: bool,
    pub favorite: bool,
    /// None when no trend is active
    pub trend: Option<TrendLevel>,
}

pub struct AppState {
    pub elements: Vec<Element>,
    pub trend: Option<TrendView>,
    pub filters: Filters,
    pub search_query: String,
    pub search_hits: Vec<u32>,
    pub focused: Option<u32>,
    pub hovered: Option<u32>,
    /// f-block strip emphasized after clicking a La-Lu / Ac-Lr marker
    pub highlighted_series: Option<Series>,
    pub comparison: ComparisonSlots,
    pub quiz: Option<QuizSession>,
    pub config: Config,
    pub store: PrefStore,
    /// Resolved dark/light, including the system fallback
    pub dark: bool,
}

impl AppState {
    pub fn new(elements: Vec<Element>, store: PrefStore) -> Self {
        let (mut config, msg) = Config::load(&store);
        log::info!("{}", msg);

        let before = config.favorites.len();
        let mut seen = HashSet::new();
        config
            .favorites
            .retain(|z| find_element(&elements, *z).is_some() && seen.insert(*z));
        if config.favorites.len() != before {
            log::warn!("Dropped {} unknown favorites", before - config.favorites.len());
        }

        let dark = config.theme.map(Theme::is_dark).unwrap_or(false);
        Self {
            elements,
            trend: None,
            filters: Filters::default(),
            search_query: String::new(),
            search_hits: Vec::new(),
            focused: None,
            hovered: None,
            highlighted_series: None,
            comparison: ComparisonSlots::default(),
            quiz: None,
            config,
            store,
            dark,
        }
    }

    pub fn element(&self, atomic_number: u32) -> Option<&Element> {
        find_element(&self.elements, atomic_number)
    }

    // --- Trends ---

    /// "none" clears; unknown keys and empty trends leave the view untouched
    pub fn select_trend(&mut self, key: &str) -> Result<()> {
        let selection = match key.parse::<TrendSelection>() {
            Ok(s) => s,
            Err(e) => {
                log::error!("{}", e);
                return Err(e);
            }
        };

        match selection {
            TrendSelection::None => {
                if self.trend.take().is_some() {
                    log::info!("Trend cleared");
                }
                Ok(())
            }
            TrendSelection::Trend(k) => self.apply_trend(k),
        }
    }

    pub fn apply_trend(&mut self, key: TrendKey) -> Result<()> {
        match trends::compute(&self.elements, key) {
            Ok(view) => {
                log::info!(
                    "Showing trend: {} ({} of {} elements with data)",
                    view.definition().name,
                    view.count_known(),
                    self.elements.len()
                );
                self.trend = Some(view);
                Ok(())
            }
            Err(e) => {
                log::warn!("{}", e);
                Err(e)
            }
        }
    }

    pub fn active_trend(&self) -> Option<TrendKey> {
        self.trend.as_ref().map(|t| t.key)
    }

    // --- Search and filters ---

    pub fn set_search(&mut self, text: &str) -> SearchOutcome {
        self.search_query = text.to_string();
        let outcome = query::search(&self.elements, text);

        self.search_hits = outcome.matched().to_vec();
        match &outcome {
            SearchOutcome::Cleared => {}
            SearchOutcome::NoMatch => log::warn!("No element found for \"{}\"", text.trim()),
            SearchOutcome::Single(z) => {
                self.focused = Some(*z);
                if let Some(e) = self.element(*z) {
                    log::info!("Found {}", e.display_label());
                }
            }
            SearchOutcome::Many(list) => log::info!("Found {} elements", list.len()),
        }
        outcome
    }

    pub fn set_category_filter(&mut self, category: Option<Category>) {
        self.filters.category = category;
    }

    pub fn set_block_filter(&mut self, block: Option<Block>) {
        self.filters.block = block;
    }

    pub fn reset_filters(&mut self) {
        self.filters = Filters::default();
        self.search_query.clear();
        self.search_hits.clear();
        self.highlighted_series = None;
    }

    /// Dimmed tiles do not react to clicks
    pub fn is_interactive(&self, atomic_number: u32) -> bool {
        self.element(atomic_number).is_some_and(|e| self.filters.matches(e))
    }

    pub fn tile_visual(&self, element: &Element) -> TileVisual {
        let z = element.atomic_number;
        let in_strip = self.highlighted_series.is_some_and(|s| s == element.series);
        TileVisual {
            dimmed: !self.filters.matches(element),
            highlighted: self.search_hits.contains(&z) || in_strip,
            focused: self.focused == Some(z),
            favorite: self.is_favorite(z),
            trend: self.trend.as_ref().and_then(|t| t.level_of(z)),
        }
    }

    /// Toggled by the La-Lu / Ac-Lr markers
    pub fn toggle_series_highlight(&mut self, series: Series) {
        self.highlighted_series = match self.highlighted_series {
            Some(s) if s == series => None,
            _ => Some(series),
        };
    }

    // --- Favorites ---

    pub fn favorites(&self) -> &[u32] {
        &self.config.favorites
    }

    pub fn is_favorite(&self, atomic_number: u32) -> bool {
        self.config.favorites.contains(&atomic_number)
    }

    /// Returns the new membership
    pub fn toggle_favorite(&mut self, atomic_number: u32) -> Result<bool> {
        let label = self
            .element(atomic_number)
            .map(|e| e.name.clone())
            .ok_or(PtError::ElementNotFound(atomic_number))?;

        let now_favorite = if let Some(i) = self.config.favorites.iter().position(|z| *z == atomic_number) {
            self.config.favorites.remove(i);
            log::info!("{} removed from favorites", label);
            false
        } else {
            self.config.favorites.push(atomic_number);
            log::info!("{} added to favorites", label);
            true
        };
        self.store.set(KEY_FAVORITES, &self.config.favorites)?;
        Ok(now_favorite)
    }

    // --- Comparison ---

    pub fn pick_for_comparison(&mut self, atomic_number: u32) -> Result<PickStep> {
        if self.element(atomic_number).is_none() {
            log::error!("Element not found: {}", atomic_number);
            return Err(PtError::ElementNotFound(atomic_number));
        }
        let step = self.comparison.pick(atomic_number);
        if step == PickStep::FirstChosen {
            log::info!("Select the second element to compare");
        }
        Ok(step)
    }

    // --- Preferences ---

    pub fn set_theme(&mut self, theme: Option<Theme>, system_dark: bool) -> Result<()> {
        self.config.theme = theme;
        self.dark = theme.map(Theme::is_dark).unwrap_or(system_dark);
        match theme {
            Some(t) => self.store.set(KEY_THEME, &t)?,
            None => self.store.remove(KEY_THEME)?,
        }
        Ok(())
    }

    /// Flips the effective theme and pins it
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = if self.dark { Theme::Light } else { Theme::Dark };
        self.set_theme(Some(next), self.dark)?;
        log::info!("{} theme enabled", if next.is_dark() { "Dark" } else { "Light" });
        Ok(next)
    }

    pub fn set_accessibility(&mut self, accessibility: Accessibility) -> Result<()> {
        self.config.accessibility = accessibility;
        self.store.set(KEY_ACCESSIBILITY, &self.config.accessibility)
    }

    /// Screen-reader mode routes announcements through the log
    pub fn announce(&self, text: &str) {
        if self.config.accessibility.screen_reader_mode {
            log::info!("[announce] {}", text);
        }
    }

    // --- Quiz ---

    pub fn finish_quiz(&mut self) -> Option<QuizResults> {
        let session = self.quiz.as_ref()?;
        let results = session.finish(&mut self.config.quiz);
        if let Err(e) = self
            .store
            .set(KEY_QUIZ_BEST, &self.config.quiz.best_score)
            .and_then(|_| self.store.set(KEY_QUIZ_STREAK, &self.config.quiz.max_streak))
        {
            log::warn!("Could not save quiz records: {}", e);
        }
        Some(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::elements::fixtures::element;
    use tempfile::TempDir;

    fn sample() -> Vec<Element> {
        let mut h = element(1, "H", Some(1), 1);
        h.name = "Hydrogen".into();
        h.electronegativity = Some(2.20);
        h.category = Category::Nonmetal;
        h.block = Block::S;
        let mut li = element(3, "Li", Some(1), 2);
        li.name = "Lithium".into();
        li.electronegativity = Some(0.98);
        li.atomic_radius = Some(167.0);
        li.category = Category::AlkaliMetal;
        li.block = Block::S;
        let mut f = element(9, "F", Some(17), 2);
        f.name = "Fluorine".into();
        f.electronegativity = Some(3.98);
        f.atomic_radius = Some(42.0);
        f.category = Category::Halogen;
        f.block = Block::P;
        let la = element(57, "La", None, 6);
        vec![h, li, f, la]
    }

    fn state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let st = AppState::new(sample(), PrefStore::new(dir.path()));
        (st, dir)
    }

    fn markers(st: &AppState) -> Vec<Option<TrendLevel>> {
        st.elements.iter().map(|e| st.tile_visual(e).trend).collect()
    }

    #[test]
    fn test_trend_switch_replaces_markers() {
        let (mut st, _dir) = state();
        st.select_trend("electronegativity").unwrap();
        assert_eq!(st.tile_visual(&st.elements[0]).trend, Some(TrendLevel::Level(3)));

        st.select_trend("atomicRadius").unwrap();
        assert_eq!(st.active_trend(), Some(TrendKey::AtomicRadius));
        // Hydrogen has no radius here: unknown, not its old level
        assert_eq!(st.tile_visual(&st.elements[0]).trend, Some(TrendLevel::Unknown));
        assert_eq!(st.tile_visual(&st.elements[2]).trend, Some(TrendLevel::Level(5)));
    }

    #[test]
    fn test_none_clears_everything() {
        let (mut st, _dir) = state();
        st.select_trend("electronegativity").unwrap();
        st.select_trend("none").unwrap();
        assert!(markers(&st).iter().all(|m| m.is_none()));
        assert!(st.trend.is_none());
    }

    #[test]
    fn test_failed_trend_keeps_state() {
        let (mut st, _dir) = state();
        st.select_trend("electronegativity").unwrap();
        let before = st.trend.clone();

        assert!(matches!(st.select_trend("density"), Err(PtError::NoTrendData(_))));
        assert_eq!(st.trend, before);

        assert!(matches!(st.select_trend("colour"), Err(PtError::UnknownTrend(_))));
        assert_eq!(st.trend, before);
    }

    #[test]
    fn test_search_focuses_single_hit() {
        let (mut st, _dir) = state();
        assert_eq!(st.set_search("lith"), SearchOutcome::Single(3));
        assert_eq!(st.focused, Some(3));
        assert!(st.tile_visual(&st.elements[1]).highlighted);

        assert_eq!(st.set_search(""), SearchOutcome::Cleared);
        assert!(st.search_hits.is_empty());
    }

    #[test]
    fn test_filters_dim_and_block_clicks() {
        let (mut st, _dir) = state();
        st.set_block_filter(Some(Block::S));
        assert!(st.is_interactive(1));
        assert!(!st.is_interactive(9));
        assert!(st.tile_visual(&st.elements[2]).dimmed);

        st.set_category_filter(Some(Category::AlkaliMetal));
        assert!(!st.is_interactive(1));
        assert!(st.is_interactive(3));

        st.reset_filters();
        assert!(st.elements.iter().all(|e| !st.tile_visual(e).dimmed));
    }

    #[test]
    fn test_favorites_persist_and_drop_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefStore::new(dir.path());
        store.set(KEY_FAVORITES, &vec![9u32, 999]).unwrap();

        let mut st = AppState::new(sample(), store.clone());
        assert_eq!(st.favorites(), &[9]);

        assert!(st.toggle_favorite(1).unwrap());
        assert!(!st.toggle_favorite(9).unwrap());
        assert!(matches!(st.toggle_favorite(500), Err(PtError::ElementNotFound(500))));

        let reloaded = AppState::new(sample(), store);
        assert_eq!(reloaded.favorites(), &[1]);
        assert!(reloaded.tile_visual(&reloaded.elements[0]).favorite);
    }

    #[test]
    fn test_comparison_requires_known_element() {
        let (mut st, _dir) = state();
        assert!(st.pick_for_comparison(200).is_err());
        assert_eq!(st.pick_for_comparison(1).unwrap(), PickStep::FirstChosen);
        assert_eq!(st.pick_for_comparison(9).unwrap(), PickStep::Ready(1, 9));
    }

    #[test]
    fn test_theme_toggle_persists() {
        let (mut st, dir) = state();
        assert!(!st.dark);
        assert_eq!(st.toggle_theme().unwrap(), Theme::Dark);
        assert!(st.dark);

        let reloaded = AppState::new(sample(), PrefStore::new(dir.path()));
        assert_eq!(reloaded.config.theme, Some(Theme::Dark));
        assert!(reloaded.dark);
    }

    #[test]
    fn test_series_marker_highlight() {
        let (mut st, _dir) = state();
        st.toggle_series_highlight(Series::Lanthanide);
        assert!(st.tile_visual(&st.elements[3]).highlighted);
        st.toggle_series_highlight(Series::Lanthanide);
        assert!(!st.tile_visual(&st.elements[3]).highlighted);
    }
}

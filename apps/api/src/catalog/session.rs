use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::engine::recompute;
use crate::catalog::pagination::{clamp_page, page_markers, page_slice, total_pages, PageMarker};
use crate::catalog::query::{CatalogFilter, CatalogQuery, CategorySelection, SortMode};
use crate::catalog::random::RandomOrder;
use crate::models::notice::Notice;
use crate::models::prompt::Prompt;
use crate::prompts::repository::LoadedCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
}

/// Page sizes per device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    pub desktop: usize,
    pub mobile: usize,
}

impl PageSizes {
    pub fn for_device(&self, device: Device) -> usize {
        match device {
            Device::Desktop => self.desktop,
            Device::Mobile => self.mobile,
        }
    }
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            desktop: 32,
            mobile: 10,
        }
    }
}

/// A prompt as rendered on a card.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub prompt: Prompt,
    pub is_favorite: bool,
    pub cover: String,
}

/// Everything the presentation layer needs to draw one page.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub pages: Vec<PageMarker>,
    pub categories: Vec<String>,
    pub query: CatalogQuery,
    pub notices: Vec<Notice>,
}

/// Per-user catalog controller. Holds the latest query, the latest data and
/// the latest result; every change runs the pure engine again.
#[derive(Debug, Clone)]
pub struct CatalogSession {
    query: CatalogQuery,
    current_page: usize,
    page_size: usize,
    random: RandomOrder,
    prompts: Vec<Prompt>,
    favorites: HashSet<String>,
    categories: Vec<String>,
    notices: Vec<Notice>,
    result: Vec<Prompt>,
    loaded: bool,
}

impl CatalogSession {
    pub fn new(page_size: usize, sort: SortMode) -> Self {
        let query = CatalogQuery::default().with_sort(sort);
        let mut session = Self {
            query,
            current_page: 1,
            page_size: page_size.max(1),
            random: RandomOrder::default(),
            prompts: Vec::new(),
            favorites: HashSet::new(),
            categories: Vec::new(),
            notices: Vec::new(),
            result: Vec::new(),
            loaded: false,
        };
        session.recompute();
        session
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.result.len(), self.page_size)
    }

    /// Looks a prompt up in the latest listing, the flash prompt included.
    pub fn find(&self, id: &str) -> Option<&Prompt> {
        self.result
            .iter()
            .find(|p| p.id == id)
            .or_else(|| self.prompts.iter().find(|p| p.id == id))
    }

    fn recompute(&mut self) {
        self.result = recompute(&self.prompts, &self.favorites, &self.query, &self.random);
    }

    /// Query changes always land on the first page.
    fn apply_query(&mut self, query: CatalogQuery) {
        self.query = query;
        self.recompute();
        self.current_page = 1;
    }

    /// Data changes keep the page unless it no longer exists.
    fn clamp_after_data_change(&mut self) {
        let total = self.total_pages();
        if total > 0 && self.current_page > total {
            self.current_page = total;
        }
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        let query = self.query.clone().with_keyword(keyword);
        self.apply_query(query);
    }

    pub fn set_category(&mut self, category: CategorySelection) {
        let query = self.query.clone().with_category(category);
        self.apply_query(query);
    }

    pub fn toggle_filter(&mut self, filter: CatalogFilter) {
        let query = self.query.clone().with_filter_toggled(filter);
        self.apply_query(query);
    }

    /// Flips between recommend and random. Entering random mode draws fresh
    /// keys for every known prompt. Returns the new mode.
    pub fn toggle_sort(&mut self) -> SortMode {
        let sort = self.query.sort.toggled();
        if sort == SortMode::Random {
            self.reshuffle_keys();
        }
        let query = self.query.clone().with_sort(sort);
        self.apply_query(query);
        sort
    }

    fn reshuffle_keys(&mut self) {
        self.random
            .reshuffle(self.prompts.iter().map(|p| p.id.as_str()));
        debug!("Drew {} fresh random sort keys", self.random.len());
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp_after_data_change();
    }

    pub fn set_page(&mut self, page: i64) {
        self.current_page = clamp_page(page, self.current_page, self.total_pages());
    }

    pub fn change_page(&mut self, delta: i64) {
        let target = (self.current_page as i64).saturating_add(delta);
        self.set_page(target);
    }

    /// Swaps in a freshly loaded catalog. The very first load starts on page 1;
    /// later loads only clamp.
    pub fn replace_data(&mut self, catalog: LoadedCatalog, favorites: HashSet<String>) {
        self.prompts = catalog.prompts;
        self.categories = catalog.categories;
        self.notices = catalog.notices;
        self.favorites = favorites;
        self.random.ensure(self.prompts.iter().map(|p| p.id.as_str()));
        self.recompute();

        if self.loaded {
            self.clamp_after_data_change();
        } else {
            self.current_page = 1;
            self.loaded = true;
        }
    }

    pub fn replace_favorites(&mut self, favorites: HashSet<String>) {
        self.favorites = favorites;
        self.recompute();
        self.clamp_after_data_change();
    }

    pub fn push_notice(&mut self, notice: Notice) {
        crate::models::notice::push_notice(&mut self.notices, notice);
    }

    pub fn view(&self) -> CatalogPage {
        let total = self.total_pages();
        let items = page_slice(&self.result, self.current_page, self.page_size)
            .iter()
            .map(|p| CatalogItem {
                is_favorite: self.favorites.contains(&p.id),
                cover: p.cover_image().to_string(),
                prompt: p.clone(),
            })
            .collect();

        CatalogPage {
            items,
            current_page: self.current_page,
            total_pages: total,
            total_items: self.result.len(),
            page_size: self.page_size,
            pages: page_markers(self.current_page, total),
            categories: self.categories.clone(),
            query: self.query.clone(),
            notices: self.notices.clone(),
        }
    }
}

#[cfg(test)]
impl CatalogSession {
    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn result(&self) -> &[Prompt] {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prompt::PromptMode;

    fn make_prompt(id: &str, custom: bool) -> Prompt {
        Prompt {
            id: id.to_string(),
            title: format!("Prompt {id}"),
            prompt: "body".to_string(),
            author: "someone".to_string(),
            category: if custom { "Mine".into() } else { "Portrait".into() },
            sub_category: None,
            mode: Some(PromptMode::Generate),
            preview: None,
            previews: None,
            link: None,
            is_custom: custom,
            is_flash: false,
            is_daily: false,
        }
    }

    fn catalog(n: usize) -> LoadedCatalog {
        let prompts: Vec<Prompt> = (0..n).map(|i| make_prompt(&format!("p{i}"), false)).collect();
        LoadedCatalog {
            categories: vec!["Portrait".into()],
            prompts,
            notices: vec![],
        }
    }

    fn loaded_session(n: usize, page_size: usize) -> CatalogSession {
        let mut session = CatalogSession::new(page_size, SortMode::Recommend);
        session.replace_data(catalog(n), HashSet::new());
        session
    }

    #[test]
    fn test_empty_session_shows_only_flash() {
        let session = CatalogSession::new(32, SortMode::Recommend);
        let view = session.view();
        assert_eq!(view.total_items, 1);
        assert!(view.items[0].prompt.is_flash);
        assert_eq!(view.total_pages, 1);
    }

    #[test]
    fn test_pagination_clamps() {
        // 104 prompts + flash = 105 items
        let mut session = loaded_session(104, 32);
        assert_eq!(session.total_pages(), 4);

        session.set_page(0);
        assert_eq!(session.current_page(), 1);
        session.set_page(99);
        assert_eq!(session.current_page(), 4);
        assert_eq!(session.view().items.len(), 9);

        session.change_page(1);
        assert_eq!(session.current_page(), 4);
        session.change_page(-1);
        assert_eq!(session.current_page(), 3);
    }

    #[test]
    fn test_page_step_saturates_on_extreme_deltas() {
        // 100 prompts + flash = 101 items over 11 pages
        let mut session = loaded_session(100, 10);
        session.set_page(2);

        session.change_page(i64::MAX);
        assert_eq!(session.current_page(), 11);

        session.change_page(i64::MIN);
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_query_changes_reset_page() {
        let mut session = loaded_session(104, 32);

        session.set_page(3);
        session.set_keyword("prompt");
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.toggle_filter(CatalogFilter::Generate);
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.set_category(CategorySelection::All);
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.toggle_sort();
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_data_change_keeps_page_but_clamps() {
        let mut session = loaded_session(104, 32);
        session.set_page(3);

        session.replace_data(catalog(100), HashSet::new());
        assert_eq!(session.current_page(), 3);

        session.replace_data(catalog(40), HashSet::new());
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_first_load_starts_at_page_one() {
        let mut session = CatalogSession::new(10, SortMode::Recommend);
        session.set_page(5);
        session.replace_data(catalog(50), HashSet::new());
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_random_order_is_stable_until_reshuffle() {
        let mut session = loaded_session(50, 100);
        assert_eq!(session.toggle_sort(), SortMode::Random);
        let first: Vec<String> = session.result().iter().map(|p| p.id.clone()).collect();

        session.set_keyword("");
        session.replace_favorites(HashSet::new());
        session.replace_data(catalog(50), HashSet::new());
        let second: Vec<String> = session.result().iter().map(|p| p.id.clone()).collect();
        assert_eq!(first, second);

        assert_eq!(session.toggle_sort(), SortMode::Recommend);
        let recommend: Vec<String> = session.result().iter().map(|p| p.id.clone()).collect();
        assert_eq!(recommend[1], "p0");
        assert_eq!(recommend[50], "p49");
    }

    #[test]
    fn test_favorite_toggle_moves_item_to_front() {
        let mut session = loaded_session(5, 32);
        session.replace_favorites(["p3".to_string()].into_iter().collect());

        let view = session.view();
        assert_eq!(view.items[1].prompt.id, "p3");
        assert!(view.items[1].is_favorite);
        assert!(!view.items[2].is_favorite);
    }

    #[test]
    fn test_page_size_follows_device() {
        let sizes = PageSizes::default();
        assert_eq!(sizes.for_device(Device::Mobile), 10);
        assert_eq!(sizes.for_device(Device::Desktop), 32);

        let mut session = loaded_session(40, sizes.desktop);
        session.set_page(2);
        session.set_page_size(sizes.for_device(Device::Mobile));
        assert_eq!(session.total_pages(), 5);
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_find_covers_flash_and_filtered_out_prompts() {
        let mut session = loaded_session(3, 32);
        session.set_keyword("zzz");
        assert!(session.find(crate::catalog::flash::FLASH_PROMPT_ID).is_some());
        assert!(session.find("p2").is_some());
        assert!(session.find("missing").is_none());
    }
}

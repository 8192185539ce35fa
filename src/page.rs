//! Page identification and per-page initialization.

use crate::app::App;
use crate::presenter::Effect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const CARD_STAGGER_MS: u64 = 100;
const HINTS_PER_PAGE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Dashboard,
    Scanner,
    Weather,
    Market,
    Passport,
    Results,
    Home,
}

impl PageType {
    pub const ALL: [PageType; 7] = [
        PageType::Dashboard,
        PageType::Scanner,
        PageType::Weather,
        PageType::Market,
        PageType::Passport,
        PageType::Results,
        PageType::Home,
    ];

    /// Resolve a request path. The first page name the path contains wins;
    /// anything else is the home page.
    pub fn from_path(path: &str) -> Self {
        let path = path.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .filter(|page| *page != PageType::Home)
            .find(|page| path.contains(page.as_str()))
            .unwrap_or(PageType::Home)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Dashboard => "dashboard",
            PageType::Scanner => "scanner",
            PageType::Weather => "weather",
            PageType::Market => "market",
            PageType::Passport => "passport",
            PageType::Results => "results",
            PageType::Home => "home",
        }
    }
}

/// Translation keys of the spoken-question hints offered on `page`.
pub fn contextual_hints(page: PageType) -> Vec<String> {
    let group = match page {
        PageType::Results => "results",
        PageType::Market => "market",
        PageType::Weather => "weather",
        _ => "default",
    };
    (0..HINTS_PER_PAGE)
        .map(|i| format!("hint.{}.{}", group, i))
        .collect()
}

pub type PageInit = fn(&mut App);

/// Typed dispatch table from page to its initializer.
pub struct PageRegistry {
    handlers: HashMap<PageType, PageInit>,
}

impl PageRegistry {
    pub fn standard() -> Self {
        let mut handlers: HashMap<PageType, PageInit> = HashMap::new();
        for page in PageType::ALL {
            handlers.insert(page, standard_init(page));
        }
        Self { handlers }
    }

    /// Replace the initializer for one page.
    pub fn register(&mut self, page: PageType, init: PageInit) {
        self.handlers.insert(page, init);
    }

    pub fn covers(&self, page: PageType) -> bool {
        self.handlers.contains_key(&page)
    }

    pub fn dispatch(&self, page: PageType, app: &mut App) {
        if let Some(init) = self.handlers.get(&page) {
            init(app);
        }
    }
}

fn standard_init(page: PageType) -> PageInit {
    match page {
        PageType::Dashboard => init_dashboard,
        PageType::Scanner => init_scanner,
        PageType::Weather => init_weather,
        PageType::Market => init_market,
        PageType::Passport => init_passport,
        PageType::Results => init_results,
        PageType::Home => init_home,
    }
}

fn init_dashboard(app: &mut App) {
    app.animate(Effect::SlideUp {
        target: "card".to_string(),
        stagger_ms: CARD_STAGGER_MS,
    });
    app.load_dashboard();
    app.show_hints();
}

fn init_scanner(app: &mut App) {
    app.clear_upload();
}

fn init_weather(app: &mut App) {
    app.animate(Effect::SlideUp {
        target: "forecast-day".to_string(),
        stagger_ms: CARD_STAGGER_MS,
    });
    app.show_hints();
}

fn init_market(app: &mut App) {
    app.animate(Effect::FadeIn {
        target: "price-card".to_string(),
    });
    app.show_hints();
}

fn init_passport(_app: &mut App) {}

fn init_results(app: &mut App) {
    app.show_hints();
}

fn init_home(app: &mut App) {
    app.animate(Effect::FadeIn {
        target: "hero-section".to_string(),
    });
    app.show_hints();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_pages_from_paths() {
        assert_eq!(PageType::from_path("/dashboard"), PageType::Dashboard);
        assert_eq!(PageType::from_path("/scanner/upload"), PageType::Scanner);
        assert_eq!(PageType::from_path("/Weather"), PageType::Weather);
        assert_eq!(PageType::from_path("/market-prices"), PageType::Market);
        assert_eq!(PageType::from_path("/passport/42"), PageType::Passport);
        assert_eq!(PageType::from_path("/results?id=7"), PageType::Results);
        assert_eq!(PageType::from_path("/"), PageType::Home);
        assert_eq!(PageType::from_path("/about"), PageType::Home);
    }

    #[test]
    fn registry_covers_every_page() {
        let registry = PageRegistry::standard();
        for page in PageType::ALL {
            assert!(registry.covers(page), "{:?} has no initializer", page);
        }
    }

    #[test]
    fn hints_depend_on_page() {
        assert_eq!(contextual_hints(PageType::Market)[0], "hint.market.0");
        assert_eq!(contextual_hints(PageType::Results).len(), 3);
        assert_eq!(contextual_hints(PageType::Scanner)[2], "hint.default.2");
    }
}

//! Static page table: every guarded dashboard route and the template it renders.
//!
//! All pages are structurally identical. They differ only in path, title,
//! asset category, and template name.

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/dashboard";

pub const LOGIN_TEMPLATE: &str = "login.html";
pub const DASHBOARD_TEMPLATE: &str = "dashboard.html";
pub const ASSET_TEMPLATE: &str = "asset_page.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Overview,
    Substation,
    Hvds,
    Line33kv,
    Line11kv,
    Other,
}

impl Category {
    /// Display order for navigation.
    pub const ALL: [Self; 6] = [Self::Overview, Self::Substation, Self::Hvds, Self::Line33kv, Self::Line11kv, Self::Other];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Substation => "Substations & Feeders",
            Self::Hvds => "HVDS Transformers",
            Self::Line33kv => "33kV Line Works",
            Self::Line11kv => "11kV Line Works",
            Self::Other => "Other Works",
        }
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Substation => "substation",
            Self::Hvds => "hvds",
            Self::Line33kv => "line-33kv",
            Self::Line11kv => "line-11kv",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Page {
    pub path: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub template: &'static str,
}

const fn asset(path: &'static str, title: &'static str, category: Category) -> Page {
    Page { path, title, category, template: ASSET_TEMPLATE }
}

pub static PAGES: &[Page] = &[
    Page { path: LANDING_PATH, title: "Dashboard", category: Category::Overview, template: DASHBOARD_TEMPLATE },
    asset("/substations", "33/11kV Substations", Category::Substation),
    asset("/power-transformers", "Power Transformers", Category::Substation),
    asset("/feeders-33kv", "33kV Feeders", Category::Substation),
    asset("/feeders-11kv", "11kV Feeders", Category::Substation),
    asset("/hvds/16kva", "HVDS 16 kVA Transformers", Category::Hvds),
    asset("/hvds/25kva", "HVDS 25 kVA Transformers", Category::Hvds),
    asset("/hvds/63kva", "HVDS 63 kVA Transformers", Category::Hvds),
    asset("/hvds/100kva", "HVDS 100 kVA Transformers", Category::Hvds),
    asset("/hvds/160kva", "HVDS 160 kVA Transformers", Category::Hvds),
    asset("/hvds/250kva", "HVDS 250 kVA Transformers", Category::Hvds),
    asset("/lines-33kv/new", "33kV New Lines", Category::Line33kv),
    asset("/lines-33kv/augmentation", "33kV Line Augmentation", Category::Line33kv),
    asset("/lines-33kv/reconductoring", "33kV Line Reconductoring", Category::Line33kv),
    asset("/lines-33kv/maintenance", "33kV Line Maintenance", Category::Line33kv),
    asset("/lines-11kv/new", "11kV New Lines", Category::Line11kv),
    asset("/lines-11kv/augmentation", "11kV Line Augmentation", Category::Line11kv),
    asset("/lines-11kv/reconductoring", "11kV Line Reconductoring", Category::Line11kv),
    asset("/lines-11kv/maintenance", "11kV Line Maintenance", Category::Line11kv),
    asset("/lt-lines", "LT Lines", Category::Other),
    asset("/priority-works", "Priority Works", Category::Other),
];

#[must_use]
pub fn find(path: &str) -> Option<&'static Page> {
    PAGES.iter().find(|page| page.path == path)
}

pub fn in_category(category: Category) -> impl Iterator<Item = &'static Page> {
    PAGES.iter().filter(move |page| page.category == category)
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;

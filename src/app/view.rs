//! Presentation-only state shared by every page: routes, navigation bar, image overlay.

use serde::Serialize;
use utoipa::ToSchema;

/// Scroll offset (px) past which the navigation bar switches to its solid style.
pub const SCROLL_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Search,
    AddItem,
    Dashboard,
    RemoveItem,
    NotFound,
}

/// Drops trailing slashes, keeping the root as `/`.
pub fn normalize_path(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

impl Route {
    /// `/` and `/search` both land on the search page; anything unknown is `NotFound`.
    pub fn resolve(path: &str) -> Route {
        match normalize_path(path) {
            "/" | "/search" => Route::Search,
            "/add-item" => Route::AddItem,
            "/dashboard" => Route::Dashboard,
            "/remove-item" => Route::RemoveItem,
            _ => Route::NotFound,
        }
    }
}

/// (label, path) in display order.
pub const NAV_LINKS: [(&str, &str); 5] = [
    ("Home", "/"),
    ("Search Parts", "/search"),
    ("Add Item", "/add-item"),
    ("Dashboard", "/dashboard"),
    ("Remove Item", "/remove-item"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavLink {
    pub label: String,
    pub path: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavBar {
    pub links: Vec<NavLink>,
    pub scrolled: bool,
}

impl NavBar {
    /// A link is active only when its path equals the (normalized) current path.
    pub fn for_path(current_path: &str) -> Self {
        let current_path = normalize_path(current_path);
        let links = NAV_LINKS
            .iter()
            .map(|(label, path)| NavLink {
                label: label.to_string(),
                path: path.to_string(),
                active: *path == current_path,
            })
            .collect();
        NavBar {
            links,
            scrolled: false,
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.scrolled = scroll_y > SCROLL_THRESHOLD;
    }

    pub fn active(&self) -> Option<&NavLink> {
        self.links.iter().find(|l| l.active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    ClickOutside,
    ClickImage,
    CloseButton,
    Key(&'static str),
}

/// Full-screen image preview. Page scroll is locked exactly while an image is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOverlay {
    image_url: Option<String>,
}

impl ImageOverlay {
    pub fn open(&mut self, image_url: impl Into<String>) {
        self.image_url = Some(image_url.into());
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.image_url.is_some()
    }

    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    /// Returns true when the event closed the overlay.
    pub fn handle(&mut self, event: OverlayEvent) -> bool {
        if !self.is_open() {
            return false;
        }
        let closes = match event {
            OverlayEvent::ClickOutside | OverlayEvent::CloseButton => true,
            OverlayEvent::Key(key) => key == "Escape",
            OverlayEvent::ClickImage => false,
        };
        if closes {
            self.image_url = None;
        }
        closes
    }
}

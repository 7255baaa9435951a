//! Route descriptors for the pages under test.
//!
//! A route is a path on the target storefront plus a short name (used for
//! screenshot file names) and a human-readable description. The list is
//! fixed at the start of a run and never mutated.

use serde::{Deserialize, Serialize};

/// Path segment that marks a route as Arabic-locale.
const ARABIC_SEGMENT: &str = "/ar/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Path relative to the base URL (e.g., "/en/shop").
    pub path: String,
    /// Short name used for the screenshot file (e.g., "shop_en").
    pub name: String,
    pub description: String,
    /// Whether to attempt a dark-mode toggle before capturing.
    #[serde(default, alias = "dark_mode")]
    pub dark_mode: bool,
}

impl Route {
    pub fn new(path: &str, name: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            dark_mode: false,
        }
    }

    pub fn dark(path: &str, name: &str, description: &str) -> Self {
        Self {
            dark_mode: true,
            ..Self::new(path, name, description)
        }
    }

    /// Arabic-locale routes must render with `dir="rtl"` on the root element.
    pub fn is_arabic(&self) -> bool {
        self.path.contains(ARABIC_SEGMENT)
    }
}

/// The default storefront route list, ending with the dark-mode shop visit.
pub fn default_routes() -> Vec<Route> {
    vec![
        Route::new("/en/shop", "shop_en", "Shop Page (English)"),
        Route::new("/ar/shop", "shop_ar", "Shop Page (Arabic/RTL)"),
        Route::new("/en/login", "login_en", "Login Page (English)"),
        Route::new("/ar/login", "login_ar", "Login Page (Arabic/RTL)"),
        Route::new(
            "/en/dashboard",
            "dashboard_en",
            "Dashboard (English) - requires auth",
        ),
        Route::new("/en/orders", "orders_en", "Orders (English) - requires auth"),
        Route::new(
            "/en/invoices",
            "invoices_en",
            "Invoices (English) - requires auth",
        ),
        Route::dark("/en/shop", "shop_en_dark", "Shop Page (English) - Dark Mode"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes_cover_both_locales() {
        let routes = default_routes();
        assert_eq!(routes.len(), 8);
        assert!(routes.iter().any(|r| r.path == "/en/shop"));
        assert!(routes.iter().any(|r| r.path == "/ar/shop"));
        assert!(routes.iter().any(|r| r.path == "/ar/login"));
    }

    #[test]
    fn dark_mode_visit_is_last() {
        let routes = default_routes();
        let last = routes.last().unwrap();
        assert!(last.dark_mode);
        assert_eq!(last.name, "shop_en_dark");
        assert_eq!(last.path, "/en/shop");
        assert!(routes[..routes.len() - 1].iter().all(|r| !r.dark_mode));
    }

    #[test]
    fn arabic_detection_uses_path_segment() {
        assert!(Route::new("/ar/login", "login_ar", "").is_arabic());
        assert!(!Route::new("/en/login", "login_en", "").is_arabic());
        // "ar" must be a full segment, not a substring of another word.
        assert!(!Route::new("/cart", "cart", "").is_arabic());
    }

    #[test]
    fn route_accepts_snake_case_dark_mode_from_config() {
        let route: Route =
            toml::from_str("path = \"/en/shop\"\nname = \"shop\"\ndescription = \"Shop\"\ndark_mode = true\n")
                .unwrap();
        assert!(route.dark_mode);
    }
}

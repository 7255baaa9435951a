//! Selector heuristics for probing the storefront's DOM.
//!
//! Every check is backed by an ordered list of selector candidates tried
//! first-match-wins, so the target site's markup can evolve without code
//! changes: override any list in the config file's `[selectors]` table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorSet {
    /// Theme toggle controls, most specific first.
    #[serde(alias = "theme_toggle")]
    pub theme_toggle: Vec<String>,
    #[serde(alias = "product_card")]
    pub product_card: Vec<String>,
    #[serde(alias = "search_input")]
    pub search_input: Vec<String>,
    #[serde(alias = "category_button")]
    pub category_button: Vec<String>,
    pub hero: Vec<String>,
    pub price: Vec<String>,
    #[serde(alias = "stock_badge")]
    pub stock_badge: Vec<String>,
    /// Anchors pointing at product detail pages.
    #[serde(alias = "product_link")]
    pub product_link: Vec<String>,
    #[serde(alias = "detail_image")]
    pub detail_image: Vec<String>,
    #[serde(alias = "detail_name")]
    pub detail_name: Vec<String>,
    #[serde(alias = "detail_price")]
    pub detail_price: Vec<String>,
    #[serde(alias = "add_to_cart")]
    pub add_to_cart: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            theme_toggle: strings(&[
                r#"button[aria-label*="theme"]"#,
                r#"button[aria-label*="dark"]"#,
                "[data-theme-toggle]",
                "button:has(svg.lucide-moon)",
                "button:has(svg.lucide-sun)",
            ]),
            product_card: strings(&[r#"[class*="card"]"#]),
            search_input: strings(&[
                r#"input[type="search"]"#,
                r#"input[placeholder*="search" i]"#,
                r#"input[placeholder*="Search" i]"#,
            ]),
            category_button: strings(&[
                r#"button:has-text("All")"#,
                r#"button:has-text("الكل")"#,
            ]),
            hero: strings(&[".gradient-hero", r#"[class*="hero"]"#]),
            price: strings(&[
                r#"[class*="price"]"#,
                r#":text("IQD")"#,
                r#":text("د.ع")"#,
            ]),
            stock_badge: strings(&[
                r#"[class*="badge"]:has-text("Stock")"#,
                r#"[class*="badge"]:has-text("متوفر")"#,
            ]),
            product_link: strings(&[r#"a[href*="/shop/"]"#]),
            detail_image: strings(&["img[alt]", r#"[class*="image"]"#]),
            detail_name: strings(&["h1", "h2"]),
            detail_price: strings(&[r#"[class*="price"]"#, r#":text("IQD")"#]),
            add_to_cart: strings(&[
                r#"button:has-text("Add")"#,
                r#"button:has-text("أضف")"#,
            ]),
        }
    }
}

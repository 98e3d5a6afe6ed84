//! Window menu shown for the active window (minimize / maximize / close)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Point;

/// Entry of the window menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItem {
    Minimize,
    Maximize,
    Close,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Minimize, MenuItem::Maximize, MenuItem::Close];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Minimize => "Minimize",
            MenuItem::Maximize => "Maximize",
            MenuItem::Close => "Close",
        }
    }
}

impl FromStr for MenuItem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        MenuItem::ALL
            .into_iter()
            .find(|item| item.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown menu item: {}", s))
    }
}

/// Menu anchored just below a window's title bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMenu {
    pub window_id: String,
    pub position: Point,
    pub items: Vec<MenuItem>,
}

impl WindowMenu {
    pub fn new(window_id: &str, position: Point) -> Self {
        Self {
            window_id: window_id.to_string(),
            position,
            items: MenuItem::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_all_items_in_order() {
        let menu = WindowMenu::new("notes", Point::new(10.0, 60.0));
        let labels: Vec<&str> = menu.items.iter().map(|item| item.label()).collect();
        assert_eq!(labels, vec!["Minimize", "Maximize", "Close"]);
    }

    #[test]
    fn test_item_parsing() {
        assert_eq!("close".parse::<MenuItem>().unwrap(), MenuItem::Close);
        assert!("resize".parse::<MenuItem>().is_err());
    }
}

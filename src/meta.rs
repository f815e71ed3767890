//! Per-route presentation metadata.
//!
//! A route declares a [`RouteMeta`]; the shell reads the effective values
//! through [`ShellChrome`], which fills in defaults for anything omitted.
//! The registry never acts on these flags itself.
//!
//! | key               | type   | default |
//! |-------------------|--------|---------|
//! | `title`           | string | required (root falls back to its name) |
//! | `hideThemeToggle` | bool   | `false` |
//! | `hideTabbar`      | bool   | `false` |
//!
//! Any other key is carried through untouched in [`RouteMeta::extra`].
//!
//! # Example
//!
//! ```
//! use shell_navigator::RouteMeta;
//!
//! let meta = RouteMeta::titled("数据填报").hide_theme_toggle(true);
//! let chrome = meta.effective("Filling");
//! assert!(chrome.hide_theme_toggle);
//! assert!(!chrome.hide_tabbar);
//! assert_eq!(chrome.title, "数据填报");
//! ```

use std::collections::BTreeMap;

/// Metadata key for the display title.
pub const TITLE: &str = "title";
/// Metadata key for hiding the theme switcher.
pub const HIDE_THEME_TOGGLE: &str = "hideThemeToggle";
/// Metadata key for hiding the tab bar.
pub const HIDE_TABBAR: &str = "hideTabbar";

/// Metadata as declared on a route. Unset fields mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: Option<String>,
    pub hide_theme_toggle: Option<bool>,
    pub hide_tabbar: Option<bool>,
    /// Keys the registry does not recognize.
    pub extra: BTreeMap<String, String>,
}

impl RouteMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata with just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn hide_theme_toggle(mut self, hide: bool) -> Self {
        self.hide_theme_toggle = Some(hide);
        self
    }

    pub fn hide_tabbar(mut self, hide: bool) -> Self {
        self.hide_tabbar = Some(hide);
        self
    }

    /// Attach an opaque key the shell may interpret.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Resolve declared values against the defaults.
    ///
    /// `fallback_title` is used only when no title was declared, which the
    /// tree allows for the root alone.
    pub fn effective(&self, fallback_title: &str) -> ShellChrome {
        ShellChrome {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| fallback_title.to_string()),
            hide_theme_toggle: self.hide_theme_toggle.unwrap_or(false),
            hide_tabbar: self.hide_tabbar.unwrap_or(false),
            extra: self.extra.clone(),
        }
    }
}

/// A single metadata value, as returned by [`ShellChrome::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue<'a> {
    Text(&'a str),
    Flag(bool),
}

/// Effective metadata for the shell: every recognized key has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellChrome {
    pub title: String,
    pub hide_theme_toggle: bool,
    pub hide_tabbar: bool,
    pub extra: BTreeMap<String, String>,
}

impl ShellChrome {
    /// Look a value up by its metadata key (`"title"`, `"hideTabbar"`, ...).
    pub fn get(&self, key: &str) -> Option<MetaValue<'_>> {
        match key {
            TITLE => Some(MetaValue::Text(&self.title)),
            HIDE_THEME_TOGGLE => Some(MetaValue::Flag(self.hide_theme_toggle)),
            HIDE_TABBAR => Some(MetaValue::Flag(self.hide_tabbar)),
            other => self.extra.get(other).map(|v| MetaValue::Text(v.as_str())),
        }
    }
}

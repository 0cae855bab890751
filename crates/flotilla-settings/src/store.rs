//! The process-wide settings catalogue.

use std::sync::Arc;

use crate::model::{AppColor, SearchSort, Theme, TorrentFilter, TorrentSort};
use crate::preference::Preference;
use crate::storage::KeyValueStorage;

/// Every user-facing setting, each exposed as an independently observable
/// typed cell.
///
/// Constructed once per process over the host-supplied storage; screens and
/// services hold clones of the individual cells they care about.
pub struct SettingsStore {
    /// Color scheme selection.
    pub theme: Preference<Theme>,
    /// Accent color, persisted as six hex digits with the alpha channel
    /// dropped.
    pub app_color: Preference<AppColor>,
    /// Use pure black surfaces in dark mode.
    pub pure_black_dark_mode: Preference<bool>,
    /// Render timestamps relative to now instead of absolute.
    pub show_relative_timestamps: Preference<bool>,
    /// Sort criterion for the torrent list.
    pub sort: Preference<TorrentSort>,
    /// Reverse the torrent list sort direction.
    pub reverse_sorting: Preference<bool>,
    /// Connection timeout for server requests, in seconds.
    pub connection_timeout: Preference<u32>,
    /// Interval between background refreshes of the visible screen, in
    /// seconds; zero disables background polling.
    pub auto_refresh_interval: Preference<u32>,
    /// Interval between completion-notification checks, in minutes.
    pub notification_check_interval: Preference<u32>,
    /// Status filter applied to the torrent list on entry.
    pub default_filter: Preference<TorrentFilter>,
    /// Sort criterion for search results.
    pub search_sort: Preference<SearchSort>,
    /// Reverse the search result sort direction.
    pub reverse_search_sorting: Preference<bool>,
    /// Check for application updates on startup.
    pub check_updates: Preference<bool>,
}

impl SettingsStore {
    /// Build the catalogue over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            theme: Preference::new(&storage, "theme", Theme::SystemDefault),
            app_color: Preference::with_codec(
                &storage,
                "app_color",
                AppColor::DEFAULT,
                |color| color.to_hex(),
                AppColor::from_hex,
            ),
            pure_black_dark_mode: Preference::new(&storage, "pure_black_dark_mode", false),
            show_relative_timestamps: Preference::new(&storage, "show_relative_timestamps", true),
            sort: Preference::new(&storage, "sort", TorrentSort::Name),
            reverse_sorting: Preference::new(&storage, "reverse_sorting", false),
            connection_timeout: Preference::new(&storage, "connection_timeout", 10),
            auto_refresh_interval: Preference::new(&storage, "auto_refresh_interval", 3),
            notification_check_interval: Preference::new(
                &storage,
                "notification_check_interval",
                15,
            ),
            default_filter: Preference::new(&storage, "default_filter", TorrentFilter::All),
            search_sort: Preference::new(&storage, "search_sort", SearchSort::Name),
            reverse_search_sorting: Preference::new(&storage, "reverse_search_sorting", false),
            check_updates: Preference::new(&storage, "check_updates", true),
        }
    }
}

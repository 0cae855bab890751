//! Value types held by the settings catalogue.

use crate::preference::{DecodeError, PreferenceValue};

/// Application color scheme selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Always use the light palette.
    Light,
    /// Always use the dark palette.
    Dark,
    /// Follow the platform's scheme.
    #[default]
    SystemDefault,
}

impl Theme {
    /// Stored name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::SystemDefault => "system_default",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system_default" => Some(Self::SystemDefault),
            _ => None,
        }
    }
}

impl PreferenceValue for Theme {
    fn encode(&self) -> String {
        self.as_str().to_owned()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        Self::parse(raw).ok_or_else(|| DecodeError::new(raw, "a theme name"))
    }
}

/// Sort criterion for the torrent list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TorrentSort {
    /// Alphabetical by torrent name.
    #[default]
    Name,
    /// By lifecycle status.
    Status,
    /// By info hash.
    Hash,
    /// By current download speed.
    DownloadSpeed,
    /// By current upload speed.
    UploadSpeed,
    /// By queue priority.
    Priority,
    /// By estimated time to completion.
    Eta,
    /// By total size.
    Size,
    /// By share ratio.
    Ratio,
    /// By completion percentage.
    Progress,
    /// By number of connected seeds.
    ConnectedSeeds,
    /// By number of seeds in the swarm.
    TotalSeeds,
    /// By number of connected leeches.
    ConnectedLeeches,
    /// By number of leeches in the swarm.
    TotalLeeches,
    /// By the date the torrent was added.
    AdditionDate,
    /// By the date the torrent completed.
    CompletionDate,
    /// By last activity timestamp.
    LastActivity,
}

impl TorrentSort {
    /// Stored name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::Hash => "hash",
            Self::DownloadSpeed => "download_speed",
            Self::UploadSpeed => "upload_speed",
            Self::Priority => "priority",
            Self::Eta => "eta",
            Self::Size => "size",
            Self::Ratio => "ratio",
            Self::Progress => "progress",
            Self::ConnectedSeeds => "connected_seeds",
            Self::TotalSeeds => "total_seeds",
            Self::ConnectedLeeches => "connected_leeches",
            Self::TotalLeeches => "total_leeches",
            Self::AdditionDate => "addition_date",
            Self::CompletionDate => "completion_date",
            Self::LastActivity => "last_activity",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "status" => Some(Self::Status),
            "hash" => Some(Self::Hash),
            "download_speed" => Some(Self::DownloadSpeed),
            "upload_speed" => Some(Self::UploadSpeed),
            "priority" => Some(Self::Priority),
            "eta" => Some(Self::Eta),
            "size" => Some(Self::Size),
            "ratio" => Some(Self::Ratio),
            "progress" => Some(Self::Progress),
            "connected_seeds" => Some(Self::ConnectedSeeds),
            "total_seeds" => Some(Self::TotalSeeds),
            "connected_leeches" => Some(Self::ConnectedLeeches),
            "total_leeches" => Some(Self::TotalLeeches),
            "addition_date" => Some(Self::AdditionDate),
            "completion_date" => Some(Self::CompletionDate),
            "last_activity" => Some(Self::LastActivity),
            _ => None,
        }
    }
}

impl PreferenceValue for TorrentSort {
    fn encode(&self) -> String {
        self.as_str().to_owned()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        Self::parse(raw).ok_or_else(|| DecodeError::new(raw, "a torrent sort name"))
    }
}

/// Sort criterion for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSort {
    /// Alphabetical by result name.
    #[default]
    Name,
    /// By payload size.
    Size,
    /// By seeder count.
    Seeders,
    /// By leecher count.
    Leechers,
    /// By originating search engine.
    SearchEngine,
}

impl SearchSort {
    /// Stored name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Seeders => "seeders",
            Self::Leechers => "leechers",
            Self::SearchEngine => "search_engine",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "size" => Some(Self::Size),
            "seeders" => Some(Self::Seeders),
            "leechers" => Some(Self::Leechers),
            "search_engine" => Some(Self::SearchEngine),
            _ => None,
        }
    }
}

impl PreferenceValue for SearchSort {
    fn encode(&self) -> String {
        self.as_str().to_owned()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        Self::parse(raw).ok_or_else(|| DecodeError::new(raw, "a search sort name"))
    }
}

/// Status filter applied to the torrent list by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TorrentFilter {
    /// Show every torrent.
    #[default]
    All,
    /// Torrents currently downloading.
    Downloading,
    /// Torrents currently seeding.
    Seeding,
    /// Torrents that finished downloading.
    Completed,
    /// Torrents stopped by the user.
    Paused,
    /// Torrents with recent transfer activity.
    Active,
    /// Torrents without recent transfer activity.
    Inactive,
    /// Torrents stalled waiting for peers.
    Stalled,
    /// Torrents verifying local data.
    Checking,
    /// Torrents in an error state.
    Errored,
}

impl TorrentFilter {
    /// Stored name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Downloading => "downloading",
            Self::Seeding => "seeding",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Stalled => "stalled",
            Self::Checking => "checking",
            Self::Errored => "errored",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(Self::All),
            "downloading" => Some(Self::Downloading),
            "seeding" => Some(Self::Seeding),
            "completed" => Some(Self::Completed),
            "paused" => Some(Self::Paused),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "stalled" => Some(Self::Stalled),
            "checking" => Some(Self::Checking),
            "errored" => Some(Self::Errored),
            _ => None,
        }
    }
}

impl PreferenceValue for TorrentFilter {
    fn encode(&self) -> String {
        self.as_str().to_owned()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        Self::parse(raw).ok_or_else(|| DecodeError::new(raw, "a torrent filter name"))
    }
}

/// Accent color chosen for the application, stored as `0xAARRGGBB`.
///
/// The stored form packs only the RGB channels into six hex digits; the
/// alpha channel is dropped on encode and reconstructed as fully opaque on
/// decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppColor(u32);

impl AppColor {
    /// Accent color used until the user picks one.
    pub const DEFAULT: Self = Self(0xFF67_50A4);

    /// Build a color from a raw `0xAARRGGBB` word.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Build a fully opaque color from a `0x00RRGGBB` word.
    #[must_use]
    pub const fn opaque(rgb: u32) -> Self {
        Self(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    /// The raw `0xAARRGGBB` word.
    #[must_use]
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// The RGB channels only, as `0x00RRGGBB`.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Render the color in its stored six-hex-digit form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:06x}", self.rgb())
    }

    /// Parse a color from its stored six-hex-digit form, assuming full
    /// opacity.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when `raw` is not hex or does not fit in
    /// 24 bits.
    pub fn from_hex(raw: &str) -> Result<Self, DecodeError> {
        let rgb = u32::from_str_radix(raw, 16)
            .ok()
            .filter(|rgb| *rgb <= 0x00FF_FFFF)
            .ok_or_else(|| DecodeError::new(raw, "six hex digits"))?;
        Ok(Self::opaque(rgb))
    }
}

impl Default for AppColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

//! Regional access control.
//!
//! A [`RegionalAccessGrid`] maps a region (ISO 3166-1 alpha-2 country code,
//! or the `*` wildcard) to the eight [`AccessToggles`] that gate capability
//! areas in that region. Lookups try the exact region first, then the
//! wildcard, then fall back to no access.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Capability area gated per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessArea {
    Events,
    Finances,
    Attendees,
    Marketing,
    Team,
    Analytics,
    Settings,
    Support,
}

impl AccessArea {
    /// Returns all areas in toggle order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Events,
            Self::Finances,
            Self::Attendees,
            Self::Marketing,
            Self::Team,
            Self::Analytics,
            Self::Settings,
            Self::Support,
        ]
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Finances => "finances",
            Self::Attendees => "attendees",
            Self::Marketing => "marketing",
            Self::Team => "team",
            Self::Analytics => "analytics",
            Self::Settings => "settings",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for AccessArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-region toggles for the eight capability areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AccessToggles {
    pub events: bool,
    pub finances: bool,
    pub attendees: bool,
    pub marketing: bool,
    pub team: bool,
    pub analytics: bool,
    pub settings: bool,
    pub support: bool,
}

impl AccessToggles {
    /// No access to any area.
    pub const NONE: Self = Self {
        events: false,
        finances: false,
        attendees: false,
        marketing: false,
        team: false,
        analytics: false,
        settings: false,
        support: false,
    };

    /// Access to every area.
    pub const ALL: Self = Self {
        events: true,
        finances: true,
        attendees: true,
        marketing: true,
        team: true,
        analytics: true,
        settings: true,
        support: true,
    };

    /// Whether the toggle for `area` is on.
    #[must_use]
    pub const fn allows(&self, area: AccessArea) -> bool {
        match area {
            AccessArea::Events => self.events,
            AccessArea::Finances => self.finances,
            AccessArea::Attendees => self.attendees,
            AccessArea::Marketing => self.marketing,
            AccessArea::Team => self.team,
            AccessArea::Analytics => self.analytics,
            AccessArea::Settings => self.settings,
            AccessArea::Support => self.support,
        }
    }

    /// Set the toggle for `area`.
    pub fn set(&mut self, area: AccessArea, enabled: bool) {
        let toggle = match area {
            AccessArea::Events => &mut self.events,
            AccessArea::Finances => &mut self.finances,
            AccessArea::Attendees => &mut self.attendees,
            AccessArea::Marketing => &mut self.marketing,
            AccessArea::Team => &mut self.team,
            AccessArea::Analytics => &mut self.analytics,
            AccessArea::Settings => &mut self.settings,
            AccessArea::Support => &mut self.support,
        };
        *toggle = enabled;
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, area: AccessArea, enabled: bool) -> Self {
        self.set(area, enabled);
        self
    }

    /// Toggles built from the list of enabled areas.
    #[must_use]
    pub fn only(areas: &[AccessArea]) -> Self {
        areas
            .iter()
            .fold(Self::NONE, |toggles, area| toggles.with(*area, true))
    }

    /// The enabled areas, in toggle order.
    pub fn enabled_areas(&self) -> impl Iterator<Item = AccessArea> + '_ {
        AccessArea::all()
            .iter()
            .copied()
            .filter(move |a| self.allows(*a))
    }

    /// Number of enabled areas.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled_areas().count()
    }
}

/// Error for region codes that are neither `*` nor two ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid region code: {0:?}")]
pub struct InvalidRegionCode(pub String);

/// Region key of a [`RegionalAccessGrid`].
///
/// Either the wildcard `*` or an uppercase ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    /// The wildcard key string.
    pub const WILDCARD: &'static str = "*";

    /// Parse a region code, normalizing country codes to uppercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use ev_access::permissions::RegionCode;
    ///
    /// assert_eq!(RegionCode::new("de").unwrap().as_str(), "DE");
    /// assert!(RegionCode::new("*").unwrap().is_wildcard());
    /// assert!(RegionCode::new("DEU").is_err());
    /// ```
    pub fn new(code: impl AsRef<str>) -> Result<Self, InvalidRegionCode> {
        let code = code.as_ref().trim();
        if code == Self::WILDCARD {
            return Ok(Self::wildcard());
        }
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(Self(code.to_ascii_uppercase()));
        }
        Err(InvalidRegionCode(code.to_string()))
    }

    /// The wildcard region, meaning "all regions".
    #[must_use]
    pub fn wildcard() -> Self {
        Self(Self::WILDCARD.to_string())
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegionCode {
    type Error = InvalidRegionCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for RegionCode {
    type Err = InvalidRegionCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Region → toggles map with wildcard fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionalAccessGrid(BTreeMap<RegionCode, AccessToggles>);

impl RegionalAccessGrid {
    /// An empty grid: no access anywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A grid with a single wildcard entry.
    #[must_use]
    pub fn wildcard(toggles: AccessToggles) -> Self {
        let mut grid = Self::new();
        grid.set(RegionCode::wildcard(), toggles);
        grid
    }

    /// Exact-key lookup, without wildcard fallback.
    #[must_use]
    pub fn get(&self, region: &RegionCode) -> Option<&AccessToggles> {
        self.0.get(region)
    }

    /// Resolve the toggles that apply in `region`.
    ///
    /// 1. Exact region entry
    /// 2. Wildcard entry
    /// 3. [`AccessToggles::NONE`]
    #[must_use]
    pub fn resolve(&self, region: &RegionCode) -> AccessToggles {
        if let Some(toggles) = self.0.get(region) {
            return *toggles;
        }
        self.0
            .get(&RegionCode::wildcard())
            .copied()
            .unwrap_or(AccessToggles::NONE)
    }

    /// Insert or replace the toggles for `region`.
    pub fn set(&mut self, region: RegionCode, toggles: AccessToggles) -> Option<AccessToggles> {
        self.0.insert(region, toggles)
    }

    /// Remove the entry for `region`.
    pub fn remove(&mut self, region: &RegionCode) -> Option<AccessToggles> {
        self.0.remove(region)
    }

    /// Region keys present in the grid, in sorted order (`*` sorts first).
    pub fn regions(&self) -> impl Iterator<Item = &RegionCode> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionCode, &AccessToggles)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str) -> RegionCode {
        RegionCode::new(code).unwrap()
    }

    // === Region Codes ===

    #[test]
    fn test_region_code_normalizes_case() {
        assert_eq!(region("us").as_str(), "US");
        assert_eq!(region(" gb ").as_str(), "GB");
    }

    #[test]
    fn test_region_code_rejects_invalid() {
        for bad in ["", "U", "USA", "1A", "**", "d-"] {
            assert!(RegionCode::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_region_code_deserialize_validates() {
        let ok: RegionCode = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(ok.as_str(), "FR");
        assert!(serde_json::from_str::<RegionCode>("\"France\"").is_err());
    }

    // === Toggles ===

    #[test]
    fn test_toggle_presets() {
        assert_eq!(AccessToggles::NONE.enabled_count(), 0);
        assert_eq!(AccessToggles::ALL.enabled_count(), 8);
        assert_eq!(AccessToggles::default(), AccessToggles::NONE);
    }

    #[test]
    fn test_toggle_set_and_allows() {
        let mut toggles = AccessToggles::NONE;
        for area in AccessArea::all() {
            assert!(!toggles.allows(*area));
            toggles.set(*area, true);
            assert!(toggles.allows(*area));
        }
        assert_eq!(toggles, AccessToggles::ALL);
    }

    #[test]
    fn test_toggles_only() {
        let toggles = AccessToggles::only(&[AccessArea::Attendees, AccessArea::Support]);
        assert_eq!(
            toggles.enabled_areas().collect::<Vec<_>>(),
            vec![AccessArea::Attendees, AccessArea::Support]
        );
    }

    // === Grid Lookup ===

    #[test]
    fn test_exact_region_wins_over_wildcard() {
        let mut grid = RegionalAccessGrid::wildcard(AccessToggles::ALL);
        grid.set(region("DE"), AccessToggles::NONE);

        assert_eq!(grid.resolve(&region("DE")), AccessToggles::NONE);
        assert_eq!(grid.resolve(&region("US")), AccessToggles::ALL);
    }

    #[test]
    fn test_missing_region_without_wildcard_is_no_access() {
        let mut grid = RegionalAccessGrid::new();
        grid.set(region("US"), AccessToggles::ALL);

        assert_eq!(grid.resolve(&region("DE")), AccessToggles::NONE);
    }

    #[test]
    fn test_empty_grid_is_no_access() {
        let grid = RegionalAccessGrid::new();
        assert!(grid.is_empty());
        assert_eq!(grid.resolve(&RegionCode::wildcard()), AccessToggles::NONE);
    }

    #[test]
    fn test_remove_region_falls_back_to_wildcard() {
        let viewer = AccessToggles::only(&[AccessArea::Analytics]);
        let mut grid = RegionalAccessGrid::wildcard(viewer);
        grid.set(region("JP"), AccessToggles::ALL);

        assert_eq!(grid.remove(&region("JP")), Some(AccessToggles::ALL));
        assert_eq!(grid.resolve(&region("JP")), viewer);
    }

    #[test]
    fn test_grid_serializes_as_map() {
        let grid = RegionalAccessGrid::wildcard(AccessToggles::NONE.with(AccessArea::Team, true));
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["*"]["team"], true);
        assert_eq!(json["*"]["events"], false);

        let restored: RegionalAccessGrid = serde_json::from_value(json).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_grid_regions_sorted_wildcard_first() {
        let mut grid = RegionalAccessGrid::wildcard(AccessToggles::NONE);
        grid.set(region("US"), AccessToggles::ALL);
        grid.set(region("AT"), AccessToggles::ALL);

        let keys: Vec<&str> = grid.regions().map(|r| r.as_str()).collect();
        assert_eq!(keys, vec!["*", "AT", "US"]);
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Domain types shared across the blight-map system.
//!
//! This crate defines the canonical species taxonomy, geographic point and
//! date-range types, photo roles and references, and the report records
//! exchanged between the map session, the HTTP client, and the demo
//! backend. Wire-format request/response types live in [`wire`].

pub mod wire;

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The two tracked tree-disease categories.
///
/// `Matsu` is pine wilt (matsu-kare), `Nara` is oak wilt (nara-kare). The
/// variant names double as the wire names used by the backend API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Species {
    /// Pine wilt disease.
    Matsu,
    /// Oak wilt disease.
    Nara,
}

impl Species {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Matsu, Self::Nara]
    }

    /// Whether reports for this species carry a leaf photo set.
    ///
    /// Pine-wilt symptoms show in the needles, so pine reports include a
    /// dedicated leaves role; oak reports do not.
    #[must_use]
    pub const fn has_leaf_photos(self) -> bool {
        matches!(self, Self::Matsu)
    }

    /// URL path segment for this species (`matsu` / `nara`).
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Matsu => "matsu",
            Self::Nara => "nara",
        }
    }
}

/// A geographic point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A collection of points as returned by the backend point endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCollection {
    /// The points, in backend order.
    pub items: Vec<GeoPoint>,
}

/// An inclusive date range at day granularity.
///
/// The aggregation pipeline never interprets the dates; they are passed
/// through verbatim as backend query filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range spanning `start..=end`.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Creates a range covering a single day.
    #[must_use]
    pub const fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Whether `day` falls within the range (inclusive bounds).
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Whether two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Categorical texture rating attached to pine-wilt reports (0-5).
///
/// Describes the observed bark/resin texture; 0 is "none visible" and 5 is
/// the most pronounced symptom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureRating(u8);

impl TextureRating {
    /// Creates a rating from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidTextureRatingError> {
        if value <= 5 {
            Ok(Self(value))
        } else {
            Err(InvalidTextureRatingError { value })
        }
    }

    /// Returns the numeric value of this rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Error returned when attempting to create a [`TextureRating`] from an
/// out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTextureRatingError {
    /// The invalid rating value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidTextureRatingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid texture rating {}: expected 0-5", self.value)
    }
}

impl std::error::Error for InvalidTextureRatingError {}

/// Role of a photo attached to a report.
///
/// Multipart field names and backend photo-list keys both use the
/// camelCase wire name of the role.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PhotoRole {
    /// Whole-tree overview shot.
    WholeTree,
    /// Close-up of the symptom (resin flow for pine, boreholes for oak).
    Detail,
    /// Trunk base / root collar shot.
    Base,
    /// Needle/leaf shot; pine-wilt reports only.
    Leaves,
}

impl PhotoRole {
    /// Returns the roles that apply to reports for `species`.
    #[must_use]
    pub fn for_species(species: Species) -> Vec<Self> {
        let mut roles = vec![Self::WholeTree, Self::Detail, Self::Base];
        if species.has_leaf_photos() {
            roles.push(Self::Leaves);
        }
        roles
    }
}

/// A reference to one photo, resolved at the system boundary.
///
/// Historically the backend mixed plain URL strings with structured
/// records in the same list; this variant makes the distinction explicit
/// and keeps it from leaking past the client layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoRef {
    /// A photo already stored by the backend, addressed by URL.
    Stored {
        /// Public URL of the stored photo.
        url: String,
    },
    /// A photo still on the reporting device, awaiting upload.
    Pending {
        /// Optional local preview identifier (e.g. an object URL).
        preview: Option<String>,
        /// Path of the file to upload.
        path: PathBuf,
    },
}

impl PhotoRef {
    /// Returns the stored URL, if this reference is already uploaded.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Stored { url } => Some(url),
            Self::Pending { .. } => None,
        }
    }
}

/// Detail record for one registered report, as shown when a pin is
/// inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct PinDetail {
    /// Backend identifier, when known.
    pub id: Option<String>,
    /// Disease category of the report.
    pub species: Species,
    /// Reported location.
    pub position: GeoPoint,
    /// Observation date range, when known.
    pub range: Option<DateRange>,
    /// Texture rating (pine-wilt reports).
    pub texture_rating: Option<TextureRating>,
    /// Borehole size in millimeters (oak-wilt reports).
    pub hole_size_mm: Option<f64>,
    /// Photos grouped by role. Every applicable role is present, possibly
    /// with an empty list.
    pub photos: BTreeMap<PhotoRole, Vec<PhotoRef>>,
    /// When the report was registered.
    pub created_at: Option<DateTime<Utc>>,
}

impl PinDetail {
    /// Minimal placeholder shown when the detail fetch fails: correct
    /// species and position, empty photo lists for every applicable role.
    #[must_use]
    pub fn placeholder(species: Species, position: GeoPoint) -> Self {
        let photos = PhotoRole::for_species(species)
            .into_iter()
            .map(|role| (role, Vec::new()))
            .collect();
        Self {
            id: None,
            species,
            position,
            range: None,
            texture_rating: None,
            hole_size_mm: None,
            photos,
            created_at: None,
        }
    }
}

/// A new report produced by the registration form, ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationSubmit {
    /// Disease category being reported.
    pub species: Species,
    /// Reported location.
    pub position: GeoPoint,
    /// Observation date range.
    pub range: DateRange,
    /// Texture rating (pine-wilt reports).
    pub texture_rating: Option<TextureRating>,
    /// Borehole size in millimeters (oak-wilt reports).
    pub hole_size_mm: Option<f64>,
    /// Photo attachments grouped by role.
    pub photos: BTreeMap<PhotoRole, Vec<PhotoRef>>,
}

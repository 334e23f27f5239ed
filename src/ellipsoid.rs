//! Provides [`Ellipsoid`], the reference ellipsoid of a grid's datums.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named reference ellipsoid.
///
/// # Example
///
/// ```
/// # use gridshift::Ellipsoid;
/// let grs80 = Ellipsoid::from_name("GRS80").unwrap();
/// assert_eq!(grs80.semi_major_axis, 6378137.0);
///
/// // Unknown names are made from the axes
/// let e = Ellipsoid::from_name_or_axes("MYELL", 6378000.0, 6356000.0);
/// assert_eq!(e.name, "MYELL");
/// assert_eq!(e.semi_minor_axis, 6356000.0);
/// ```
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    /// The name
    pub name: String,
    /// The semi-major axis \[m\]
    pub semi_major_axis: f64,
    /// The semi-minor axis \[m\]
    pub semi_minor_axis: f64,
}

/// Name, semi-major axis and inverse flattening.
const KNOWN: [(&str, f64, f64); 5] = [
    ("GRS80", 6378137.0, 298.257222101),
    ("WGS84", 6378137.0, 298.257223563),
    ("CLRK66", 6378206.4, 294.978698213898),
    ("INTL", 6378388.0, 297.0),
    ("BESSEL", 6377397.155, 299.1528128),
];

impl Ellipsoid {
    /// Makes an [`Ellipsoid`] from its axes.
    pub fn new_major_minor(
        name: impl Into<String>,
        semi_major_axis: f64,
        semi_minor_axis: f64,
    ) -> Self {
        Self {
            name: name.into(),
            semi_major_axis,
            semi_minor_axis,
        }
    }

    /// Returns a well-known ellipsoid by the name NTv2 files use.
    ///
    /// The `CSRS*` names of the Canadian NAD83(CSRS) realizations
    /// resolve to GRS80.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let key = match name.to_ascii_uppercase().as_str() {
            "NAD83" | "GRS 1980" | "GRS1980" => "GRS80",
            "NAD27" | "CLARKE 1866" | "CLRK 66" => "CLRK66",
            "WGS 84" => "WGS84",
            s if s.starts_with("CSRS") => "GRS80",
            s => KNOWN.iter().find(|(k, _, _)| *k == s).map(|t| t.0)?,
        };
        let (_, a, rf) = KNOWN.iter().find(|(k, _, _)| *k == key)?;
        Some(Self::new_major_minor(name, *a, a * (1.0 - 1.0 / rf)))
    }

    /// Returns the well-known ellipsoid, or one made from the axes if unknown.
    pub fn from_name_or_axes(name: &str, semi_major_axis: f64, semi_minor_axis: f64) -> Self {
        Self::from_name(name)
            .unwrap_or_else(|| Self::new_major_minor(name.trim(), semi_major_axis, semi_minor_axis))
    }

    /// Returns the flattening.
    #[inline]
    pub fn flattening(&self) -> f64 {
        (self.semi_major_axis - self.semi_minor_axis) / self.semi_major_axis
    }
}

//! Panel projections.
//!
//! Only the projection *kind* is decided here. Instantiating a map projection
//! is left to the drawing surface, which receives the name and the resolved
//! projection arguments.

use std::fmt;

use crate::error::{Error, Result};

/// Map projection names accepted for both map packages.
const MAP_PROJECTIONS: &[&str] = &[
    "aea", "aeqd", "cass", "cea", "cyl", "eck4", "eqdc", "gall", "geos", "gnom", "hammer",
    "kav7", "laea", "lcc", "mbtfpq", "merc", "mill", "moll", "npaeqd", "nplaea", "npstere",
    "nsper", "omerc", "ortho", "poly", "robin", "rotpole", "sinu", "spaeqd", "splaea",
    "spstere", "stere", "tmerc", "vandg",
    // cartopy-style long names
    "platecarree", "mercator", "robinson", "mollweide", "orthographic", "stereographic",
    "lambertconformal", "lambertazimuthalequalarea", "northpolarstereo", "southpolarstereo",
    "equalearth", "interruptedgoodehomolosine", "sinusoidal", "miller", "azimuthalequidistant",
    "albersequalarea", "transversemercator", "gnomonic", "geostationary", "nearsideperspective",
    "eckertiv", "lambertcylindrical",
];

/// Package used to instantiate a map projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapPackage {
    /// Cartopy-style projection (the default).
    Cartopy,
    /// Basemap-style projection.
    Basemap,
}

impl MapPackage {
    /// Lowercase package name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MapPackage::Cartopy => "cartopy",
            MapPackage::Basemap => "basemap",
        }
    }
}

/// Resolved projection kind of a panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Projection {
    /// Plain x/y axes.
    #[default]
    Cartesian,
    /// Polar axes.
    Polar,
    /// Geographic map axes.
    Map {
        /// Package that instantiates the projection.
        package: MapPackage,
        /// Projection name, lowercased.
        name: String,
    },
}

impl Projection {
    /// Resolve a projection name. `basemap` picks the map package for map
    /// projections and is ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedProjection`] for empty or unknown names.
    pub fn parse(name: &str, basemap: bool) -> Result<Self> {
        let key = name.trim().to_ascii_lowercase();
        match key.as_str() {
            "xy" | "cartesian" | "rectilinear" => Ok(Projection::Cartesian),
            "polar" => Ok(Projection::Polar),
            other if MAP_PROJECTIONS.contains(&other) => Ok(Projection::Map {
                package: if basemap { MapPackage::Basemap } else { MapPackage::Cartopy },
                name: key,
            }),
            _ => Err(Error::UnsupportedProjection { name: name.to_string() }),
        }
    }

    /// Short kind name as handed to drawing surfaces.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Projection::Cartesian => "xy",
            Projection::Polar => "polar",
            Projection::Map { package, .. } => package.name(),
        }
    }

    /// Aspect ratio this projection forces on the reference panel, if any.
    ///
    /// Map aspect ratios depend on the instantiated projection and are left to
    /// the surface.
    #[must_use]
    pub fn aspect_hint(&self) -> Option<f32> {
        match self {
            Projection::Polar => Some(1.0),
            _ => None,
        }
    }

    /// Whether this is a map projection.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Projection::Map { .. })
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Map { package, name } => write!(f, "{}:{name}", package.name()),
            other => f.write_str(other.kind()),
        }
    }
}

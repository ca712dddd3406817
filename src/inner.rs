//! Inner panels attached to individual subplots.
//!
//! A subplot may carry narrow panels along any of its sides, e.g. for a
//! colorbar or a marginal plot. Side sets come from `inner_panels` and
//! `inner_colorbars`; sizes and sharing come from `inner_panels_kw` and, for
//! colorbars, from the spacing defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{layered, GridspecDefaults};
use crate::error::{Error, Result};
use crate::property::Options;

/// Sides of a subplot carrying inner panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sides {
    /// Panel on the left.
    pub left: bool,
    /// Panel on the right.
    pub right: bool,
    /// Panel below.
    pub bottom: bool,
    /// Panel above.
    pub top: bool,
}

impl Sides {
    /// No sides.
    pub const NONE: Self = Self { left: false, right: false, bottom: false, top: false };

    /// Whether no side is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// Whether a horizontal strip (bottom or top) is set.
    #[must_use]
    pub fn horizontal(self) -> bool {
        self.bottom || self.top
    }

    /// Whether a vertical strip (left or right) is set.
    #[must_use]
    pub fn vertical(self) -> bool {
        self.left || self.right
    }
}

/// Accepts side letters (`"lr"`, `"b"`) or side names (`"left"`, `"bottom"`).
impl FromStr for Sides {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let letters = match s.trim() {
            "left" => "l",
            "right" => "r",
            "bottom" => "b",
            "top" => "t",
            other => other,
        };
        let mut sides = Sides::NONE;
        for c in letters.chars() {
            match c {
                'l' => sides.left = true,
                'r' => sides.right = true,
                'b' => sides.bottom = true,
                't' => sides.top = true,
                _ => return Err(format!("{s:?} is not a combination of 'l', 'r', 'b', 't'")),
            }
        }
        Ok(sides)
    }
}

impl TryFrom<String> for Sides {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Sides> for String {
    fn from(sides: Sides) -> Self {
        sides.to_string()
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, letter) in
            [(self.left, "l"), (self.right, "r"), (self.bottom, "b"), (self.top, "t")]
        {
            if set {
                f.write_str(letter)?;
            }
        }
        Ok(())
    }
}

/// Resolved inner-panel settings for one subplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InnerPanels {
    /// Sides carrying a panel.
    pub sides: Sides,
    /// Whether bottom/top panels share the subplot's x axis.
    pub share_x_panels: bool,
    /// Whether left/right panels share the subplot's y axis.
    pub share_y_panels: bool,
    /// Height of bottom/top panels.
    pub hwidth: Option<f32>,
    /// Width of left/right panels.
    pub wwidth: Option<f32>,
    /// Space between the subplot and bottom/top panels.
    pub hspace: Option<f32>,
    /// Space between the subplot and a left panel.
    pub wspace_left: Option<f32>,
    /// Space between the subplot and a right panel.
    pub wspace_right: Option<f32>,
}

impl InnerPanels {
    /// Combine the panel sides, colorbar sides and keyword options of one
    /// subplot.
    ///
    /// Colorbar sides, when present, replace the panel sides and fill any
    /// size the options leave unset from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPropertySpec`] for unknown option names or
    /// values of the wrong type.
    pub fn resolve(
        panels: Sides,
        colorbars: Sides,
        options: &Options,
        defaults: &GridspecDefaults,
    ) -> Result<Self> {
        let mut inner = Self::from_options(options)?;
        inner.sides = panels;

        if !colorbars.is_empty() {
            inner.sides = colorbars;
            if colorbars.horizontal() {
                inner.share_x_panels = false;
                inner.hwidth = layered([inner.hwidth, Some(defaults.cbar)]);
                inner.hspace = layered([inner.hspace, Some(defaults.xlab)]);
            }
            if colorbars.vertical() {
                inner.share_y_panels = false;
                inner.wwidth = layered([inner.wwidth, Some(defaults.cbar)]);
                if colorbars.left {
                    inner.wspace_left = layered([inner.wspace_left, Some(defaults.ylab)]);
                }
                if colorbars.right {
                    inner.wspace_right = layered([inner.wspace_right, Some(defaults.nolab)]);
                }
            }
        }
        Ok(inner)
    }

    fn from_options(options: &Options) -> Result<Self> {
        let mut inner = Self {
            sides: Sides::NONE,
            share_x_panels: true,
            share_y_panels: true,
            hwidth: None,
            wwidth: None,
            hspace: None,
            wspace_left: None,
            wspace_right: None,
        };

        for (name, value) in options {
            let number = || {
                value.as_f64().map(|v| v as f32).ok_or_else(|| {
                    Error::property("inner_panels_kw", format!("{name} must be a number, got {value}"))
                })
            };
            let flag = || {
                value.as_bool().ok_or_else(|| {
                    Error::property("inner_panels_kw", format!("{name} must be a flag, got {value}"))
                })
            };
            match name.as_str() {
                "hwidth" => inner.hwidth = Some(number()?),
                "wwidth" => inner.wwidth = Some(number()?),
                "hspace" => inner.hspace = Some(number()?),
                "wspace" => {
                    let w = number()?;
                    inner.wspace_left = Some(w);
                    inner.wspace_right = Some(w);
                }
                "wspace_left" => inner.wspace_left = Some(number()?),
                "wspace_right" => inner.wspace_right = Some(number()?),
                "share_x_panels" => inner.share_x_panels = flag()?,
                "share_y_panels" => inner.share_y_panels = flag()?,
                _ => {
                    return Err(Error::property(
                        "inner_panels_kw",
                        format!("unknown inner panel option {name:?}"),
                    ))
                }
            }
        }
        Ok(inner)
    }

    /// Whether the subplot gets any inner panel.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.sides.is_empty()
    }
}

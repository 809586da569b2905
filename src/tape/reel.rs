use std::fmt;

use crate::error::TapeError;

const INCHES_PER_FOOT: f64 = 12.0;
const INCHES_PER_METER: f64 = 1000.0 / 25.4;

/// Tape ahead of the beginning-of-tape marker.
const LEADER_FEET: f64 = 16.0;
/// Tape reserved after the end-of-tape marker.
const TRAILER_FEET: f64 = 27.5;

/// Tape consumed by a tape mark or an erase gap.
pub const TAPE_MARK_INCHES: f64 = 3.0;
pub const ERASE_GAP_INCHES: f64 = 3.0;

/// Inter-record gaps at and above this density are half length.
const HIGH_DENSITY_CPI: f64 = 6250.0;
const HIGH_DENSITY_IRG_INCHES: f64 = 0.3;
const LOW_DENSITY_IRG_INCHES: f64 = 0.6;

/// Frames of check characters and postamble written with each record.
const RECORD_OVERHEAD_FRAMES: usize = 9;

/// An estimate of where the head is on a physical reel, used to predict when
/// the end-of-tape reflector would be reached.  All distances are in inches.
#[derive(Clone, Debug, PartialEq)]
pub struct Reel {
    length: f64,
    position: f64,
    eot: f64,
    density: f64,
    irg: f64,
    metric: bool,
}

/// Split a quantity such as "2400ft" or "6250 bpi" into its value and its
/// (lowercased) unit suffix.  The value must be positive.
fn parse_quantity(text: &str) -> Option<(f64, String)> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Some((value, unit.trim().to_ascii_lowercase()))
}

impl Reel {
    /// Build a reel model from a length ("2400", "2400ft", "730m") and a
    /// recording density in frames per inch ("1600", "1600bpi", "6250fci").
    /// Lengths without a unit are in feet.
    pub fn new(length: &str, density: &str) -> Result<Reel, TapeError> {
        let (length, metric) = match parse_quantity(length) {
            Some((feet, ref unit)) if unit.is_empty() || unit == "ft" => {
                (feet * INCHES_PER_FOOT, false)
            }
            Some((meters, ref unit)) if unit == "m" => (meters * INCHES_PER_METER, true),
            _ => return Err(TapeError::InvalidLength),
        };
        let density = match parse_quantity(density) {
            Some((cpi, ref unit)) if unit.is_empty() || unit == "bpi" || unit == "fci" => cpi,
            _ => return Err(TapeError::InvalidDensity),
        };

        let leader = LEADER_FEET * INCHES_PER_FOOT;
        let trailer = TRAILER_FEET * INCHES_PER_FOOT;
        if length < leader + trailer + 1.0 {
            return Err(TapeError::ReelTooShort);
        }

        Ok(Reel {
            length,
            position: leader,
            eot: length - trailer,
            density,
            irg: if density >= HIGH_DENSITY_CPI {
                HIGH_DENSITY_IRG_INCHES
            } else {
                LOW_DENSITY_IRG_INCHES
            },
            metric,
        })
    }

    /// Advance past a data record of `length` frames and its preceding gap.
    pub fn advance_record(&mut self, length: usize) {
        self.position += self.irg + (length + RECORD_OVERHEAD_FRAMES) as f64 / self.density;
    }

    pub fn advance(&mut self, inches: f64) {
        self.position += inches;
    }

    /// True once the position has passed the end-of-tape marker.
    pub fn past_eot(&self) -> bool {
        self.position >= self.eot
    }

    pub fn position_inches(&self) -> f64 {
        self.position
    }

    pub fn eot_inches(&self) -> f64 {
        self.eot
    }

    pub fn length_inches(&self) -> f64 {
        self.length
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn irg_inches(&self) -> f64 {
        self.irg
    }

    pub fn is_metric(&self) -> bool {
        self.metric
    }
}

/// Show the position in the units the reel length was given in.
impl fmt::Display for Reel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.metric {
            write!(f, "{:.2} m", self.position / INCHES_PER_METER)
        } else {
            write!(f, "{:.1} ft", self.position / INCHES_PER_FOOT)
        }
    }
}

//! Parsing of trait column names into a base trait and a growout identifier.
//!
//! Column names look like `<trait>_<suffix>`. When the suffix is a *growout
//! code* (a location code followed by a two digit year, e.g. `FL06`), the
//! column belongs to the growout `FL_2006`. Any other suffix is used verbatim
//! (after trimming) as the identifier of the group the column belongs to.
//!
//! ```
//! use phenosplit::identifier::{CenturyWindow, IdentifierParser, GrowoutStrictness};
//!
//! let parser = IdentifierParser::new(GrowoutStrictness::FirstLetter, CenturyWindow::new(2024));
//! assert_eq!(parser.trait_to_filename("weight_FL06").unwrap(), "FL_2006");
//! assert_eq!(parser.trait_to_filename("weight_PU98").unwrap(), "PU_1998");
//! assert_eq!(parser.trait_to_identifier("weight_FL06"), "FL06");
//! ```

use chrono::Datelike;
use std::fmt;

use crate::error::PhenoSplitError;
use crate::Year;

/// Length, in characters, of a growout code such as `FL06`.
pub const GROWOUT_CODE_LEN: usize = 4;

/// How strictly the leading location characters of a growout code are checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrowoutStrictness {
    /// Only the first character must be an ASCII letter, so `F106` is a
    /// growout code. Existing datasets are grouped this way.
    #[default]
    FirstLetter,
    /// Both location characters must be ASCII letters.
    BothLetters,
}

/// Resolves two digit years to full years relative to a reference year.
///
/// A two digit year is placed in the century of the reference year; if that
/// lands after the reference year, it is moved back one century.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CenturyWindow {
    current_year: Year,
}

impl CenturyWindow {
    pub fn new(current_year: Year) -> Self {
        Self { current_year }
    }

    /// A window anchored on the current local calendar year.
    pub fn now() -> Self {
        Self::new(chrono::Local::now().year())
    }

    pub fn current_year(&self) -> Year {
        self.current_year
    }

    pub fn resolve(&self, two_digit_year: u8) -> Year {
        let century = self.current_year - self.current_year.rem_euclid(100);
        let year = century + Year::from(two_digit_year);
        if year > self.current_year {
            year - 100
        } else {
            year
        }
    }
}

impl Default for CenturyWindow {
    fn default() -> Self {
        Self::now()
    }
}

/// A location-year field trial.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Growout {
    pub location: String,
    pub year: Year,
}

impl fmt::Display for Growout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.location, self.year)
    }
}

/// The decomposition of one trait column name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraitColumn {
    /// The full column name, as read.
    pub name: String,
    /// The trait name with the trailing identifier removed.
    pub base_name: String,
    /// The trimmed suffix after the last underscore.
    pub identifier: String,
    /// Set if the suffix is a growout code.
    pub growout: Option<Growout>,
}

impl TraitColumn {
    /// The output filename stem (no extension) for this column's group.
    pub fn stem(&self) -> String {
        match &self.growout {
            Some(growout) => growout.to_string(),
            None => self.identifier.clone(),
        }
    }

    /// The output filename for this column's group.
    pub fn filename(&self) -> String {
        format!("{}.csv", self.stem())
    }
}

/// Splits trait column names into base traits and growout identifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentifierParser {
    pub strictness: GrowoutStrictness,
    pub window: CenturyWindow,
}

impl IdentifierParser {
    pub fn new(strictness: GrowoutStrictness, window: CenturyWindow) -> Self {
        Self { strictness, window }
    }

    /// Returns `true` if `suffix` is a four character growout code.
    pub fn is_growout_code(&self, suffix: &str) -> bool {
        self.growout_chars(suffix).is_some()
    }

    /// The characters of `suffix` if it is a growout code.
    fn growout_chars(&self, suffix: &str) -> Option<[char; GROWOUT_CODE_LEN]> {
        let mut chars = suffix.chars();
        let code = [chars.next()?, chars.next()?, chars.next()?, chars.next()?];
        if chars.next().is_some() {
            return None;
        }
        if !(code[2].is_ascii_digit() && code[3].is_ascii_digit()) {
            return None;
        }
        let location_ok = match self.strictness {
            GrowoutStrictness::FirstLetter => code[0].is_ascii_alphabetic(),
            GrowoutStrictness::BothLetters => {
                code[0].is_ascii_alphabetic() && code[1].is_ascii_alphabetic()
            }
        };
        location_ok.then_some(code)
    }

    /// Split a growout code into its location code and full year.
    ///
    /// # Errors
    /// Returns [`PhenoSplitError::ParseError`] if `suffix` is not a growout code.
    pub fn decompose_growout(&self, suffix: &str) -> Result<Growout, PhenoSplitError> {
        let code = self
            .growout_chars(suffix)
            .ok_or_else(|| PhenoSplitError::ParseError(suffix.to_string()))?;
        let location: String = code[..2].iter().collect();
        let two_digit_year = code[2..]
            .iter()
            .filter_map(|c| c.to_digit(10))
            .fold(0u8, |year, digit| year * 10 + digit as u8);
        Ok(Growout {
            location,
            year: self.window.resolve(two_digit_year),
        })
    }

    /// Decompose a full column name. This is the one place where the
    /// identifier and the filename stem of a column are derived.
    pub fn parse_column(&self, column_name: &str) -> Result<TraitColumn, PhenoSplitError> {
        let suffix = trait_suffix(column_name);
        let growout = self.decompose_growout(suffix).ok();
        Ok(TraitColumn {
            name: column_name.to_string(),
            base_name: trait_to_base_name(column_name).to_string(),
            identifier: suffix.trim().to_string(),
            growout,
        })
    }

    /// The output filename stem for a trait column: `<location>_<year>` for
    /// growout codes, otherwise the trimmed suffix.
    pub fn trait_to_filename(&self, column_name: &str) -> Result<String, PhenoSplitError> {
        Ok(self.parse_column(column_name)?.stem())
    }

    /// The grouping identifier for a trait column: the trimmed suffix, not
    /// normalized even for growout codes.
    pub fn trait_to_identifier(&self, column_name: &str) -> String {
        trait_suffix(column_name).trim().to_string()
    }
}

/// Returns `true` if `suffix` is a growout code, with the default strictness.
pub fn is_growout_code(suffix: &str) -> bool {
    IdentifierParser::default().is_growout_code(suffix)
}

/// Split a growout code with an explicit century window.
pub fn decompose_growout(suffix: &str, window: CenturyWindow) -> Result<Growout, PhenoSplitError> {
    IdentifierParser::new(GrowoutStrictness::default(), window).decompose_growout(suffix)
}

/// The text after the last underscore, or the whole name if there is none.
pub fn trait_suffix(column_name: &str) -> &str {
    column_name
        .rsplit_once('_')
        .map_or(column_name, |(_, suffix)| suffix)
}

/// Everything before the last underscore. Names without a prefix (such as
/// the row label column) are returned unchanged.
pub fn trait_to_base_name(column_name: &str) -> &str {
    match column_name.rsplit_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => prefix,
        _ => column_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(year: Year) -> IdentifierParser {
        IdentifierParser::new(GrowoutStrictness::FirstLetter, CenturyWindow::new(year))
    }

    #[test]
    fn test_is_growout_code() {
        for code in ["FL06", "WR10", "PU98", "mo06", "F106"] {
            assert!(is_growout_code(code), "{} should be a growout code", code);
        }
        for code in ["FLA10", "0242", "FLAG", "FL6", "", "FL0A", "FL06 ", "_L06"] {
            assert!(!is_growout_code(code), "{} should not be a growout code", code);
        }
    }

    #[test]
    fn test_is_growout_code_strict() {
        let strict = IdentifierParser::new(GrowoutStrictness::BothLetters, CenturyWindow::new(2024));
        assert!(strict.is_growout_code("FL06"));
        assert!(!strict.is_growout_code("F106"));
    }

    #[test]
    fn test_decompose_growout() {
        let p = parser(2024);
        assert_eq!(
            p.decompose_growout("FL06").unwrap(),
            Growout {
                location: "FL".to_string(),
                year: 2006
            }
        );
        assert_eq!(p.decompose_growout("PU98").unwrap().year, 1998);
        assert_eq!(p.decompose_growout("WR24").unwrap().year, 2024);
        assert_eq!(p.decompose_growout("WR25").unwrap().year, 1925);
    }

    #[test]
    fn test_decompose_growout_invalid() {
        let result = parser(2024).decompose_growout("FLA10");
        assert!(matches!(result, Err(PhenoSplitError::ParseError(s)) if s == "FLA10"));
    }

    #[test]
    fn test_century_window_next_century() {
        let window = CenturyWindow::new(2105);
        assert_eq!(window.resolve(3), 2103);
        assert_eq!(window.resolve(6), 2006);
    }

    #[test]
    fn test_trait_to_filename() {
        let p = parser(2024);
        assert_eq!(p.trait_to_filename("weight_FL06").unwrap(), "FL_2006");
        assert_eq!(p.trait_to_filename("B11_lmResid_MO06").unwrap(), "MO_2006");
        assert_eq!(p.trait_to_filename("weight_FLA10").unwrap(), "FLA10");
        assert_eq!(p.trait_to_filename("weight_rep 1 ").unwrap(), "rep 1");
    }

    #[test]
    fn test_trait_to_identifier() {
        let p = parser(2024);
        assert_eq!(p.trait_to_identifier("weight_FL06"), "FL06");
        assert_eq!(p.trait_to_identifier("weight_WR10\n"), "WR10");
        assert_eq!(p.trait_to_identifier("weight_PU98\r\n"), "PU98");
    }

    #[test]
    fn test_trait_to_base_name() {
        assert_eq!(trait_to_base_name("weight_FL06"), "weight");
        assert_eq!(trait_to_base_name("B11_lmResid_MO06"), "B11_lmResid");
        assert_eq!(trait_to_base_name("Pedigree"), "Pedigree");
        assert_eq!(trait_to_base_name("_FL06"), "_FL06");
    }

    #[test]
    fn test_parse_column() {
        let column = parser(2024).parse_column("height_WR10").unwrap();
        assert_eq!(column.base_name, "height");
        assert_eq!(column.identifier, "WR10");
        assert_eq!(column.stem(), "WR_2010");
        assert_eq!(column.filename(), "WR_2010.csv");

        let column = parser(2024).parse_column("height_greenhouse").unwrap();
        assert_eq!(column.growout, None);
        assert_eq!(column.stem(), "greenhouse");
    }
}

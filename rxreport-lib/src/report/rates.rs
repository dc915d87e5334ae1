use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// reaction => rate
pub type ReactionRates = BTreeMap<String, f64>;

/// Collapsed reaction rates, `library -> nuclide -> reaction -> rate`, as
/// written by the collapsing step.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateLibraries {
    pub libraries: BTreeMap<String, BTreeMap<String, ReactionRates>>,
}

impl RateLibraries {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Every nuclide appearing in any library, sorted.
    pub fn nuclides(&self) -> BTreeSet<&str> {
        self.libraries
            .values()
            .flat_map(|nuclides| nuclides.keys().map(String::as_str))
            .collect()
    }

    /// Every reaction appearing for any nuclide in any library, sorted.
    pub fn reactions(&self) -> BTreeSet<&str> {
        self.libraries
            .values()
            .flat_map(|nuclides| nuclides.values())
            .flat_map(|reactions| reactions.keys().map(String::as_str))
            .collect()
    }

    pub fn rate(&self, library: &str, nuclide: &str, reaction: &str) -> Option<f64> {
        self.libraries
            .get(library)?
            .get(nuclide)?
            .get(reaction)
            .copied()
    }
}

/// One ratio column: `numerator / denominator` library rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub label: String,
    pub numerator: String,
    pub denominator: String,
}

impl Comparison {
    pub fn new(label: &str, numerator: &str, denominator: &str) -> Self {
        Comparison {
            label: label.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    /// ENDF/B-VIII.1 and ENDF/B-VIII.0 against each other and against FENDL-3.2b.
    pub fn defaults() -> Vec<Comparison> {
        vec![
            Comparison::new("E81/E80", "endfb-viii.1", "endfb-viii.0"),
            Comparison::new("E80/F32", "endfb-viii.0", "fendl-3.2b"),
            Comparison::new("E81/F32", "endfb-viii.1", "fendl-3.2b"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatioRow {
    pub nuclide: String,
    /// One value per comparison; NaN where the denominator is zero.
    pub values: Vec<f64>,
}

/// Ratios of one reaction's rates across libraries, one row per nuclide.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioTable {
    pub reaction: String,
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<RatioRow>,
}

impl RatioTable {
    /// Nuclides lacking the reaction in any compared library are left out.
    pub fn build(
        rates: &RateLibraries,
        reaction: &str,
        comparisons: &[Comparison],
    ) -> Result<RatioTable> {
        let libraries: BTreeSet<&str> = comparisons
            .iter()
            .flat_map(|c| [c.numerator.as_str(), c.denominator.as_str()])
            .collect();
        if let Some(missing) = libraries
            .iter()
            .find(|lib| !rates.libraries.contains_key(**lib))
        {
            return Err(Error::MissingLibrary(missing.to_string()));
        }

        let mut rows = Vec::new();
        for nuclide in rates.nuclides() {
            let values: Option<BTreeMap<&str, f64>> = libraries
                .iter()
                .map(|lib| rates.rate(lib, nuclide, reaction).map(|rate| (*lib, rate)))
                .collect();
            let Some(values) = values else {
                continue;
            };

            let ratios = comparisons
                .iter()
                .map(|c| ratio(values[c.numerator.as_str()], values[c.denominator.as_str()]))
                .collect();
            rows.push(RatioRow {
                nuclide: nuclide.to_string(),
                values: ratios,
            });
        }

        Ok(RatioTable {
            reaction: reaction.to_string(),
            index_name: "Nuclide".to_string(),
            columns: comparisons.iter().map(|c| c.label.clone()).collect(),
            rows,
        })
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Short, file-name friendly name for a reaction.
pub fn reaction_short_name(reaction: &str) -> String {
    let known = match reaction {
        "(n,elastic)" => Some("elastic"),
        "(n,gamma)" => Some("capture"),
        "(n,p)" => Some("np"),
        "(n,d)" => Some("nd"),
        "(n,t)" => Some("nt"),
        "(n,3He)" => Some("n3He"),
        "(n,a)" => Some("na"),
        "(n,Xp)" => Some("proton_prod"),
        "(n,Xd)" => Some("deuteron_prod"),
        "(n,Xt)" => Some("triton_prod"),
        "(n,X3He)" => Some("helium3_prod"),
        "(n,Xa)" => Some("alpha_prod"),
        "heating" => Some("heating"),
        "damage-energy" => Some("damage"),
        _ => None,
    };
    match known {
        Some(name) => name.to_string(),
        None => reaction
            .chars()
            .filter_map(|c| match c {
                c if c.is_ascii_alphanumeric() => Some(c),
                ',' | '-' | '_' => Some('_'),
                _ => None,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RATES: &str = r#"{
        "endfb-viii.0": {
            "Fe56": {"(n,gamma)": 2.0, "(n,p)": 0.0},
            "H1": {"(n,gamma)": 1.0},
            "Li6": {"(n,gamma)": 4.0}
        },
        "endfb-viii.1": {
            "Fe56": {"(n,gamma)": 3.0, "(n,p)": 1.0},
            "H1": {"(n,gamma)": 1.5}
        },
        "fendl-3.2b": {
            "Fe56": {"(n,gamma)": 1.0, "(n,p)": 2.0},
            "H1": {"(n,gamma)": 0.0},
            "Li6": {"(n,gamma)": 4.0}
        }
    }"#;

    #[test]
    fn collects_nuclides_and_reactions() {
        let rates = RateLibraries::from_json(RATES).unwrap();
        assert_eq!(rates.nuclides().into_iter().collect::<Vec<_>>(), vec!["Fe56", "H1", "Li6"]);
        assert_eq!(
            rates.reactions().into_iter().collect::<Vec<_>>(),
            vec!["(n,gamma)", "(n,p)"]
        );
    }

    #[test]
    fn rows_need_every_library() {
        let rates = RateLibraries::from_json(RATES).unwrap();
        let table = RatioTable::build(&rates, "(n,gamma)", &Comparison::defaults()).unwrap();
        assert_eq!(table.columns, vec!["E81/E80", "E80/F32", "E81/F32"]);
        let nuclides: Vec<_> = table.rows.iter().map(|r| r.nuclide.as_str()).collect();
        assert_eq!(nuclides, vec!["Fe56", "H1"]);
        assert_eq!(table.rows[0].values, vec![1.5, 2.0, 3.0]);
    }

    #[test]
    fn zero_denominator_gives_nan() {
        let rates = RateLibraries::from_json(RATES).unwrap();
        let gamma = RatioTable::build(&rates, "(n,gamma)", &Comparison::defaults()).unwrap();
        let h1 = &gamma.rows[1].values;
        assert_eq!(h1[0], 1.5);
        assert!(h1[1].is_nan() && h1[2].is_nan());

        let np = RatioTable::build(&rates, "(n,p)", &Comparison::defaults()).unwrap();
        assert!(np.rows[0].values[0].is_nan());
        assert_eq!(np.rows[0].values[1], 0.0);
    }

    #[test]
    fn unknown_library_is_an_error() {
        let rates = RateLibraries::from_json(RATES).unwrap();
        let comparisons = vec![Comparison::new("J/E", "jeff-3.3", "endfb-viii.0")];
        let err = RatioTable::build(&rates, "(n,gamma)", &comparisons).unwrap_err();
        assert!(matches!(err, Error::MissingLibrary(ref lib) if lib == "jeff-3.3"));
    }

    #[test]
    fn short_names() {
        assert_eq!(reaction_short_name("(n,gamma)"), "capture");
        assert_eq!(reaction_short_name("damage-energy"), "damage");
        assert_eq!(reaction_short_name("(n,2n)"), "n_2n");
    }
}

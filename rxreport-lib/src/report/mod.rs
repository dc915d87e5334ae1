//! Reaction-rate comparison reports.
//!
//! Takes the collapsed rates of several nuclear-data libraries, computes
//! per-nuclide ratios for each reaction and writes one styled HTML table per
//! reaction, optionally inlined and wrapped in a notebook.

pub mod gradient;
pub mod rates;
pub mod styler;

pub use gradient::Gradient;
pub use rates::{reaction_short_name, Comparison, RateLibraries, RatioRow, RatioTable};
pub use styler::StyledTable;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::inliner::{inline_styles_with, InlineOptions};
use crate::notebook::write_notebook;
use crate::Result;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub comparisons: Vec<Comparison>,
    pub gradient: Gradient,
    pub precision: usize,
    /// Inline the generated `<style>` rules before writing.
    pub inline: bool,
    /// Also write a single-cell notebook next to each HTML file.
    pub notebook: bool,
    pub inline_options: InlineOptions,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            comparisons: Comparison::defaults(),
            gradient: Gradient::default(),
            precision: 3,
            inline: false,
            notebook: false,
            inline_options: InlineOptions::default(),
        }
    }
}

/// Renders the report for one reaction.
pub fn render_reaction(
    rates: &RateLibraries,
    reaction: &str,
    options: &ReportOptions,
) -> Result<String> {
    let table = RatioTable::build(rates, reaction, &options.comparisons)?;
    let html = StyledTable::new(&table)
        .gradient(options.gradient)
        .precision(options.precision)
        .to_html();
    if options.inline {
        Ok(inline_styles_with(&html, &options.inline_options)?.html)
    } else {
        Ok(html)
    }
}

/// Writes `{out_dir}/{short_name}_{suffix}.html` for every reaction and
/// returns the paths written, notebooks included.
///
/// Reactions whose short names coincide get `_2`, `_3`, ... appended in
/// sorted reaction order, so no report overwrites another.
pub fn write_reports(
    rates: &RateLibraries,
    suffix: &str,
    out_dir: impl AsRef<Path>,
    options: &ReportOptions,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    let mut stems = HashSet::new();
    for reaction in rates.reactions() {
        let html = render_reaction(rates, reaction, options)?;
        let stem = unique_stem(&mut stems, &reaction_short_name(reaction), suffix);

        let html_path = out_dir.join(format!("{}.html", stem));
        fs::write(&html_path, &html)?;
        log::info!("wrote {} report to {}", reaction, html_path.display());
        written.push(html_path);

        if options.notebook {
            let notebook_path = out_dir.join(format!("{}.ipynb", stem));
            write_notebook(&html, &notebook_path)?;
            written.push(notebook_path);
        }
    }
    Ok(written)
}

fn unique_stem(used: &mut HashSet<String>, short_name: &str, suffix: &str) -> String {
    let base = if short_name.is_empty() {
        "reaction"
    } else {
        short_name
    };
    let mut stem = format!("{}_{}", base, suffix);
    let mut n = 2;
    while used.contains(&stem) {
        stem = format!("{}_{}_{}", base, n, suffix);
        n += 1;
    }
    used.insert(stem.clone());
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn colliding_short_names_get_numbered() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem(&mut used, "n_x", "v1"), "n_x_v1");
        assert_eq!(unique_stem(&mut used, "n_x", "v1"), "n_x_2_v1");
        assert_eq!(unique_stem(&mut used, "n_x", "v1"), "n_x_3_v1");
        assert_eq!(unique_stem(&mut used, "", "v1"), "reaction_v1");
        assert_eq!(unique_stem(&mut used, "", "v1"), "reaction_2_v1");
    }
}

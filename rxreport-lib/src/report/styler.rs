use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::report::gradient::Gradient;
use crate::report::rates::RatioTable;

/// Renders a [`RatioTable`] as HTML with a gradient background.
///
/// The output has the shape the inliner consumes: one `<style>` block of
/// identifier-keyed rules followed by a table whose cells carry those ids.
/// Cells with identical declarations share a single rule.
#[derive(Debug, Clone)]
pub struct StyledTable<'a> {
    table: &'a RatioTable,
    gradient: Gradient,
    precision: usize,
    table_id: String,
}

impl<'a> StyledTable<'a> {
    pub fn new(table: &'a RatioTable) -> Self {
        StyledTable {
            table,
            gradient: Gradient::default(),
            precision: 3,
            table_id: default_table_id(&table.reaction),
        }
    }

    pub fn gradient(mut self, gradient: Gradient) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn table_id(mut self, table_id: &str) -> Self {
        self.table_id = table_id.to_string();
        self
    }

    fn cell_id(&self, row: usize, col: usize) -> String {
        format!("T_{}_row{}_col{}", self.table_id, row, col)
    }

    fn format_value(&self, value: f64) -> String {
        if value.is_nan() {
            "nan".to_string()
        } else {
            format!("{:.*}", self.precision, value)
        }
    }

    /// Groups cell ids by their declaration block, in first-seen order.
    fn rules(&self) -> Vec<(String, Vec<String>)> {
        let mut rules: Vec<(String, Vec<String>)> = Vec::new();
        let mut by_block: HashMap<String, usize> = HashMap::new();

        for (row, ratio_row) in self.table.rows.iter().enumerate() {
            for (col, value) in ratio_row.values.iter().enumerate() {
                let declarations = self.gradient.declarations(*value);
                let block: String = declarations
                    .iter()
                    .map(|(property, value)| format!("  {}: {};\n", property, value))
                    .collect();
                let index = *by_block.entry(block.clone()).or_insert_with(|| {
                    rules.push((block, Vec::new()));
                    rules.len() - 1
                });
                rules[index].1.push(self.cell_id(row, col));
            }
        }
        rules
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<style type=\"text/css\">\n");
        for (block, ids) in self.rules() {
            let selectors: Vec<String> = ids.iter().map(|id| format!("#{}", id)).collect();
            html.push_str(&format!("{} {{\n{}}}\n", selectors.join(", "), block));
        }
        html.push_str("</style>\n");

        html.push_str(&format!("<table id=\"T_{}\">\n", self.table_id));
        html.push_str("  <thead>\n    <tr>\n");
        html.push_str(&format!(
            "      <th class=\"index_name level0\" >{}</th>\n",
            escape(&self.table.index_name)
        ));
        for (col, label) in self.table.columns.iter().enumerate() {
            html.push_str(&format!(
                "      <th id=\"T_{}_level0_col{}\" class=\"col_heading level0 col{}\" >{}</th>\n",
                self.table_id,
                col,
                col,
                escape(label)
            ));
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

        for (row, ratio_row) in self.table.rows.iter().enumerate() {
            html.push_str("    <tr>\n");
            html.push_str(&format!(
                "      <th id=\"T_{}_level0_row{}\" class=\"row_heading level0 row{}\" >{}</th>\n",
                self.table_id,
                row,
                row,
                escape(&ratio_row.nuclide)
            ));
            for (col, value) in ratio_row.values.iter().enumerate() {
                html.push_str(&format!(
                    "      <td id=\"{}\" class=\"data row{} col{}\" >{}</td>\n",
                    self.cell_id(row, col),
                    row,
                    col,
                    self.format_value(*value)
                ));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>\n");
        html
    }
}

/// Five hex characters derived from the reaction name.
fn default_table_id(reaction: &str) -> String {
    let mut hasher = DefaultHasher::new();
    reaction.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..5].to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::rates::RatioRow;
    use pretty_assertions::assert_eq;

    fn table() -> RatioTable {
        RatioTable {
            reaction: "(n,gamma)".into(),
            index_name: "Nuclide".into(),
            columns: vec!["A/B".into(), "A/C".into()],
            rows: vec![
                RatioRow {
                    nuclide: "Fe56".into(),
                    values: vec![0.5, f64::NAN],
                },
                RatioRow {
                    nuclide: "H1".into(),
                    values: vec![0.2, 1.5],
                },
            ],
        }
    }

    #[test]
    fn renders_shared_rules_and_ids() {
        let table = table();
        let html = StyledTable::new(&table).table_id("x").to_html();
        let expected_style = "<style type=\"text/css\">
#T_x_row0_col0, #T_x_row1_col0 {
  background-color: #053061;
  color: #f1f1f1;
}
#T_x_row0_col1 {
  background-color: #000000;
  color: #f1f1f1;
}
#T_x_row1_col1 {
  background-color: #67001f;
  color: #f1f1f1;
}
</style>
";
        assert!(html.starts_with(expected_style), "{}", html);
        assert!(html.contains("<table id=\"T_x\">"));
        assert!(html.contains("<td id=\"T_x_row0_col0\" class=\"data row0 col0\" >0.500</td>"));
        assert!(html.contains("<td id=\"T_x_row0_col1\" class=\"data row0 col1\" >nan</td>"));
        assert!(html.contains(">A/B</th>"));
    }

    #[test]
    fn precision_is_configurable() {
        let table = table();
        let html = StyledTable::new(&table).precision(1).to_html();
        assert!(html.contains(">0.2</td>"));
        assert!(html.contains(">1.5</td>"));
    }
}

use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table<L: AsRef<str>, V: AsRef<str>>(stats: &[(L, V)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label.as_ref(), value.as_ref());
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_nothing() {
        let rows: [(&str, &str); 0] = [];
        assert!(stats_table(&rows).is_empty());
    }

    #[test]
    fn test_rows_rendered() {
        let table = stats_table(&[("Users", "3".to_string()), ("Submissions", "10".to_string())]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Users"));
        assert!(table.contains("10"));
    }
}

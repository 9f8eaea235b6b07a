//! Row filters

use std::fmt::Display;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// Returned columns, equality filters, ordering and a row limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    columns: Vec<String>,
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    limit: Option<u32>,
}

impl Query {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the returned columns; every column when never called.
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(ToString::to_string).collect();
        self
    }

    /// The `select` list sent to the gateway.
    pub fn select_list(&self) -> String {
        if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        }
    }

    /// Adds `column = value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    /// Orders by a column.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    /// Caps the number of rows.
    #[must_use]
    pub fn limit(mut self, rows: u32) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Value of an equality filter, if the query has one on `column`.
    pub fn filter(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// REST gateway query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select_list())];

        params.extend(
            self.filters
                .iter()
                .map(|(column, value)| (column.clone(), format!("eq.{value}"))),
        );

        if let Some((column, direction)) = &self.order {
            let direction = match direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };

            params.push(("order".to_string(), format!("{column}.{direction}")));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

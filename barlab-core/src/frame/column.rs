//! Column storage for `Frame`.
//!
//! Float columns use `f64::NAN` as the unknown sentinel. Equality treats two
//! NaN cells as equal so that tables can be compared exactly.

use serde::{Deserialize, Serialize};

/// A single heterogeneous cell, used by `Column::Mixed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => same_float(*a, *b),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => fmt_float(f, *v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

/// A named column's values. All columns in a frame share the index length.
#[derive(Debug, Clone)]
pub enum Column {
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
    Mixed(Vec<Cell>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Mixed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Float(_) => "float",
            Column::Bool(_) => "bool",
            Column::Text(_) => "text",
            Column::Mixed(_) => "mixed",
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Column::Float(v) => Some(v),
            _ => None,
        }
    }

    /// The cell at `row` as a `Cell`, or `None` past the end.
    pub fn get(&self, row: usize) -> Option<Cell> {
        match self {
            Column::Float(v) => v.get(row).map(|&x| Cell::Float(x)),
            Column::Bool(v) => v.get(row).map(|&x| Cell::Bool(x)),
            Column::Text(v) => v.get(row).map(|x| Cell::Text(x.clone())),
            Column::Mixed(v) => v.get(row).cloned(),
        }
    }

    /// Text rendering of one cell. NaN renders as an empty string.
    pub fn display(&self, row: usize) -> String {
        self.get(row).map(|c| c.to_string()).unwrap_or_default()
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Column::Float(a), Column::Float(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| same_float(x, y))
            }
            (Column::Bool(a), Column::Bool(b)) => a == b,
            (Column::Text(a), Column::Text(b)) => a == b,
            (Column::Mixed(a), Column::Mixed(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(v)
    }
}

impl From<Vec<bool>> for Column {
    fn from(v: Vec<bool>) -> Self {
        Column::Bool(v)
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Text(v)
    }
}

impl From<Vec<Cell>> for Column {
    fn from(v: Vec<Cell>) -> Self {
        Column::Mixed(v)
    }
}

fn same_float(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

fn fmt_float(f: &mut std::fmt::Formatter<'_>, v: f64) -> std::fmt::Result {
    if v.is_nan() {
        Ok(())
    } else {
        write!(f, "{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_cells_compare_equal() {
        let a = Column::Float(vec![f64::NAN, 1.0]);
        let b = Column::Float(vec![f64::NAN, 1.0]);
        assert_eq!(a, b);
        assert_ne!(a, Column::Float(vec![f64::NAN, 2.0]));
    }

    #[test]
    fn different_variants_are_unequal() {
        assert_ne!(Column::Float(vec![1.0]), Column::Mixed(vec![Cell::Float(1.0)]));
    }

    #[test]
    fn display_renders_nan_as_empty() {
        let c = Column::Float(vec![f64::NAN, 2.5]);
        assert_eq!(c.display(0), "");
        assert_eq!(c.display(1), "2.5");
        assert_eq!(c.display(2), "");
    }

    #[test]
    fn mixed_cells_deserialize_untagged() {
        let cells: Vec<Cell> = serde_json::from_str(r#"[1, -1.5, "BUY", null, true]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                Cell::Int(1),
                Cell::Float(-1.5),
                Cell::Text("BUY".into()),
                Cell::Null,
                Cell::Bool(true),
            ]
        );
    }
}

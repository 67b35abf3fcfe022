use std::ops::Deref;

use chrono::Local;
use diesel::PgConnection;
use indexmap::IndexMap;
use itertools::Itertools;
use thiserror::Error;
use tracing::trace_span;

use crate::database::models::shopping_cart::ShoppingCart;

#[derive(Error, Debug)]
pub enum ShoppingListError {
    #[error("amount overflow while summing {name} ({unit})")]
    AmountOverflow { name: String, unit: String },

    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

// Aggregation key: exact, case-sensitive (name, unit) pair. Two rows named
// "salt" in "g" and "salt" in "kg" stay separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub name: String,
    pub unit: String,
}

// Merged ingredient quantities in first-encountered key order.
#[derive(Clone, Default)]
pub struct ShoppingList {
    inner: IndexMap<ListKey, i64>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    pub fn with_entries(entries: IndexMap<ListKey, i64>) -> Self {
        Self { inner: entries }
    }

    pub fn add_line(
        &mut self,
        name: &str,
        unit: &str,
        amount: i32,
    ) -> Result<(), ShoppingListError> {
        let key = ListKey {
            name: name.to_owned(),
            unit: unit.to_owned(),
        };

        let total = self.inner.entry(key).or_insert(0);
        *total = total
            .checked_add(i64::from(amount))
            .ok_or_else(|| ShoppingListError::AmountOverflow {
                name: name.to_owned(),
                unit: unit.to_owned(),
            })?;

        Ok(())
    }

    pub fn from_lines<I>(lines: I) -> Result<Self, ShoppingListError>
    where
        I: IntoIterator<Item = (String, String, i32)>,
    {
        let mut list = Self::new();
        for (name, unit, amount) in lines {
            list.add_line(&name, &unit, amount)?;
        }

        Ok(list)
    }

    // One line per entry, 1-indexed, in insertion order. An empty list
    // renders the empty string.
    pub fn render(&self) -> String {
        self.inner
            .iter()
            .enumerate()
            .map(|(index, (key, amount))| {
                format!("{}) {} {} {};", index + 1, key.name, amount, key.unit)
            })
            .join("\n")
    }
}

impl Deref for ShoppingList {
    type Target = IndexMap<ListKey, i64>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for ShoppingList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

pub struct Export {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

pub fn export_filename() -> String {
    let suffix = Local::now().format("%y%m%d_%H%M%S");
    format!("shopping_cart_{suffix}.txt")
}

// The whole pipeline: resolve the user's cart rows, merge them by
// (name, unit), render the document into an in-memory buffer. Nothing is
// written to disk at any point.
pub fn export_shopping_list(
    user: i32,
    connection: &mut PgConnection,
) -> Result<Export, ShoppingListError> {
    let span = trace_span!("export shopping list", user);
    let _guard = span.enter();

    let lines = ShoppingCart::cart_lines(user, connection)?;
    let list = ShoppingList::from_lines(lines)?;

    Ok(Export {
        bytes: list.render().into_bytes(),
        filename: export_filename(),
        content_type: "text/plain; charset=utf-8",
    })
}

#[cfg(test)]
mod tests {
    use super::{ShoppingList, ShoppingListError};

    fn lines(raw: &[(&str, &str, i32)]) -> Vec<(String, String, i32)> {
        raw.iter()
            .map(|(name, unit, amount)| (name.to_string(), unit.to_string(), *amount))
            .collect()
    }

    #[test]
    fn empty_cart_renders_zero_lines() {
        let list = ShoppingList::from_lines(Vec::new()).unwrap();

        assert!(list.is_empty());
        assert_eq!(list.render(), "");
    }

    #[test]
    fn duplicate_ingredients_merge_by_name_and_unit() {
        let list = ShoppingList::from_lines(lines(&[
            ("flour", "g", 200),
            ("sugar", "g", 50),
            ("flour", "g", 100),
            ("egg", "pcs", 2),
        ]))
        .unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(
            list.render(),
            "1) flour 300 g;\n2) sugar 50 g;\n3) egg 2 pcs;"
        );
    }

    #[test]
    fn totals_do_not_depend_on_input_order() {
        let forward = ShoppingList::from_lines(lines(&[
            ("flour", "g", 200),
            ("egg", "pcs", 2),
            ("flour", "g", 100),
        ]))
        .unwrap();
        let backward = ShoppingList::from_lines(lines(&[
            ("flour", "g", 100),
            ("egg", "pcs", 2),
            ("flour", "g", 200),
        ]))
        .unwrap();

        for (key, total) in forward.iter() {
            assert_eq!(backward.get(key), Some(total));
        }
    }

    #[test]
    fn same_name_different_unit_stays_separate() {
        let list =
            ShoppingList::from_lines(lines(&[("salt", "g", 10), ("salt", "pinch", 1)])).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.render(), "1) salt 10 g;\n2) salt 1 pinch;");
    }

    #[test]
    fn key_match_is_case_sensitive() {
        let list = ShoppingList::from_lines(lines(&[("Salt", "g", 10), ("salt", "g", 5)])).unwrap();

        assert_eq!(list.len(), 2);
    }

    #[test]
    fn rendering_is_idempotent() {
        let list = ShoppingList::from_lines(lines(&[("flour", "g", 200), ("egg", "pcs", 2)]))
            .unwrap();

        assert_eq!(list.render(), list.render());
    }

    #[test]
    fn overflow_is_an_error_not_a_wrap() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert(
            super::ListKey {
                name: "flour".to_owned(),
                unit: "g".to_owned(),
            },
            i64::MAX - 1,
        );
        let mut list = ShoppingList::with_entries(entries);

        assert!(matches!(
            list.add_line("flour", "g", 2),
            Err(ShoppingListError::AmountOverflow { .. })
        ));
        assert!(list.add_line("sugar", "g", 2).is_ok());
    }

    #[test]
    fn export_filename_matches_expected_pattern() {
        let filename = super::export_filename();

        assert!(filename.starts_with("shopping_cart_"));
        assert!(filename.ends_with(".txt"));

        // shopping_cart_<YYMMDD>_<HHMMSS>.txt
        let stamp = &filename["shopping_cart_".len()..filename.len() - ".txt".len()];
        assert_eq!(stamp.len(), 13);
        assert_eq!(&stamp[6..7], "_");
        assert!(stamp
            .chars()
            .enumerate()
            .all(|(i, c)| if i == 6 { c == '_' } else { c.is_ascii_digit() }));
    }
}

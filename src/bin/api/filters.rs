use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilters {
    pub author: Option<i32>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeFilters {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let author = params.get("author").and_then(|value| value.parse().ok());
        let tags = params
            .get("tags")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|slug| !slug.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            author,
            tags,
            is_favorited: flag(params, "is_favorited"),
            is_in_shopping_cart: flag(params, "is_in_shopping_cart"),
        }
    }
}

fn flag(params: &HashMap<String, String>, key: &str) -> bool {
    matches!(params.get(key).map(String::as_str), Some("1") | Some("true"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::RecipeFilters;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_params_mean_no_filtering() {
        assert_eq!(
            RecipeFilters::from_params(&HashMap::new()),
            RecipeFilters::default()
        );
    }

    #[test]
    fn tags_split_on_commas() {
        let filters = RecipeFilters::from_params(&params(&[("tags", "breakfast, dinner,")]));

        assert_eq!(filters.tags, vec!["breakfast", "dinner"]);
    }

    #[test]
    fn flags_accept_one_and_true_only() {
        assert!(RecipeFilters::from_params(&params(&[("is_favorited", "1")])).is_favorited);
        assert!(RecipeFilters::from_params(&params(&[("is_favorited", "true")])).is_favorited);
        assert!(!RecipeFilters::from_params(&params(&[("is_favorited", "0")])).is_favorited);
        assert!(!RecipeFilters::from_params(&params(&[("is_favorited", "yes")])).is_favorited);
    }

    #[test]
    fn author_must_be_numeric() {
        assert_eq!(
            RecipeFilters::from_params(&params(&[("author", "7")])).author,
            Some(7)
        );
        assert_eq!(
            RecipeFilters::from_params(&params(&[("author", "nope")])).author,
            None
        );
    }
}

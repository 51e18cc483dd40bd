use crate::catalog::Product;

pub mod store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub id: String,
    pub name: String,
    pub brand: String,
}

/// The single owned selection value. Card visuals, the summary list, and the
/// durable record are all projections of this; nothing else holds selection
/// state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<SelectionEntry>,
}

impl Selection {
    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Flips the product in or out of the selection. Returns whether the
    /// product is selected afterwards. Toggling twice is its own inverse.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(&product.id) {
            false
        } else {
            self.entries.push(SelectionEntry {
                id: product.id.clone(),
                name: product.name.clone(),
                brand: product.brand.clone(),
            });
            true
        }
    }

    pub fn add(&mut self, id: String, name: String, brand: String) {
        if self.contains(&id) {
            return;
        }
        self.entries.push(SelectionEntry { id, name, brand });
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// The ordered identifiers, exactly the summary rows. This is what the
    /// durable record holds.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    /// Rebuilds a selection from stored identifiers against the currently
    /// rendered products, in stored order. Identifiers that resolve to no
    /// visible product are silently dropped.
    pub fn hydrate(stored_ids: &[String], visible: &[Product]) -> Self {
        let mut selection = Self::default();
        for id in stored_ids {
            if let Some(product) = visible.iter().find(|product| &product.id == id) {
                selection.add(
                    product.id.clone(),
                    product.name.clone(),
                    product.brand.clone(),
                );
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use crate::catalog::Product;

    fn product(id: &str, name: &str, brand: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            brand: brand.to_string(),
            category: "serum".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn toggle_twice_restores_the_prior_state() {
        let serum = product("1", "Dew Serum", "Acme");
        let mut selection = Selection::default();
        selection.add("0".to_string(), "Milk Cleanser".to_string(), "Lait".to_string());
        let before = selection.clone();

        assert!(selection.toggle(&serum));
        assert!(selection.contains("1"));
        assert!(!selection.toggle(&serum));
        assert_eq!(selection, before);
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut selection = Selection::default();
        selection.toggle(&product("2", "Shield SPF", "Solis"));
        selection.toggle(&product("1", "Dew Serum", "Acme"));

        assert_eq!(selection.ids(), vec!["2", "1"]);
    }

    #[test]
    fn add_is_a_no_op_for_a_present_id() {
        let mut selection = Selection::default();
        selection.add("1".to_string(), "Dew Serum".to_string(), "Acme".to_string());
        selection.add("1".to_string(), "Dew Serum".to_string(), "Acme".to_string());
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn remove_absent_id_is_a_no_op() {
        let mut selection = Selection::default();
        assert!(!selection.remove("missing"));
        assert!(selection.is_empty());
    }

    #[test]
    fn hydrate_restores_only_visible_products_in_stored_order() {
        let visible = vec![
            product("1", "Dew Serum", "Acme"),
            product("3", "Night Serum", "Acme"),
        ];
        let stored = vec![
            "3".to_string(),
            "stale-id".to_string(),
            "1".to_string(),
        ];

        let selection = Selection::hydrate(&stored, &visible);
        assert_eq!(selection.ids(), vec!["3", "1"]);
        assert_eq!(selection.entries()[0].name, "Night Serum");
    }

    #[test]
    fn hydrate_against_nothing_rendered_is_empty() {
        let stored = vec!["1".to_string()];
        assert!(Selection::hydrate(&stored, &[]).is_empty());
    }
}

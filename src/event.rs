use crate::catalog::Product;

#[derive(Debug, Clone)]
pub enum AppEvent {
    CatalogLoaded(Vec<Product>),
    CatalogFailed(String),
}

//! User-facing messages, French and English.

use std::sync::Arc;

use scout_flux::{Catalog, I18nStore};

pub const ERROR_SEARCH: &str = "error/search";
pub const ERROR_EMAIL_FINDER: &str = "error/email_finder";
pub const ERROR_DOMAIN_TRACE: &str = "error/domain_trace";
pub const ERROR_REQUIRED_FIELDS: &str = "error/required_fields";
pub const ERROR_DOMAIN_REQUIRED: &str = "error/domain_required";
pub const ERROR_DOMAIN_INVALID: &str = "error/domain_invalid";

/// `page/label?current=1&total=3`
pub fn page_label_url(current: u64, total: u64) -> String {
    format!("page/label?current={current}&total={total}")
}

pub fn catalog() -> Catalog {
    Catalog::new("fr")
        .with("fr", ERROR_SEARCH, "Une erreur s'est produite pendant la recherche. Veuillez réessayer.")
        .with("en", ERROR_SEARCH, "An error occurred while searching. Please try again.")
        .with("fr", ERROR_EMAIL_FINDER, "Erreur lors de l'appel à l'API. Vérifiez les données saisies.")
        .with("en", ERROR_EMAIL_FINDER, "The email finder call failed. Check the values you entered.")
        .with("fr", ERROR_DOMAIN_TRACE, "Erreur lors de la vérification du domaine.")
        .with("en", ERROR_DOMAIN_TRACE, "Domain verification failed.")
        .with("fr", ERROR_REQUIRED_FIELDS, "Tous les champs sont obligatoires.")
        .with("en", ERROR_REQUIRED_FIELDS, "All fields are required.")
        .with("fr", ERROR_DOMAIN_REQUIRED, "Veuillez entrer un domaine.")
        .with("en", ERROR_DOMAIN_REQUIRED, "Please enter a domain.")
        .with("fr", ERROR_DOMAIN_INVALID, "Veuillez entrer un domaine valide (ex. example.com).")
        .with("en", ERROR_DOMAIN_INVALID, "Please enter a valid domain (e.g. example.com).")
        .with("fr", "page/label", "Page {current} sur {total}")
        .with("en", "page/label", "Page {current} of {total}")
}

/// Register all Scout messages with the store.
pub fn register_all(i18n: &I18nStore) {
    let catalog = Arc::new(catalog());
    i18n.handle("error/#", catalog.clone());
    i18n.handle("page/#", catalog);
}

//! Attribute lookup by namespace and key.
//!
//! HTML attribute names are case-insensitive, foreign (namespaced) ones are
//! not: when the requested namespace is empty, keys are compared after
//! lowercasing both sides; otherwise namespace and key must match exactly.

use crate::tree::Attribute;

/// Returns the first attribute matching `namespace` and `key`.
///
/// # Examples
///
/// ```
/// use htmlsift::tree::Attribute;
/// use htmlsift::util::attr::get_attr;
///
/// let attrs = [Attribute::new("one", "value_1")];
/// assert_eq!(get_attr("", "ONE", &attrs).map(|a| a.value.as_str()), Some("value_1"));
/// assert!(get_attr("xlink", "one", &attrs).is_none());
/// ```
#[must_use]
pub fn get_attr<'a>(namespace: &str, key: &str, attributes: &'a [Attribute]) -> Option<&'a Attribute> {
    if namespace.is_empty() {
        let key = key.to_lowercase();
        attributes
            .iter()
            .find(|attr| attr.namespace.is_empty() && attr.key.to_lowercase() == key)
    } else {
        attributes
            .iter()
            .find(|attr| attr.namespace == namespace && attr.key == key)
    }
}

/// Returns the value of the attribute matched by [`get_attr`], or `""`.
#[must_use]
pub fn get_attr_val<'a>(namespace: &str, key: &str, attributes: &'a [Attribute]) -> &'a str {
    get_attr(namespace, key, attributes).map_or("", |attr| attr.value.as_str())
}

/// Splits a `class` attribute value into its whitespace-separated tokens.
pub fn class_tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_ascii_whitespace()
}

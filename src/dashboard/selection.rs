use crate::api::Property;

/// Decide which property is selected after a fresh list arrives.
///
/// Keeps `previous` when it still names a property in `list`, otherwise
/// falls back to the first property in backend order, or empty when the
/// list is empty.
pub fn reconcile_selection(previous: &str, list: &[Property]) -> String {
    if !previous.is_empty() && list.iter().any(|p| p.id == previous) {
        return previous.to_string();
    }

    list.first().map(|p| p.id.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(id: &str, name: &str) -> Property {
        Property {
            id: id.to_string(),
            name: name.to_string(),
            timezone: "UTC".to_string(),
        }
    }

    #[test]
    fn test_defaults_to_first_without_previous() {
        let list = vec![property("p1", "Alpha"), property("p2", "Beta")];
        assert_eq!(reconcile_selection("", &list), "p1");
    }

    #[test]
    fn test_keeps_backend_order() {
        // "Zulu" sorts last but the backend sent it first
        let list = vec![property("z", "Zulu"), property("a", "Alpha")];
        assert_eq!(reconcile_selection("", &list), "z");
    }

    #[test]
    fn test_preserves_present_selection() {
        let list = vec![property("p1", "Alpha"), property("p2", "Beta")];
        assert_eq!(reconcile_selection("p2", &list), "p2");
    }

    #[test]
    fn test_resets_absent_selection_to_first() {
        let list = vec![property("p3", "Gamma"), property("p1", "Alpha")];
        assert_eq!(reconcile_selection("p9", &list), "p3");
    }

    #[test]
    fn test_empty_list_clears_selection() {
        assert_eq!(reconcile_selection("p1", &[]), "");
        assert_eq!(reconcile_selection("", &[]), "");
    }
}

use std::collections::HashMap;

use crate::item::{CatalogEntry, GrantEntry, ItemId, VisibleItem};

/// Keeps the catalog entries the user holds a grant for, in catalog order,
/// with the grant's URL attached. Grants without a catalog entry are dropped.
/// When several grants share a key the last one wins.
pub fn merge(catalog: &[CatalogEntry], grants: &[GrantEntry]) -> Vec<VisibleItem> {
    let urls: HashMap<&ItemId, &str> = grants
        .iter()
        .map(|grant| (&grant.item_id, grant.url.as_str()))
        .collect();

    catalog
        .iter()
        .filter_map(|entry| {
            urls.get(&entry.item_id)
                .map(|url| VisibleItem::from_parts(entry, url))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new(1, "A", "first"),
            CatalogEntry::new(2, "B", "second"),
            CatalogEntry::new(3, "C", "third"),
        ]
    }

    #[test]
    fn keeps_only_granted_items_with_grant_url() {
        let grants = vec![GrantEntry::new(2, "u2")];
        let merged = merge(&catalog()[..2], &grants);
        assert_eq!(
            merged,
            vec![VisibleItem {
                item_id: ItemId::from(2),
                name: "B".into(),
                description: "second".into(),
                url: "u2".into(),
                start_date: None,
                end_date: None,
                survey_type: None,
            }]
        );
    }

    #[test]
    fn catalog_schedule_fields_reach_the_view() {
        let mut entry = CatalogEntry::new(1, "A", "");
        entry.end_date = Some("2026-11-30 23:59:00".into());
        entry.survey_type = Some("course".into());
        let merged = merge(&[entry], &[GrantEntry::new(1, "u1")]);
        assert_eq!(merged[0].end_date.as_deref(), Some("2026-11-30 23:59:00"));
        assert_eq!(merged[0].survey_type.as_deref(), Some("course"));
        assert_eq!(merged[0].start_date, None);
    }

    #[test]
    fn integral_float_key_matches_integer_key() {
        let catalog: Vec<CatalogEntry> =
            serde_json::from_str(r#"[{"surveyId":1.0,"name":"A"}]"#).unwrap();
        let merged = merge(&catalog, &[GrantEntry::new(1, "u1")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].url, "u1");
    }

    #[test]
    fn preserves_catalog_order() {
        let grants = vec![
            GrantEntry::new(3, "u3"),
            GrantEntry::new(1, "u1"),
            GrantEntry::new(2, "u2"),
        ];
        let names: Vec<_> = merge(&catalog(), &grants)
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn drops_grants_without_catalog_entry() {
        let grants = vec![GrantEntry::new(9, "u9"), GrantEntry::new(1, "u1")];
        let merged = merge(&catalog(), &grants);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].item_id, ItemId::from(1));
    }

    #[test]
    fn last_duplicate_grant_wins() {
        let grants = vec![GrantEntry::new(1, "old"), GrantEntry::new(1, "new")];
        let merged = merge(&catalog(), &grants);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].url, "new");
    }

    #[test]
    fn key_types_do_not_coerce() {
        let grants = vec![GrantEntry::new("1", "u1")];
        assert!(merge(&catalog(), &grants).is_empty());
    }

    #[test]
    fn empty_inputs_give_empty_view() {
        assert!(merge(&[], &[GrantEntry::new(1, "u1")]).is_empty());
        assert!(merge(&catalog(), &[]).is_empty());
    }
}

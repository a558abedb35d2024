use super::*;

const SEARCHES: &[&str] = &["", "panen", "Panen", "gotong royong", " "];
const CATEGORIES: &[&str] = &["", "kegiatan", "wisata", "pembangunan"];

#[test]
fn changing_search_or_category_always_resets_page() {
    for &search in SEARCHES {
        for &category in CATEGORIES {
            let base = QueryState::default()
                .with_search(search)
                .with_category(category)
                .with_page(7);

            for &next_search in SEARCHES {
                for &next_category in CATEGORIES {
                    let next = base
                        .clone()
                        .with_search(next_search)
                        .with_category(next_category);
                    if next_search != search || next_category != category {
                        assert_eq!(
                            next.page, 1,
                            "({search:?}, {category:?}) -> ({next_search:?}, {next_category:?})"
                        );
                    } else {
                        assert_eq!(next.page, 7);
                    }
                }
            }
        }
    }
}

#[test]
fn changing_status_resets_page() {
    let state = QueryState::default().with_page(3);
    let filtered = state.clone().with_status(Some(GalleryStatus::Inactive));
    assert_eq!(filtered.page, 1);

    let unchanged = state.with_status(None);
    assert_eq!(unchanged.page, 3);
}

#[test]
fn page_is_never_below_one() {
    assert_eq!(QueryState::default().with_page(0).page, 1);
}

#[test]
fn public_request_carries_page_and_twelve_item_limit() {
    let request = QueryState::default()
        .with_search("  panen ")
        .with_page(2)
        .to_request(ListScope::Public);
    assert_eq!(request.page, Some(2));
    assert_eq!(request.limit, Some(12));
    assert_eq!(request.search.as_deref(), Some("panen"));
    assert_eq!(request.category, None);
    assert_eq!(request.status, None);
}

#[test]
fn admin_request_is_single_page_with_status_filter() {
    let request = QueryState::default()
        .with_category("kegiatan")
        .with_status(Some(GalleryStatus::Active))
        .to_request(ListScope::Admin);
    assert_eq!(request.page, None);
    assert_eq!(request.limit, Some(50));
    assert_eq!(request.category.as_deref(), Some("kegiatan"));
    assert_eq!(request.status.as_deref(), Some("active"));
}

use serde::{Serialize, Serializer};

/// Page buttons shown before the ellipsis kicks in.
const MAX_VISIBLE_PAGES: usize = 5;

/// One slot in the compact pager: a page number or a collapsed gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u64(*n as u64),
            PageMarker::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Clamps a requested page into `[1, total_pages]`. With no pages at all the
/// current page is left untouched.
pub fn clamp_page(requested: i64, current: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        return current;
    }
    requested.clamp(1, total_pages as i64) as usize
}

/// The items of 1-based `page`. Out-of-range pages yield an empty slice.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Compact page sequence: first, a window of up to three pages around
/// `current`, last, with one ellipsis per gap (e.g. `1 … 4 5 6 … 10`).
pub fn page_markers(current: usize, total_pages: usize) -> Vec<PageMarker> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let current = current.clamp(1, total_pages);
    let last = total_pages;

    let mut start = current.saturating_sub(1).max(2);
    let mut end = (current + 1).min(last - 1);
    if current <= 3 {
        end = (last - 1).min(4);
    }
    if current >= last - 2 {
        start = (last - 3).max(2);
    }

    let mut markers = vec![PageMarker::Page(1)];
    if start > 2 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.extend((start..=end).map(PageMarker::Page));
    if end < last - 1 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Page(last));
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageMarker::{Ellipsis, Page};

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(105, 32), 4);
        assert_eq!(total_pages(96, 32), 3);
        assert_eq!(total_pages(0, 32), 0);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn test_clamp_page_bounds() {
        assert_eq!(clamp_page(0, 2, 4), 1);
        assert_eq!(clamp_page(-3, 2, 4), 1);
        assert_eq!(clamp_page(99, 2, 4), 4);
        assert_eq!(clamp_page(3, 2, 4), 3);
    }

    #[test]
    fn test_clamp_page_without_pages_keeps_current() {
        assert_eq!(clamp_page(5, 3, 0), 3);
    }

    #[test]
    fn test_page_slice() {
        let items: Vec<usize> = (0..105).collect();
        assert_eq!(page_slice(&items, 1, 32).len(), 32);
        assert_eq!(page_slice(&items, 4, 32), &items[96..105]);
        assert!(page_slice(&items, 5, 32).is_empty());
        assert_eq!(page_slice(&items, 0, 32).len(), 32);
    }

    #[test]
    fn test_markers_small_total_lists_all() {
        assert_eq!(page_markers(2, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_markers(1, 5).len(), 5);
        assert!(page_markers(1, 0).is_empty());
    }

    #[test]
    fn test_markers_near_start() {
        assert_eq!(
            page_markers(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_markers_in_middle() {
        assert_eq!(
            page_markers(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_markers_near_end() {
        assert_eq!(
            page_markers(10, 10),
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_markers_never_duplicate_or_leave_range() {
        for total in 1..=40 {
            for current in 0..=total + 2 {
                let pages: Vec<usize> = page_markers(current, total)
                    .into_iter()
                    .filter_map(|m| match m {
                        Page(n) => Some(n),
                        Ellipsis => None,
                    })
                    .collect();
                let mut sorted = pages.clone();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(pages, sorted, "duplicates or disorder for {current}/{total}");
                assert!(pages.iter().all(|p| (1..=total).contains(p)));
                assert_eq!(pages.first(), Some(&1));
                assert_eq!(pages.last(), Some(&total));
            }
        }
    }

    #[test]
    fn test_marker_serialization() {
        let json = serde_json::to_string(&page_markers(5, 10)).unwrap();
        assert_eq!(json, r#"[1,"...",4,5,6,"...",10]"#);
    }
}

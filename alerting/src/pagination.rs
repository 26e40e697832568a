use preorder_core::ItemDetails;

/// Split an ordered deadline group into contiguous pages of at most
/// `page_size` items. Only the last page may be short; empty input yields
/// zero pages, which callers must treat as "nothing to send".
pub fn paginate(items: &[ItemDetails], page_size: usize) -> Vec<&[ItemDetails]> {
    debug_assert!(page_size > 0, "page_size must be positive");
    if items.is_empty() {
        return Vec::new();
    }
    items.chunks(page_size).collect()
}

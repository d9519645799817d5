/// True when `text` has something other than whitespace.
pub fn has_text(text: &str) -> bool {
    !text.trim().is_empty()
}

pub fn has_items<T>(items: &[T]) -> bool {
    !items.is_empty()
}

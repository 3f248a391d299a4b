/// Number of bytes `text` occupies when encoded as UTF-8.
pub fn byte_size(text: &str) -> usize {
    text.len()
}

pub const DEFAULT_CHUNK_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Split `text` into `count` contiguous pieces of `floor(len / count)` chars;
/// the last piece takes whatever remains. A `count` of zero is treated as one.
pub fn split_into_chunks(text: &str, count: usize) -> Vec<Chunk<'_>> {
    let count = count.max(1);

    // Byte offset of every char boundary, including the end of the text.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = offsets.len() - 1;
    let part = char_len / count;

    (0..count)
        .map(|index| {
            let start = offsets[index * part];
            let end = if index + 1 == count {
                text.len()
            } else {
                offsets[(index + 1) * part]
            };
            Chunk {
                index,
                text: &text[start..end],
            }
        })
        .collect()
}

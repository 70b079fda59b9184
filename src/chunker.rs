//! Fixed-size overlapping text windows for downstream embedding.
//!
//! Splits extracted text into `max_chars`-character windows whose start
//! offset advances by `max_chars - overlap` each step, so consecutive chunks
//! share `overlap` characters of context. Pure and deterministic; the caller
//! drives chunking, the crawl engine never does.

/// Default window size in characters.
pub const DEFAULT_MAX_CHARS: usize = 1000;
/// Default overlap between consecutive windows, in characters.
pub const DEFAULT_OVERLAP: usize = 100;

/// Lazily produce overlapping chunks of `text`.
///
/// Offsets are counted in characters, never bytes, so multi-byte UTF-8 input
/// is always sliced on character boundaries. Each yielded chunk is trimmed;
/// chunks that are empty after trimming are dropped, so whitespace-only input
/// yields an empty sequence. The iterator is `Clone` and can be restarted
/// from a fresh [`chunk_text`] call at any time.
#[must_use]
pub fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Chunks<'_> {
    Chunks {
        text,
        start: 0,
        max_chars,
        // Clamp to 1 so a degenerate overlap can never stall the iterator.
        step: max_chars.saturating_sub(overlap).max(1),
        done: max_chars == 0,
    }
}

/// Iterator over overlapping, trimmed substrings of the source text.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    /// Byte offset of the current window start; always a char boundary.
    start: usize,
    max_chars: usize,
    step: usize,
    done: bool,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if self.done || self.start >= self.text.len() {
                return None;
            }

            let rest = &self.text[self.start..];
            let end = rest
                .char_indices()
                .nth(self.max_chars)
                .map_or(self.text.len(), |(i, _)| self.start + i);
            let chunk = self.text[self.start..end].trim();

            match rest.char_indices().nth(self.step) {
                Some((i, _)) => self.start += i,
                None => self.done = true,
            }

            if !chunk.is_empty() {
                return Some(chunk);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(chunk_text("", 1000, 100).count(), 0);
    }

    #[test]
    fn whitespace_only_input_yields_nothing() {
        assert_eq!(chunk_text(" \n\t  ", 1000, 100).count(), 0);
    }

    #[test]
    fn short_text_is_a_single_trimmed_chunk() {
        let chunks: Vec<_> = chunk_text("  hello world  ", 1000, 100).collect();
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn consecutive_chunks_share_overlap() {
        // 2500 non-space chars so trimming cannot disturb the boundaries.
        let text: String = (0..2500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks: Vec<_> = chunk_text(&text, 1000, 100).collect();
        assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            let tail = &pair[0][pair[0].len() - 100..];
            let head = &pair[1][..100];
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn every_character_appears_in_some_chunk() {
        let text: String = (0..2345).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks: Vec<_> = chunk_text(&text, 1000, 100).collect();

        // Non-space input means no trimming: chunk i must be exactly the
        // window [i*900, i*900+1000), which tiles the whole text.
        let mut expected = Vec::new();
        let mut start = 0;
        while start < text.len() {
            let end = (start + 1000).min(text.len());
            expected.push(&text[start..end]);
            start += 900;
        }
        assert_eq!(chunks, expected);
    }

    #[test]
    fn window_length_is_counted_in_chars_not_bytes() {
        let text: String = "é".repeat(1500);
        let chunks: Vec<_> = chunk_text(&text, 1000, 100).collect();
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn iterator_is_restartable() {
        let text = "abc def ghi".repeat(200);
        let first: Vec<_> = chunk_text(&text, 100, 10).collect();
        let second: Vec<_> = chunk_text(&text, 100, 10).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_max_chars_yields_nothing() {
        assert_eq!(chunk_text("hello", 0, 0).count(), 0);
    }
}

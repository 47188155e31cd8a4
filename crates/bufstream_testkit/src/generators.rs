//! Property-based test generators using proptest.
//!
//! Provides strategies for payloads, the ways a payload can be split across
//! calls, and buffer sizes worth testing (including unbuffered).

use proptest::prelude::*;

/// Strategy for arbitrary payloads up to `max_len` bytes.
pub fn payload_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Strategy for buffer sizes: unbuffered, tiny, odd, and the default.
pub fn buffer_size_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0usize),
        1usize..=16,
        17usize..=300,
        Just(8192usize),
    ]
}

/// Splits `total` bytes into consecutive chunk lengths.
///
/// `cuts` are raw cut points; they are reduced modulo `total + 1`, sorted,
/// and turned into lengths that sum to `total`. Empty chunks are kept since
/// zero-length calls are a legitimate edge case.
pub fn chunk_lengths(total: usize, cuts: &[usize]) -> Vec<usize> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (total + 1)).collect();
    points.sort_unstable();

    let mut lengths = Vec::with_capacity(points.len() + 1);
    let mut last = 0;
    for point in points {
        lengths.push(point - last);
        last = point;
    }
    lengths.push(total - last);
    lengths
}

/// Strategy for a payload together with a way of chunking it.
pub fn chunked_payload_strategy(max_len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    (
        payload_strategy(max_len),
        prop::collection::vec(any::<usize>(), 0..12),
    )
        .prop_map(|(payload, cuts)| {
            let lengths = chunk_lengths(payload.len(), &cuts);
            (payload, lengths)
        })
}

/// Splits `data` according to `lengths` (as produced by [`chunk_lengths`]).
pub fn split_chunks<'a>(data: &'a [u8], lengths: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for &len in lengths {
        chunks.push(&data[offset..offset + len]);
        offset += len;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_lengths_sum_to_total() {
        let lengths = chunk_lengths(10, &[3, 7, 25]);
        assert_eq!(lengths.iter().sum::<usize>(), 10);
        assert_eq!(lengths, vec![3, 0, 4, 3]);
    }

    #[test]
    fn chunk_lengths_of_empty_payload() {
        assert_eq!(chunk_lengths(0, &[5, 9]), vec![0, 0, 0]);
    }

    #[test]
    fn split_chunks_rebuilds_payload() {
        let data = b"hello world";
        let chunks = split_chunks(data, &[5, 1, 5]);
        assert_eq!(chunks, vec![&b"hello"[..], &b" "[..], &b"world"[..]]);
    }

    proptest! {
        #[test]
        fn chunked_payload_concatenates_back((payload, lengths) in chunked_payload_strategy(256)) {
            let joined: Vec<u8> = split_chunks(&payload, &lengths).concat();
            prop_assert_eq!(joined, payload);
        }
    }
}

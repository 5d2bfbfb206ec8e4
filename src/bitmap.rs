/*!

Occupancy bitmap over a slice of machine words.

Bit `i` lives in word `i / WORD_BITS` at position `i % WORD_BITS`. Searches skip
whole zero words and use `trailing_zeros`/`leading_zeros` inside a word, so
walking over a run of holes costs one step per word, not per slot.

*/

pub(crate) type Word = u64;

pub(crate) const WORD_BITS: usize = Word::BITS as usize;

#[inline(always)]
pub(crate) fn words_for(bits: usize) -> usize {
    (bits + WORD_BITS - 1) / WORD_BITS
}

#[inline(always)]
pub(crate) fn get(words: &[Word], index: usize) -> bool {
    words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
}

#[inline(always)]
pub(crate) fn set(words: &mut [Word], index: usize, value: bool) {
    let word = &mut words[index / WORD_BITS];
    let mask: Word = 1 << (index % WORD_BITS);
    if value {
        *word |= mask;
    } else {
        *word &= !mask;
    }
}

/// Mask of bits `[from, to)` within one word, `to <= WORD_BITS`.
#[inline(always)]
fn span(from: usize, to: usize) -> Word {
    debug_assert!(from <= to && to <= WORD_BITS);
    if from == to {
        return 0;
    }
    (!0 >> (WORD_BITS - (to - from))) << from
}

pub(crate) fn set_range(words: &mut [Word], start: usize, end: usize, value: bool) {
    let mut index = start;
    while index < end {
        let offset = index % WORD_BITS;
        let to = (offset + (end - index)).min(WORD_BITS);
        let mask = span(offset, to);
        let word = &mut words[index / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        index += to - offset;
    }
}

/// First set bit in `[from, end)`.
pub(crate) fn next_true(words: &[Word], from: usize, end: usize) -> Option<usize> {
    next_matching(words, from, end, 0)
}

/// First clear bit in `[from, end)`.
pub(crate) fn next_false(words: &[Word], from: usize, end: usize) -> Option<usize> {
    next_matching(words, from, end, !0)
}

/// Last set bit in `[from, end)`.
pub(crate) fn prev_true(words: &[Word], from: usize, end: usize) -> Option<usize> {
    prev_matching(words, from, end, 0)
}

/// `flip` is xor-ed into every word, turning a search for clear bits into one for set bits.
fn next_matching(words: &[Word], from: usize, end: usize, flip: Word) -> Option<usize> {
    let mut index = from;
    while index < end {
        let word_index = index / WORD_BITS;
        let offset = index % WORD_BITS;
        let bits = (words[word_index] ^ flip) & (!0 << offset);
        if bits != 0 {
            let found = word_index * WORD_BITS + bits.trailing_zeros() as usize;
            return if found < end { Some(found) } else { None };
        }
        index = (word_index + 1) * WORD_BITS;
    }
    None
}

fn prev_matching(words: &[Word], from: usize, end: usize, flip: Word) -> Option<usize> {
    let mut end = end;
    while end > from {
        let last = end - 1;
        let word_index = last / WORD_BITS;
        let offset = last % WORD_BITS;
        let bits = (words[word_index] ^ flip) & (!0 >> (WORD_BITS - 1 - offset));
        if bits != 0 {
            let found = word_index * WORD_BITS + (WORD_BITS - 1 - bits.leading_zeros() as usize);
            return if found >= from { Some(found) } else { None };
        }
        end = word_index * WORD_BITS;
    }
    None
}

#[cfg(test)]
pub(crate) fn count_true(words: &[Word], end: usize) -> usize {
    let full = end / WORD_BITS;
    let mut count: usize = words[..full].iter().map(|w| w.count_ones() as usize).sum();
    let rest = end % WORD_BITS;
    if rest != 0 {
        count += (words[full] & span(0, rest)).count_ones() as usize;
    }
    count
}

/// Indices of set bits in `[front, back)`, from either end.
#[derive(Clone)]
pub(crate) struct TrueBitIter<'a> {
    words: &'a [Word],
    front: usize,
    back: usize,
}

impl<'a> TrueBitIter<'a> {
    pub fn new(words: &'a [Word], end: usize) -> TrueBitIter<'a> {
        debug_assert!(end <= words.len() * WORD_BITS);
        TrueBitIter { words, front: 0, back: end }
    }
}

impl<'a> Iterator for TrueBitIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let found = next_true(self.words, self.front, self.back)?;
        self.front = found + 1;
        Some(found)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back.saturating_sub(self.front)))
    }
}

impl<'a> DoubleEndedIterator for TrueBitIter<'a> {
    fn next_back(&mut self) -> Option<usize> {
        let found = prev_true(self.words, self.front, self.back)?;
        self.back = found;
        Some(found)
    }
}

#[cfg(test)]
mod bitmap_tests {
    use super::*;

    fn bitmap(bits: usize, set_bits: &[usize]) -> Vec<Word> {
        let mut words = vec![0; words_for(bits)];
        for index in set_bits {
            set(&mut words, *index, true);
        }
        words
    }

    #[test]
    fn word_count() {
        assert_eq!(0, words_for(0));
        assert_eq!(1, words_for(1));
        assert_eq!(1, words_for(64));
        assert_eq!(2, words_for(65));
    }

    #[test]
    fn get_and_set() {
        let mut words = bitmap(130, &[0, 63, 64, 129]);
        assert!(get(&words, 0) && get(&words, 63) && get(&words, 64) && get(&words, 129));
        assert!(!get(&words, 1) && !get(&words, 128));
        set(&mut words, 63, false);
        assert!(!get(&words, 63));
        assert_eq!(3, count_true(&words, 130));
        assert_eq!(2, count_true(&words, 129));
    }

    #[test]
    fn ranges_across_words() {
        let mut words = bitmap(200, &[]);
        set_range(&mut words, 60, 140, true);
        assert_eq!(80, count_true(&words, 200));
        assert!(!get(&words, 59) && get(&words, 60) && get(&words, 139) && !get(&words, 140));
        set_range(&mut words, 64, 128, false);
        assert_eq!(16, count_true(&words, 200));
        set_range(&mut words, 0, 0, true);
        assert_eq!(16, count_true(&words, 200));
    }

    #[test]
    fn searches() {
        let words = bitmap(300, &[3, 70, 200]);
        assert_eq!(Some(3), next_true(&words, 0, 300));
        assert_eq!(Some(70), next_true(&words, 4, 300));
        assert_eq!(None, next_true(&words, 71, 200));
        assert_eq!(Some(200), next_true(&words, 71, 201));
        assert_eq!(Some(200), prev_true(&words, 0, 300));
        assert_eq!(Some(70), prev_true(&words, 0, 200));
        assert_eq!(None, prev_true(&words, 4, 70));
        assert_eq!(Some(0), next_false(&words, 0, 300));
        assert_eq!(Some(4), next_false(&words, 3, 300));
        assert_eq!(None, next_false(&words, 3, 4));
    }

    #[test]
    fn iterates_both_ways() {
        let words = bitmap(256, &[1, 2, 65, 190, 255]);
        let forward: Vec<usize> = TrueBitIter::new(&words, 256).collect();
        assert_eq!(vec![1, 2, 65, 190, 255], forward);
        let backward: Vec<usize> = TrueBitIter::new(&words, 256).rev().collect();
        assert_eq!(vec![255, 190, 65, 2, 1], backward);
        let mut mixed = TrueBitIter::new(&words, 200);
        assert_eq!(Some(1), mixed.next());
        assert_eq!(Some(190), mixed.next_back());
        assert_eq!(Some(2), mixed.next());
        assert_eq!(Some(65), mixed.next_back());
        assert_eq!(None, mixed.next());
        assert_eq!(None, mixed.next_back());
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_bool_vector(bits in proptest::collection::vec(any::<bool>(), 0..300)) {
                let mut words: Vec<Word> = vec![0; words_for(bits.len())];
                for (index, bit) in bits.iter().enumerate() {
                    set(&mut words, index, *bit);
                }
                let expected: Vec<usize> = (0..bits.len()).filter(|i| bits[*i]).collect();
                let forward: Vec<usize> = TrueBitIter::new(&words, bits.len()).collect();
                prop_assert_eq!(&expected, &forward);
                let mut backward: Vec<usize> = TrueBitIter::new(&words, bits.len()).rev().collect();
                backward.reverse();
                prop_assert_eq!(&expected, &backward);
                prop_assert_eq!(expected.len(), count_true(&words, bits.len()));
            }
        }
    }
}

/// Fixed-capacity bitset over `0..len`, used for type ancestry and visit tracking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSet {
	words: Vec<u64>,
	len: usize,
}

impl BitSet {
	/// Create an empty set able to hold members `0..len`.
	pub fn new(len: usize) -> Self {
		Self {
			words: vec![0; len.div_ceil(64)],
			len,
		}
	}

	/// Capacity of the set.
	pub fn capacity(&self) -> usize {
		self.len
	}

	/// Insert `idx`, returning `true` when it was not already present.
	///
	/// Members past the capacity are ignored and report `false`.
	pub fn insert(&mut self, idx: usize) -> bool {
		if idx >= self.len {
			return false;
		}
		let (word, bit) = (idx / 64, 1_u64 << (idx % 64));
		let fresh = self.words[word] & bit == 0;
		self.words[word] |= bit;
		fresh
	}

	/// Whether `idx` is a member.
	pub fn contains(&self, idx: usize) -> bool {
		idx < self.len && self.words[idx / 64] & (1_u64 << (idx % 64)) != 0
	}

	/// Add every member of `other`.
	pub fn union_with(&mut self, other: &BitSet) {
		for (dst, src) in self.words.iter_mut().zip(&other.words) {
			*dst |= *src;
		}
	}

	/// Whether the two sets share any member.
	pub fn intersects(&self, other: &BitSet) -> bool {
		self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
	}

	/// Number of members.
	pub fn count(&self) -> usize {
		self.words.iter().map(|word| word.count_ones() as usize).sum()
	}

	/// Whether no member is set.
	pub fn is_empty(&self) -> bool {
		self.words.iter().all(|word| *word == 0)
	}

	/// Iterate members in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
		(0..self.len).filter(|idx| self.contains(*idx))
	}
}

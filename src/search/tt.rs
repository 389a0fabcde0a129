#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    pub gen: u32,
}

const DEFAULT_WAYS: usize = 4;
pub const DEFAULT_ENTRIES: usize = 1 << 16;

#[derive(Default, Clone, Copy)]
struct Bucket {
    slots: [Option<Entry>; DEFAULT_WAYS],
}

/// Fixed-capacity transposition table of 4-way buckets. Bucket index is
/// `key mod bucket_count`; the full key is kept per entry and must match on
/// probe.
#[derive(Default)]
pub struct Tt {
    buckets: Vec<Bucket>,
    gen: u32,
}

impl Tt {
    pub fn new() -> Self { Self { buckets: Vec::new(), gen: 0 } }

    pub fn with_capacity_entries(cap: usize) -> Self {
        let mut tt = Self::new();
        tt.set_capacity_entries(cap);
        tt
    }

    fn ensure_init(&mut self) {
        if self.buckets.is_empty() {
            self.set_capacity_entries(DEFAULT_ENTRIES);
        }
    }

    pub fn clear(&mut self) {
        self.ensure_init();
        for b in &mut self.buckets { *b = Bucket::default(); }
        self.gen = 0;
    }

    fn bucket_index(&self, key: u64) -> usize {
        (key % self.buckets.len().max(1) as u64) as usize
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        if self.buckets.is_empty() { return None; }
        let idx = self.bucket_index(key);
        self.buckets[idx].slots.iter().flatten().find(|e| e.key == key).copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.iter().filter(|s| s.is_some()).count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.buckets.len() * DEFAULT_WAYS }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = (entries + DEFAULT_WAYS - 1) / DEFAULT_WAYS;
        self.buckets.clear();
        self.buckets.resize(buckets, Bucket::default());
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        let entries = (mb.saturating_mul(1024 * 1024) / std::mem::size_of::<Option<Entry>>()).max(DEFAULT_WAYS);
        self.set_capacity_entries(entries);
    }

    /// Depth-preferred insert: a same-key entry is replaced only by an equal
    /// or deeper one; otherwise fill an empty way or evict the shallowest,
    /// oldest way.
    pub fn put(&mut self, e: Entry) {
        self.ensure_init();
        let idx = self.bucket_index(e.key);
        let e = Entry { gen: self.gen, ..e };
        let bucket = &mut self.buckets[idx];
        if let Some(slot) = bucket.slots.iter_mut().find(|s| matches!(s, Some(cur) if cur.key == e.key)) {
            if slot.map_or(true, |cur| e.depth >= cur.depth) { *slot = Some(e); }
            return;
        }
        if let Some(slot) = bucket.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(e);
            return;
        }
        // lexicographic: lowest depth first, then oldest generation
        let victim = bucket.slots.iter().enumerate()
            .filter_map(|(i, s)| s.map(|cur| (i, (cur.depth, cur.gen))))
            .min_by_key(|&(_, k)| k)
            .map(|(i, _)| i)
            .unwrap_or(0);
        bucket.slots[victim] = Some(e);
    }

    pub fn bump_generation(&mut self) { self.gen = self.gen.wrapping_add(1); }

    pub fn generation(&self) -> u32 { self.gen }
}

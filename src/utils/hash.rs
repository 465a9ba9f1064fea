use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hasher};
use std::ops::BitXor;

/// A `HashMap` using a fast, non-cryptographic hasher. Keys in this crate are small
/// (enums, ids and short source identifiers), so collision attacks are not a concern.
pub type FastHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A `HashSet` using a fast, non-cryptographic hasher.
pub type FastHashSet<K> = HashSet<K, BuildHasherDefault<FxHasher>>;

const SEED: u64 = 0x51_7c_c1_b7_27_22_0a_95;

/// The hasher used by rustc and Firefox.
#[derive(Debug, Default, Clone, Copy)]
pub struct FxHasher {
    hash: u64,
}

impl FxHasher {
    #[inline]
    fn add_to_hash(&mut self, i: u64) {
        self.hash = self.hash.rotate_left(5).bitxor(i).wrapping_mul(SEED);
    }
}

impl Hasher for FxHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(8);
        for chunk in &mut chunks {
            let mut buf = [0; 8];
            buf.copy_from_slice(chunk);
            self.add_to_hash(u64::from_le_bytes(buf));
        }

        for &v in chunks.remainder() {
            self.add_to_hash(u64::from(v));
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.add_to_hash(u64::from(i));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.add_to_hash(u64::from(i));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.add_to_hash(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.add_to_hash(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn collections() {
        let mut map = FastHashMap::default();
        map.insert("a.png".to_owned(), 0);
        map.insert("b.png".to_owned(), 1);
        map.insert("a.png".to_owned(), 2);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a.png"), Some(&2));

        let mut set = FastHashSet::default();
        set.insert(3u32);
        set.insert(3u32);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn distinct() {
        let hash = |v: &[u8]| {
            let mut h = FxHasher::default();
            h.write(v);
            h.finish()
        };

        assert_eq!(hash(b"textures/a.png"), hash(b"textures/a.png"));
        assert_ne!(hash(b"textures/a.png"), hash(b"textures/b.png"));
    }
}

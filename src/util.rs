use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;

use fnv::FnvHasher;

pub type FnvHashMap<K, T> = HashMap<K, T, BuildHasherDefault<FnvHasher>>;
pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;

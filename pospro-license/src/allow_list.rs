//! The compiled-in set of accepted key hashes.

use crate::key::{KeyHash, LicenseKey};
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

/// Hashes of every key sold. Changing this list means shipping a new build.
const VALID_KEY_HASHES: [i32; 35] = [
    1465839238, -1316686012, 1944256136, 178203588, -2012624447, -203417734, -1899147192,
    1455325833, 1081555559, -1297924747, 102573216, -1149867517, -199926861, 715507845,
    -1335914105, 1904797046, -188377741, -126306515, 1851996519, -1859368557, -1889895077,
    -921287995, 1853664770, -1838965945, -738980347, 856403063, 1904944513, -1116246011,
    -79277685, -1777271816, 513360451, 1978249826, 114639917, -174549114, 1500021667,
];

static BUILTIN: LazyLock<Arc<AllowList>> =
    LazyLock::new(|| Arc::new(AllowList::from_hashes(VALID_KEY_HASHES.map(KeyHash::from_raw))));

/// An immutable set of accepted key hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    hashes: HashSet<KeyHash>,
}

impl AllowList {
    /// Returns the allow-list embedded in this build.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Builds an allow-list from explicit hashes.
    pub fn from_hashes(hashes: impl IntoIterator<Item = KeyHash>) -> Self {
        Self {
            hashes: hashes.into_iter().collect(),
        }
    }

    /// Returns true if the hash is on the list.
    #[must_use]
    pub fn contains(&self, hash: KeyHash) -> bool {
        self.hashes.contains(&hash)
    }

    /// Returns true if the key may be activated: either the trial key or a
    /// key whose hash is on the list.
    ///
    /// The trial key is admitted on its text alone, so admitting a key does
    /// not imply [`contains`](Self::contains) holds for its hash.
    #[must_use]
    pub fn admits(&self, key: &LicenseKey) -> bool {
        key.is_demo() || self.contains(key.hash())
    }

    /// Number of hashes on the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

//! Asset cache
//!
//! A type-erased cache for anything implementing [`Asset`]. Loading the same
//! path twice returns the same handle without touching the file again, and
//! asset data is shared out as `Arc`s.
//!
//! ```ignore
//! let mut cache = AssetCache::new();
//! let handle = cache.load::<TextureAsset>("static/textures/earth/day.jpg")?;
//! let day: Arc<TextureAsset> = cache.get(&handle).unwrap();
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset_error::AssetError;

/// Unique identifier for an asset in the cache. Zero is never assigned.
pub type AssetId = u64;

/// A lightweight handle to a cached asset
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// The file path this asset was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Types that can be loaded from files and cached
pub trait Asset: Sized + Send + Sync + 'static {
    /// Load this asset from the given file path
    fn load_from_file(path: &Path) -> Result<Self, AssetError>;
}

/// A type-erased asset cache deduplicated by path
pub struct AssetCache {
    assets: HashMap<AssetId, Arc<dyn Any + Send + Sync>>,
    path_index: HashMap<PathBuf, AssetId>,
    next_id: u64,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            path_index: HashMap::new(),
            next_id: 1, // 0 is reserved as "no asset"
        }
    }

    /// Load an asset, or return the cached handle if the path was loaded before
    pub fn load<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref().to_path_buf();

        if let Some(&id) = self.path_index.get(&path) {
            return Ok(AssetHandle { id, path });
        }

        let data = T::load_from_file(&path)?;
        Ok(self.insert(path, data))
    }

    /// Load an asset and return its data directly
    pub fn load_shared<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<Arc<T>, AssetError> {
        let handle = self.load::<T>(path)?;
        self.get::<T>(&handle).ok_or_else(|| {
            AssetError::NotFound(format!(
                "{} (cached with a different type)",
                handle.path().display()
            ))
        })
    }

    /// Store an already-built asset under `path`, replacing any previous entry
    pub fn insert<T: Asset>(&mut self, path: impl Into<PathBuf>, data: T) -> AssetHandle {
        let path = path.into();
        if let Some(old) = self.path_index.remove(&path) {
            self.assets.remove(&old);
        }

        let id = self.next_id;
        self.next_id += 1;

        self.assets.insert(id, Arc::new(data));
        self.path_index.insert(path.clone(), id);
        AssetHandle { id, path }
    }

    /// Retrieve a cached asset by its handle
    ///
    /// Returns `None` if the asset was removed or was stored as another type.
    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        let data = self.assets.get(&handle.id)?;
        data.clone().downcast::<T>().ok()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.path_index.contains_key(path.as_ref())
    }

    /// Remove an asset; outstanding `Arc`s stay valid
    pub fn remove(&mut self, handle: &AssetHandle) -> bool {
        if self.assets.remove(&handle.id).is_some() {
            self.path_index.remove(&handle.path);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn clear(&mut self) {
        self.assets.clear();
        self.path_index.clear();
    }
}

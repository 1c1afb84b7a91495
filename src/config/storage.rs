use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::{event::Event, question::Question, vote::Vote},
};

/// Flat JSON files backing the API, one array document per resource.
pub struct Storage {
    pub events: JsonCollection<Event>,
    pub questions: JsonCollection<Question>,
    pub votes: JsonCollection<Vote>,
}

pub async fn init_storage(data_dir: impl AsRef<Path>) -> Result<Arc<Storage>, AppError> {
    let data_dir = data_dir.as_ref();
    fs::create_dir_all(data_dir).await?;

    let storage = Storage {
        events: JsonCollection::open(data_dir.join("events.json")).await?,
        questions: JsonCollection::open(data_dir.join("questions.json")).await?,
        votes: JsonCollection::open(data_dir.join("votes.json")).await?,
    };

    info!("Storage ready at {}", data_dir.display());
    Ok(Arc::new(storage))
}

/// A JSON array on disk. The file is re-read on every access so seed edits
/// made while the server runs are picked up; the lock serialises writers.
pub struct JsonCollection<T> {
    path: PathBuf,
    lock: RwLock<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn open(path: PathBuf) -> Result<Self, AppError> {
        if fs::try_exists(&path).await? {
            debug!("Using existing {}", path.display());
        } else {
            info!("Creating empty {}", path.display());
            fs::write(&path, b"[]").await?;
        }

        Ok(Self {
            path,
            lock: RwLock::new(()),
            _marker: PhantomData,
        })
    }

    pub async fn read_all(&self) -> Result<Vec<T>, AppError> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    /// Runs `apply` against the current contents and persists the result.
    pub async fn update<R>(&self, apply: impl FnOnce(&mut Vec<T>) -> R) -> Result<R, AppError> {
        let _guard = self.lock.write().await;
        let mut items = self.load().await?;
        let result = apply(&mut items);
        self.persist(&items).await?;
        Ok(result)
    }

    async fn load(&self) -> Result<Vec<T>, AppError> {
        let raw = fs::read(&self.path).await?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn persist(&self, items: &[T]) -> Result<(), AppError> {
        let body = serde_json::to_vec_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

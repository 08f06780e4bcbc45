//! In-memory task and timetable stores, optionally backed by local JSON files
//!
//! They implement [`TaskSource`] and [`ClassSource`], and can be used as stand-ins for the cloud database adapters.

use std::path::{Path, PathBuf};
use std::error::Error;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use tokio::sync::watch;

use crate::traits::{ClassSource, TaskSource};
use crate::event::EventId;
use crate::task::TaskRecord;
use crate::class::ClassRecord;
use crate::mock_behaviour::MockBehaviour;


/// A task source that keeps its tasks in memory, and can store them in a local file
#[derive(Debug)]
pub struct TaskStore {
    backing_file: PathBuf,
    data: Mutex<StoredTasks>,
    sender: watch::Sender<Vec<TaskRecord>>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct StoredTasks {
    tasks: HashMap<EventId, TaskRecord>,
}

impl StoredTasks {
    fn snapshot(&self) -> Vec<TaskRecord> {
        let mut tasks: Vec<TaskRecord> = self.tasks.values().cloned().collect();
        tasks.sort_by(|l, r| l.id().cmp(r.id()));
        tasks
    }
}

impl TaskStore {
    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data: StoredTasks = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(std::io::BufReader::new(file))?,
        };
        log::debug!("Loaded {} tasks from {:?}", data.tasks.len(), path);

        Ok(Self::with_data(path, data))
    }

    /// Load the backing file, or start an empty store in case there is no such file yet.
    ///
    /// A file that exists but cannot be read is an error: it must not be overwritten by an empty store.
    pub fn open_or_create(path: &Path) -> Result<Self, Box<dyn Error>> {
        if path.exists() {
            Self::from_file(path)
        } else {
            log::info!("No task file at {:?} yet, starting with an empty store", path);
            Ok(Self::new(path))
        }
    }

    /// Initialize an empty store
    pub fn new(path: &Path) -> Self {
        Self::with_data(path, StoredTasks::default())
    }

    fn with_data(path: &Path, data: StoredTasks) -> Self {
        let (sender, _) = watch::channel(data.snapshot());
        Self {
            backing_file: PathBuf::from(path),
            data: Mutex::new(data),
            sender,
            mock_behaviour: None,
        }
    }

    /// Make this store fail some of its operations, as described by `mock_behaviour`
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// Store the current tasks to the backing file
    pub fn save_to_file(&self) -> Result<(), Box<dyn Error>> {
        let path = &self.backing_file;
        let file = match std::fs::File::create(path) {
            Err(err) => {
                return Err(format!("Unable to save file {:?}: {}", path, err).into());
            },
            Ok(f) => f,
        };

        serde_json::to_writer(file, &*self.lock())?;
        Ok(())
    }

    /// Compares two stores to check they have the same current content
    pub fn has_same_contents_than(&self, other: &Self) -> bool {
        let left = self.lock();
        let right = other.lock();
        *left == *right
    }

    fn lock(&self) -> MutexGuard<'_, StoredTasks> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_mock<F>(&self, check: F) -> Result<(), Box<dyn Error>>
    where
        F: FnOnce(&mut MockBehaviour) -> Result<(), Box<dyn Error>>,
    {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => {
                let mut behaviour = behaviour.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                check(&mut behaviour)
            }
        }
    }

    fn publish(&self, data: &StoredTasks) {
        self.sender.send_replace(data.snapshot());
    }
}

#[async_trait]
impl TaskSource for TaskStore {
    fn subscribe(&self) -> watch::Receiver<Vec<TaskRecord>> {
        self.sender.subscribe()
    }

    async fn save(&self, task: TaskRecord) -> Result<(), Box<dyn Error>> {
        self.check_mock(MockBehaviour::can_save)?;

        let mut data = self.lock();
        log::trace!("Saving task {} ({})", task.id(), task.title());
        data.tasks.insert(task.id().clone(), task);
        self.publish(&data);
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<bool, Box<dyn Error>> {
        self.check_mock(MockBehaviour::can_delete)?;

        let mut data = self.lock();
        if data.tasks.remove(id).is_none() {
            log::debug!("No task {} to delete", id);
            return Ok(false);
        }
        self.publish(&data);
        Ok(true)
    }

    async fn get_by_id(&self, id: &EventId) -> Result<Option<TaskRecord>, Box<dyn Error>> {
        self.check_mock(MockBehaviour::can_get_by_id)?;
        Ok(self.lock().tasks.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<TaskRecord>, Box<dyn Error>> {
        self.check_mock(MockBehaviour::can_get_all)?;
        Ok(self.lock().snapshot())
    }
}



/// The classes that take place today
#[derive(Debug)]
pub struct Timetable {
    sender: watch::Sender<Vec<ClassRecord>>,
}

impl Timetable {
    pub fn new(classes: Vec<ClassRecord>) -> Self {
        let (sender, _) = watch::channel(classes);
        Self { sender }
    }

    /// Load today's classes from a JSON file containing a list of classes
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let classes: Vec<ClassRecord> = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(std::io::BufReader::new(file))?,
        };
        Ok(Self::new(classes))
    }

    /// Replace today's classes
    pub fn set_classes(&self, classes: Vec<ClassRecord>) {
        self.sender.send_replace(classes);
    }

    pub fn add_class(&self, class: ClassRecord) {
        self.sender.send_modify(|classes| classes.push(class));
    }

    pub fn classes(&self) -> Vec<ClassRecord> {
        self.sender.borrow().clone()
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ClassSource for Timetable {
    fn subscribe(&self) -> watch::Receiver<Vec<ClassRecord>> {
        self.sender.subscribe()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use crate::task::TaskCategory;

    #[tokio::test]
    async fn serde_store() {
        let path = std::env::temp_dir().join("edumon_planner_serde_store.json");

        let store = TaskStore::new(&path);
        let date = NaiveDate::from_ymd_opt(2025, 3, 6).unwrap();
        store.save(TaskRecord::new("Weekly sheet 3".to_string(), date, TaskCategory::Study)).await.unwrap();
        store.save(TaskRecord::new("Gym".to_string(), date, TaskCategory::Personal)).await.unwrap();

        store.save_to_file().unwrap();

        let retrieved_store = TaskStore::from_file(&path).unwrap();
        assert!(store.has_same_contents_than(&retrieved_store));
        assert_eq!(retrieved_store.get_all().await.unwrap().len(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn invalid_files_are_not_replaced() {
        let path = std::env::temp_dir().join("edumon_planner_invalid_store.json");
        let _ = std::fs::remove_file(&path);

        let store = TaskStore::open_or_create(&path).unwrap();
        assert!(store.lock().tasks.is_empty());

        std::fs::write(&path, "{ \"tasks\": [ not json").unwrap();
        assert!(TaskStore::open_or_create(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ \"tasks\": [ not json");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn mutations_are_published() {
        let store = TaskStore::new(Path::new("unused.json"));
        let mut receiver = store.subscribe();
        assert!(receiver.borrow_and_update().is_empty());

        let date = NaiveDate::from_ymd_opt(2025, 3, 6).unwrap();
        let task = TaskRecord::new("Read the paper".to_string(), date, TaskCategory::Study);
        let id = task.id().clone();
        store.save(task).await.unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().len(), 1);

        assert!(store.delete(&id).await.unwrap());
        assert!(store.delete(&id).await.unwrap() == false);
        assert!(receiver.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn mocked_failures() {
        let mut store = TaskStore::new(Path::new("unused.json"));
        store.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::fail_now(1)))));

        let date = NaiveDate::from_ymd_opt(2025, 3, 6).unwrap();
        let task = TaskRecord::new("Read the paper".to_string(), date, TaskCategory::Study);
        assert!(store.save(task.clone()).await.is_err());
        assert!(store.save(task).await.is_ok());
    }
}

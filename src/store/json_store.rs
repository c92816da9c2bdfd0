use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::data_item::DataItem;
use crate::model::doc::Doc;
use crate::model::preference::UserPreference;
use crate::model::screen::Screen;
use crate::model::session::Session;
use crate::ops::quiz::{QuizOutcome, apply_answer};
use crate::store::{Store, StoreError};

const ITEMS_FILE: &str = "items.json";
const SCREENS_FILE: &str = "screens.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// Document store backed by one JSON file per collection.
///
/// Each file holds an id → document map. Writes go through a temp file in
/// the store directory and an atomic rename, so a failed write leaves the
/// previous contents intact.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<JsonStore, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(JsonStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_collection<T: DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<IndexMap<String, T>, StoreError> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(IndexMap::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| StoreError::ParseError { path, source: e })
    }

    fn write_collection<T: Serialize>(
        &self,
        file: &str,
        docs: &IndexMap<String, T>,
    ) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let text = serde_json::to_string_pretty(docs).map_err(|e| StoreError::ParseError {
            path: path.clone(),
            source: e,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.persist(&path).map_err(|e| StoreError::WriteError {
            path,
            source: e.error,
        })?;
        Ok(())
    }

    /// Mint a fresh document id: 20 alphanumeric characters, re-drawn on
    /// the (vanishingly unlikely) collision.
    fn new_id<T>(existing: &IndexMap<String, T>) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (&mut rng)
                .sample_iter(Alphanumeric)
                .take(20)
                .map(char::from)
                .collect();
            if !existing.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Keep the documents owned by one of the session's viewer emails, in
/// stored order.
fn owned_by<'a, T>(
    docs: &'a IndexMap<String, T>,
    session: &Session,
    owner: impl Fn(&T) -> Option<&str>,
) -> Vec<(&'a String, &'a T)> {
    let viewers = session.viewer_emails();
    docs.iter()
        .filter(|(_, doc)| owner(doc).is_some_and(|email| viewers.contains(&email)))
        .collect()
}

impl Store for JsonStore {
    fn fetch_data_items(&self, session: &Session) -> Result<Vec<Doc<DataItem>>, StoreError> {
        let docs: IndexMap<String, DataItem> = self.read_collection(ITEMS_FILE)?;
        Ok(owned_by(&docs, session, |item| Some(&item.owner_email))
            .into_iter()
            .map(|(id, item)| Doc::new(id.clone(), item.clone()))
            .collect())
    }

    fn fetch_screens(&self, session: &Session) -> Result<Vec<Doc<Screen>>, StoreError> {
        let docs: IndexMap<String, Screen> = self.read_collection(SCREENS_FILE)?;
        Ok(owned_by(&docs, session, |screen| {
            screen.owner_email.as_deref()
        })
        .into_iter()
        .map(|(id, screen)| Doc::new(id.clone(), screen.clone()))
        .collect())
    }

    fn add_data_item(&mut self, item: &DataItem) -> Result<String, StoreError> {
        let mut docs: IndexMap<String, DataItem> = self.read_collection(ITEMS_FILE)?;
        let id = Self::new_id(&docs);
        docs.insert(id.clone(), item.clone());
        self.write_collection(ITEMS_FILE, &docs)?;
        Ok(id)
    }

    fn update_data_item(&mut self, id: &str, item: &DataItem) -> Result<(), StoreError> {
        let mut docs: IndexMap<String, DataItem> = self.read_collection(ITEMS_FILE)?;
        if !docs.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        docs.insert(id.to_string(), item.clone());
        self.write_collection(ITEMS_FILE, &docs)
    }

    fn delete_data_item(&mut self, id: &str) -> Result<(), StoreError> {
        let mut docs: IndexMap<String, DataItem> = self.read_collection(ITEMS_FILE)?;
        if docs.shift_remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write_collection(ITEMS_FILE, &docs)
    }

    fn add_screen(&mut self, screen: &Screen) -> Result<String, StoreError> {
        let mut docs: IndexMap<String, Screen> = self.read_collection(SCREENS_FILE)?;
        let id = Self::new_id(&docs);
        docs.insert(id.clone(), screen.clone());
        self.write_collection(SCREENS_FILE, &docs)?;
        Ok(id)
    }

    fn update_screen(&mut self, id: &str, screen: &Screen) -> Result<(), StoreError> {
        let mut docs: IndexMap<String, Screen> = self.read_collection(SCREENS_FILE)?;
        if !docs.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        docs.insert(id.to_string(), screen.clone());
        self.write_collection(SCREENS_FILE, &docs)
    }

    fn delete_screen(&mut self, id: &str) -> Result<(), StoreError> {
        let mut docs: IndexMap<String, Screen> = self.read_collection(SCREENS_FILE)?;
        if docs.shift_remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write_collection(SCREENS_FILE, &docs)
    }

    fn fetch_preference(
        &self,
        session: &Session,
    ) -> Result<Option<Doc<UserPreference>>, StoreError> {
        let Some(user) = session.user_email.as_deref() else {
            return Ok(None);
        };
        let docs: IndexMap<String, UserPreference> = self.read_collection(PREFERENCES_FILE)?;
        Ok(docs
            .iter()
            .find(|(_, pref)| pref.owner_email == user)
            .map(|(id, pref)| Doc::new(id.clone(), pref.clone())))
    }

    fn save_preference(&mut self, pref: &UserPreference) -> Result<(), StoreError> {
        let mut docs: IndexMap<String, UserPreference> = self.read_collection(PREFERENCES_FILE)?;
        let existing = docs
            .iter()
            .find(|(_, p)| p.owner_email == pref.owner_email)
            .map(|(id, _)| id.clone());
        let id = existing.unwrap_or_else(|| Self::new_id(&docs));
        docs.insert(id, pref.clone());
        self.write_collection(PREFERENCES_FILE, &docs)
    }

    fn record_quiz_answer(&mut self, id: &str, outcome: QuizOutcome) -> Result<(), StoreError> {
        let mut docs: IndexMap<String, DataItem> = self.read_collection(ITEMS_FILE)?;
        let item = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_answer(item, outcome);
        self.write_collection(ITEMS_FILE, &docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::data_item::{ItemKind, Value};

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn item(owner: &str, tags: &[&str]) -> DataItem {
        DataItem::new(
            ItemKind::Text,
            Value::Text("note".into()),
            tags.iter().map(|t| t.to_string()).collect(),
            owner.into(),
        )
    }

    #[test]
    fn ids_are_unique_and_opaque() {
        let (_dir, mut store) = store();
        let a = store.add_data_item(&item("a@b.c", &[])).unwrap();
        let b = store.add_data_item(&item("a@b.c", &[])).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn fetch_is_scoped_to_viewer_emails() {
        let (_dir, mut store) = store();
        store.add_data_item(&item("a@b.c", &["mine"])).unwrap();
        store.add_data_item(&item("other@b.c", &["theirs"])).unwrap();

        let mine = store.fetch_data_items(&Session::signed_in("a@b.c")).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].data.tags, vec!["mine"]);

        // Nobody signed in → nothing visible
        let none = store.fetch_data_items(&Session::default()).unwrap();
        assert!(none.is_empty());

        // view-as widens the read scope
        let mut session = Session::signed_in("a@b.c");
        session.view_as = Some("other@b.c".into());
        assert_eq!(store.fetch_data_items(&session).unwrap().len(), 2);
    }

    #[test]
    fn update_and_delete_require_an_existing_id() {
        let (_dir, mut store) = store();
        let unchanged = item("a@b.c", &[]);
        assert!(matches!(
            store.update_data_item("missing", &unchanged),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_data_item("missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn record_quiz_answer_bumps_counters_in_place() {
        let (_dir, mut store) = store();
        let mut question = item("a@b.c", &["math"]);
        question.kind = ItemKind::Question;
        let id = store.add_data_item(&question).unwrap();

        store.record_quiz_answer(&id, QuizOutcome::Pass).unwrap();
        store.record_quiz_answer(&id, QuizOutcome::Fail).unwrap();
        store.record_quiz_answer(&id, QuizOutcome::Pass).unwrap();

        let items = store.fetch_data_items(&Session::signed_in("a@b.c")).unwrap();
        assert_eq!(items[0].data.quizz_ok, Some(2));
        assert_eq!(items[0].data.quizz_ko, Some(1));
    }

    #[test]
    fn preference_saves_one_document_per_owner() {
        use crate::model::preference::{ThemeMode, UserPreference};

        let (_dir, mut store) = store();
        let session = Session::signed_in("a@b.c");
        assert!(store.fetch_preference(&session).unwrap().is_none());

        store
            .save_preference(&UserPreference {
                owner_email: "a@b.c".into(),
                light_dark_mode: ThemeMode::Light,
            })
            .unwrap();
        store
            .save_preference(&UserPreference {
                owner_email: "a@b.c".into(),
                light_dark_mode: ThemeMode::Dark,
            })
            .unwrap();

        let pref = store.fetch_preference(&session).unwrap().unwrap();
        assert_eq!(pref.data.light_dark_mode, ThemeMode::Dark);
    }
}

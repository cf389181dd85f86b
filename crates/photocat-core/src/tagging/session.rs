//! The tagging session: walks the discovered photos one at a time, holds the
//! operator's pending tags, and commits them to the catalog on save.

use std::path::{Path, PathBuf};

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::error::{SessionError, SessionResult};
use crate::pipeline::{ImageProcessor, MaterializedPhoto};
use crate::types::LabelMode;

use super::keymap::CategoryMap;
use super::state::{NavOutcome, PendingTags, SessionPhase, SessionState, TagMutation};

/// Drives one operator session over a library root.
pub struct TaggingSession<S: CatalogStore> {
    processor: ImageProcessor,
    vocabulary: CategoryMap,
    mode: LabelMode,
    photos: Vec<PathBuf>,
    state: SessionState,
    current: Option<MaterializedPhoto>,
    store: S,
}

impl<S: CatalogStore> TaggingSession<S> {
    /// Discover photos under `root` and prepare a session at index 0.
    ///
    /// Nothing is decoded yet; call [`load_current`](Self::load_current) to
    /// materialize the first photo.
    pub fn start(config: &Config, root: &Path, store: S) -> SessionResult<Self> {
        let vocabulary = config.category_map()?;
        let processor = ImageProcessor::new(config);
        let photos = processor.discover(root)?;
        let mode = config.tagging.mode;

        tracing::info!(
            "Session started: {} photos under {:?} ({})",
            photos.len(),
            root,
            mode
        );

        Ok(Self {
            processor,
            vocabulary,
            mode,
            photos,
            state: SessionState::new(mode),
            current: None,
            store,
        })
    }

    /// Ordered photo list for this session.
    pub fn list_photos(&self) -> &[PathBuf] {
        &self.photos
    }

    /// The materialized photo, when viewing one.
    pub fn current(&self) -> Option<&MaterializedPhoto> {
        self.current.as_ref()
    }

    /// Path at the current index.
    pub fn current_path(&self) -> Option<&Path> {
        self.photos.get(self.state.index).map(PathBuf::as_path)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pending(&self) -> &PendingTags {
        &self.state.pending
    }

    pub fn vocabulary(&self) -> &CategoryMap {
        &self.vocabulary
    }

    pub fn mode(&self) -> LabelMode {
        self.mode
    }

    /// Whether the current photo has selections that a navigation would drop.
    pub fn has_unsaved_changes(&self) -> bool {
        self.state.phase == SessionPhase::Viewing && !self.state.pending.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Materialize the photo at the current index.
    ///
    /// Unreadable photos are recorded as degraded catalog entries and
    /// skipped, moving forward until a photo decodes or the list ends.
    pub fn load_current(&mut self) -> SessionResult<NavOutcome> {
        self.current = None;
        let mut skipped = 0;

        loop {
            let Some(path) = self.photos.get(self.state.index).cloned() else {
                self.transition(|s| s.in_phase(SessionPhase::Exhausted));
                return Ok(NavOutcome::Exhausted { skipped });
            };

            match self.processor.materialize(&path) {
                Ok(photo) => {
                    self.current = Some(photo);
                    self.transition(|s| s.in_phase(SessionPhase::Viewing));
                    return Ok(NavOutcome::Viewing {
                        index: self.state.index,
                        skipped,
                    });
                }
                Err(err) => {
                    tracing::warn!("Could not open {:?}: {}", path, err);
                    let record = self.processor.degraded_record(&path);
                    if let Err(e) = self.store.upsert(&record) {
                        self.transition(|s| s.in_phase(SessionPhase::Idle));
                        return Err(e.into());
                    }
                    skipped += 1;

                    match self.state.next_index(self.photos.len()) {
                        Some(next) => self.transition(|s| s.moved_to(next)),
                        None => {
                            self.transition(|s| s.in_phase(SessionPhase::Exhausted));
                            return Ok(NavOutcome::Exhausted { skipped });
                        }
                    }
                }
            }
        }
    }

    /// Apply one operator action to the pending tags.
    ///
    /// On error the pending tags are left as they were.
    pub fn apply(&mut self, mutation: TagMutation) -> SessionResult<&PendingTags> {
        self.ensure_viewing()?;
        let next = self
            .state
            .pending
            .clone()
            .apply(&mutation, &self.vocabulary)?;
        tracing::trace!("Applied {:?}", mutation);
        self.transition(|s| s.with_pending(next));
        Ok(&self.state.pending)
    }

    /// Apply the mutation bound to an operator keystroke.
    pub fn press(&mut self, key: char) -> SessionResult<&PendingTags> {
        let mutation = TagMutation::from_key(key, &self.vocabulary)
            .ok_or(SessionError::UnknownTrigger(key))?;
        self.apply(mutation)
    }

    pub fn toggle_category(&mut self, category: &str) -> SessionResult<&PendingTags> {
        self.apply(TagMutation::ToggleCategory(category.to_string()))
    }

    pub fn select_category(&mut self, category: &str) -> SessionResult<&PendingTags> {
        self.apply(TagMutation::SelectCategory(category.to_string()))
    }

    pub fn set_rating(&mut self, rating: u8) -> SessionResult<&PendingTags> {
        self.apply(TagMutation::SetRating(rating))
    }

    pub fn toggle_deletion_flag(&mut self) -> SessionResult<&PendingTags> {
        self.apply(TagMutation::ToggleDeletion)
    }

    pub fn toggle_do_not_delete(&mut self) -> SessionResult<&PendingTags> {
        self.apply(TagMutation::ToggleDoNotDelete)
    }

    /// Commit the current photo with its pending tags and advance.
    ///
    /// If the record cannot be built or written, the session stays on the
    /// current photo with pending tags intact so the save can be retried.
    /// Once the record is committed the save counts as done; a failure while
    /// loading the next photo is reported as [`NavOutcome::Stalled`].
    pub fn save(&mut self) -> SessionResult<NavOutcome> {
        self.ensure_viewing()?;
        let path = self
            .current_path()
            .map(Path::to_path_buf)
            .ok_or(SessionError::NoCurrentPhoto)?;

        self.transition(|s| s.in_phase(SessionPhase::Saving));
        let result = self
            .processor
            .build_record(&path, &self.state.pending)
            .map_err(SessionError::from)
            .and_then(|record| {
                self.store.upsert(&record)?;
                Ok(record)
            });

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Save failed for {:?}: {}", path, e);
                self.transition(|s| s.in_phase(SessionPhase::Viewing));
                return Err(e);
            }
        };

        tracing::info!(
            "Saved {} [{}] rating={}",
            record.filename,
            record.labels,
            record.rating
        );

        match self.state.next_index(self.photos.len()) {
            Some(next) => {
                self.transition(|s| s.moved_to(next));
                match self.load_current() {
                    Ok(outcome) => Ok(outcome),
                    Err(e) => {
                        tracing::error!("Saved, but could not advance past {:?}: {}", path, e);
                        Ok(NavOutcome::Stalled {
                            index: self.state.index,
                        })
                    }
                }
            }
            None => {
                self.current = None;
                let index = self.state.index;
                self.transition(|s| s.moved_to(index).in_phase(SessionPhase::Exhausted));
                Ok(NavOutcome::Exhausted { skipped: 0 })
            }
        }
    }

    /// Move forward one photo, discarding pending tags.
    ///
    /// At the last photo this is a no-op and pending tags are kept.
    pub fn navigate_next(&mut self) -> SessionResult<NavOutcome> {
        match self.state.next_index(self.photos.len()) {
            Some(next) => {
                self.log_discard();
                self.transition(|s| s.moved_to(next));
                self.load_current()
            }
            None => Ok(NavOutcome::Exhausted { skipped: 0 }),
        }
    }

    /// Move back one photo, discarding pending tags.
    ///
    /// At index 0 this is a no-op and pending tags are kept. An unreadable
    /// previous photo is recorded and skipped forward like any other.
    pub fn navigate_previous(&mut self) -> SessionResult<NavOutcome> {
        match self.state.previous_index() {
            Some(previous) => {
                self.log_discard();
                self.transition(|s| s.moved_to(previous));
                self.load_current()
            }
            None => Ok(NavOutcome::AtStart),
        }
    }

    fn log_discard(&self) {
        if self.has_unsaved_changes() {
            tracing::debug!(
                "Discarding pending tags for {:?}",
                self.current_path()
            );
        }
    }

    fn ensure_viewing(&self) -> SessionResult<()> {
        if self.state.phase == SessionPhase::Viewing && self.current.is_some() {
            Ok(())
        } else {
            Err(SessionError::NoCurrentPhoto)
        }
    }

    fn transition(&mut self, f: impl FnOnce(SessionState) -> SessionState) {
        let state = std::mem::replace(&mut self.state, SessionState::new(self.mode));
        self.state = f(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SqliteCatalog;
    use crate::error::{PipelineError, StoreError, StoreResult};
    use crate::tagging::Labels;
    use crate::types::{PhotoRecord, UNREADABLE_LABEL};
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str) {
        RgbImage::from_pixel(8, 6, Rgb([40, 80, 120]))
            .save(dir.join(name))
            .unwrap();
    }

    fn write_garbage(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), format!("not an image: {name}")).unwrap();
    }

    fn session(dir: &Path) -> TaggingSession<SqliteCatalog> {
        TaggingSession::start(
            &Config::default(),
            dir,
            SqliteCatalog::open_in_memory().unwrap(),
        )
        .unwrap()
    }

    /// Store whose writes can be switched off, either outright or after a
    /// number of successful writes.
    struct FlakyStore {
        inner: SqliteCatalog,
        failing: bool,
        writes_left: Option<usize>,
    }

    impl FlakyStore {
        fn new(failing: bool) -> Self {
            Self {
                inner: SqliteCatalog::open_in_memory().unwrap(),
                failing,
                writes_left: None,
            }
        }
    }

    impl CatalogStore for FlakyStore {
        fn upsert(&mut self, record: &PhotoRecord) -> StoreResult<()> {
            if let Some(left) = self.writes_left.as_mut() {
                if *left == 0 {
                    self.failing = true;
                } else {
                    *left -= 1;
                }
            }
            if self.failing {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk unplugged",
                )));
            }
            self.inner.upsert(record)
        }

        fn get(&self, fingerprint: &str) -> StoreResult<Option<PhotoRecord>> {
            self.inner.get(fingerprint)
        }

        fn list(&self) -> StoreResult<Vec<PhotoRecord>> {
            self.inner.list()
        }

        fn count(&self) -> StoreResult<usize> {
            self.inner.count()
        }
    }

    #[test]
    fn test_start_on_empty_root_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = TaggingSession::start(
            &Config::default(),
            tmp.path(),
            SqliteCatalog::open_in_memory().unwrap(),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            SessionError::Pipeline(PipelineError::DiscoveryEmpty { .. })
        ));
    }

    #[test]
    fn test_start_rejects_invalid_vocabulary() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        let mut config = Config::default();
        config.tagging.categories = vec![crate::config::CategoryBinding::new('d', "dogs")];

        let err = TaggingSession::start(&config, tmp.path(), SqliteCatalog::open_in_memory().unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_load_current_views_first_photo() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        write_png(tmp.path(), "b.png");
        let mut s = session(tmp.path());

        assert_eq!(s.state().phase, SessionPhase::Idle);
        let outcome = s.load_current().unwrap();
        assert_eq!(outcome, NavOutcome::Viewing { index: 0, skipped: 0 });
        assert_eq!(s.current().unwrap().filename, "a.png");
        assert_eq!(s.list_photos().len(), 2);
    }

    #[test]
    fn test_unreadable_photo_recorded_and_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_garbage(tmp.path(), "a.jpg");
        write_garbage(tmp.path(), "b.jpg");
        write_png(tmp.path(), "c.png");
        let mut s = session(tmp.path());

        let outcome = s.load_current().unwrap();
        assert_eq!(outcome, NavOutcome::Viewing { index: 2, skipped: 2 });
        assert_eq!(s.current().unwrap().filename, "c.png");

        let records = s.store().list().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.labels == UNREADABLE_LABEL));
    }

    #[test]
    fn test_unreadable_last_photo_exhausts() {
        let tmp = tempfile::tempdir().unwrap();
        write_garbage(tmp.path(), "only.png");
        let mut s = session(tmp.path());

        assert_eq!(s.load_current().unwrap(), NavOutcome::Exhausted { skipped: 1 });
        assert_eq!(s.state().phase, SessionPhase::Exhausted);
        assert!(s.current().is_none());
    }

    #[test]
    fn test_save_commits_and_advances() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        write_png(tmp.path(), "b.png");
        let mut s = session(tmp.path());
        s.load_current().unwrap();

        s.toggle_category("landscape").unwrap();
        s.toggle_category("family").unwrap();
        s.set_rating(4).unwrap();
        s.toggle_deletion_flag().unwrap();

        let outcome = s.save().unwrap();
        assert_eq!(outcome, NavOutcome::Viewing { index: 1, skipped: 0 });
        assert!(s.pending().is_empty());

        let records = s.store().list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "a.png");
        assert_eq!(records[0].labels, "family,landscape");
        assert_eq!(records[0].rating, 4);
        assert!(records[0].marked_for_deletion);
    }

    #[test]
    fn test_save_at_last_photo_exhausts() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        let mut s = session(tmp.path());
        s.load_current().unwrap();

        assert_eq!(s.save().unwrap(), NavOutcome::Exhausted { skipped: 0 });
        assert_eq!(s.state().phase, SessionPhase::Exhausted);
        assert!(s.current().is_none());
        assert_eq!(s.store().count().unwrap(), 1);

        assert!(matches!(s.save(), Err(SessionError::NoCurrentPhoto)));
        assert_eq!(s.navigate_next().unwrap(), NavOutcome::Exhausted { skipped: 0 });
    }

    #[test]
    fn test_navigation_discards_pending() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        write_png(tmp.path(), "b.png");
        let mut s = session(tmp.path());
        s.load_current().unwrap();

        s.toggle_category("water").unwrap();
        assert!(s.has_unsaved_changes());
        assert_eq!(
            s.navigate_next().unwrap(),
            NavOutcome::Viewing { index: 1, skipped: 0 }
        );
        assert!(s.pending().is_empty());

        s.set_rating(2).unwrap();
        assert_eq!(
            s.navigate_previous().unwrap(),
            NavOutcome::Viewing { index: 0, skipped: 0 }
        );
        assert!(s.pending().is_empty());
        assert_eq!(s.store().count().unwrap(), 0);
    }

    #[test]
    fn test_boundaries_keep_pending() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        let mut s = session(tmp.path());
        s.load_current().unwrap();
        s.toggle_category("trees").unwrap();

        assert_eq!(s.navigate_previous().unwrap(), NavOutcome::AtStart);
        assert_eq!(s.navigate_next().unwrap(), NavOutcome::Exhausted { skipped: 0 });
        assert!(s.pending().labels.contains("trees"));
        assert_eq!(s.state().phase, SessionPhase::Viewing);
    }

    #[test]
    fn test_previous_into_unreadable_bounces_forward() {
        let tmp = tempfile::tempdir().unwrap();
        write_garbage(tmp.path(), "a.jpg");
        write_png(tmp.path(), "b.png");
        let mut s = session(tmp.path());

        assert_eq!(s.load_current().unwrap(), NavOutcome::Viewing { index: 1, skipped: 1 });
        assert_eq!(
            s.navigate_previous().unwrap(),
            NavOutcome::Viewing { index: 1, skipped: 1 }
        );
        assert_eq!(s.store().count().unwrap(), 1);
    }

    #[test]
    fn test_persistence_failure_keeps_pending() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        write_png(tmp.path(), "b.png");
        let store = FlakyStore::new(false);
        let mut s = TaggingSession::start(&Config::default(), tmp.path(), store).unwrap();
        s.load_current().unwrap();
        s.toggle_category("people").unwrap();
        s.set_rating(3).unwrap();

        s.store.failing = true;
        let err = s.save().unwrap_err();
        assert!(matches!(err, SessionError::Persistence(_)));
        assert_eq!(s.state().phase, SessionPhase::Viewing);
        assert_eq!(s.state().index, 0);
        assert!(s.pending().labels.contains("people"));
        assert_eq!(s.pending().rating, 3);

        s.store.failing = false;
        assert_eq!(s.save().unwrap(), NavOutcome::Viewing { index: 1, skipped: 0 });
        assert_eq!(s.into_store().count().unwrap(), 1);
    }

    #[test]
    fn test_degraded_write_failure_surfaces() {
        let tmp = tempfile::tempdir().unwrap();
        write_garbage(tmp.path(), "a.jpg");
        write_png(tmp.path(), "b.png");
        let store = FlakyStore::new(true);
        let mut s = TaggingSession::start(&Config::default(), tmp.path(), store).unwrap();

        assert!(matches!(s.load_current(), Err(SessionError::Persistence(_))));
        assert_eq!(s.state().phase, SessionPhase::Idle);
        assert!(s.current().is_none());

        s.store.failing = false;
        assert_eq!(s.load_current().unwrap(), NavOutcome::Viewing { index: 1, skipped: 1 });
    }

    #[test]
    fn test_save_commits_even_when_advance_fails() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        write_garbage(tmp.path(), "b.jpg");
        write_png(tmp.path(), "c.png");
        let mut store = FlakyStore::new(false);
        store.writes_left = Some(1);
        let mut s = TaggingSession::start(&Config::default(), tmp.path(), store).unwrap();
        s.load_current().unwrap();
        s.toggle_category("people").unwrap();

        assert_eq!(s.save().unwrap(), NavOutcome::Stalled { index: 1 });
        assert_eq!(s.state().phase, SessionPhase::Idle);
        assert!(s.pending().is_empty());
        assert!(matches!(s.save(), Err(SessionError::NoCurrentPhoto)));

        let records = s.store().list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "a.png");
        assert_eq!(records[0].labels, "people");

        s.store.writes_left = None;
        s.store.failing = false;
        assert_eq!(s.load_current().unwrap(), NavOutcome::Viewing { index: 2, skipped: 1 });
        assert_eq!(s.store().count().unwrap(), 2);
    }

    #[test]
    fn test_mutations_require_a_photo() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        let mut s = session(tmp.path());

        assert!(matches!(s.set_rating(1), Err(SessionError::NoCurrentPhoto)));
        assert!(matches!(s.save(), Err(SessionError::NoCurrentPhoto)));
    }

    #[test]
    fn test_rejected_mutation_leaves_pending() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        let mut s = session(tmp.path());
        s.load_current().unwrap();
        s.toggle_category("city").unwrap();

        assert!(matches!(
            s.toggle_category("cars"),
            Err(SessionError::UnknownCategory(_))
        ));
        assert!(matches!(s.set_rating(7), Err(SessionError::InvalidRating(7))));
        assert!(matches!(
            s.select_category("city"),
            Err(SessionError::ModeMismatch { .. })
        ));
        assert_eq!(s.pending().labels.to_column(), "city");
    }

    #[test]
    fn test_press_keys() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        let mut s = session(tmp.path());
        s.load_current().unwrap();

        s.press('l').unwrap();
        s.press('x').unwrap();
        s.press('2').unwrap();
        s.press('k').unwrap();
        assert!(matches!(s.press('q'), Err(SessionError::UnknownTrigger('q'))));

        let pending = s.pending();
        assert_eq!(pending.labels.to_column(), "abstract,landscape");
        assert_eq!(pending.rating, 2);
        assert!(pending.do_not_delete);
    }

    #[test]
    fn test_single_select_session() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "a.png");
        let mut config = Config::default();
        config.tagging.mode = LabelMode::Single;
        let mut s =
            TaggingSession::start(&config, tmp.path(), SqliteCatalog::open_in_memory().unwrap())
                .unwrap();
        s.load_current().unwrap();

        s.select_category("city").unwrap();
        s.select_category("nature").unwrap();
        s.select_category("nature").unwrap();
        assert_eq!(s.pending().labels, Labels::Single(Some("nature".into())));
        assert!(matches!(
            s.toggle_category("city"),
            Err(SessionError::ModeMismatch { .. })
        ));

        s.save().unwrap();
        assert_eq!(s.store().list().unwrap()[0].labels, "nature");
    }
}

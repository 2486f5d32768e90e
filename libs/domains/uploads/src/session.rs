//! Guest upload page state: selected files, per-file progress, pending
//! message and the batch summary.

use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{UploadError, UploadResult};
use crate::models::{EventRecord, LocalFile};
use crate::service::UploadBackend;

/// Tracks which local previews are alive
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<Uuid>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(&self) -> PreviewHandle {
        let id = Uuid::new_v4();
        if let Ok(mut live) = self.live.lock() {
            live.insert(id);
        }
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    fn release(&self, id: Uuid) {
        if let Ok(mut live) = self.live.lock() {
            live.remove(&id);
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }
}

/// Local preview of a selected file; released when dropped
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> String {
        format!("preview://{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
}

/// One selected file and its upload state
#[derive(Debug)]
pub struct UploadTask {
    id: Uuid,
    file: LocalFile,
    preview: PreviewHandle,
    progress: u8,
    uploading: bool,
    completed: bool,
    error: Option<String>,
    record: Option<EventRecord>,
}

impl UploadTask {
    fn new(file: LocalFile, preview: PreviewHandle) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            preview,
            progress: 0,
            uploading: false,
            completed: false,
            error: None,
            record: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file(&self) -> &LocalFile {
        &self.file
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    /// 0..=100
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn record(&self) -> Option<&EventRecord> {
        self.record.as_ref()
    }

    pub fn status(&self) -> TaskStatus {
        if self.uploading {
            TaskStatus::Uploading
        } else if self.completed {
            TaskStatus::Completed
        } else if self.error.is_some() {
            TaskStatus::Failed
        } else {
            TaskStatus::Pending
        }
    }

    /// Neither uploading nor done; failed tasks count as pending again
    pub fn is_pending(&self) -> bool {
        !self.uploading && !self.completed
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status(), TaskStatus::Completed | TaskStatus::Failed)
    }

    fn start(&mut self) {
        self.error = None;
        self.uploading = true;
        self.progress = 0;
    }

    fn finish(&mut self, outcome: &UploadResult<EventRecord>) {
        self.uploading = false;
        match outcome {
            Ok(record) => {
                self.completed = true;
                self.progress = 100;
                self.record = Some(record.clone());
            }
            Err(e) => {
                tracing::warn!(
                    task_id = %self.id,
                    file_name = %self.file.file_name,
                    error = %e,
                    "Upload failed"
                );
                self.error = Some(e.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct UploadSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Upload page for one event. Single writer: outcomes are applied to
/// tasks after their futures complete.
pub struct UploadSession {
    event_id: Uuid,
    backend: Arc<dyn UploadBackend>,
    previews: PreviewRegistry,
    tasks: Vec<UploadTask>,
    message: String,
    /// Set by a standalone message post until files are added or reset
    posted: Option<UploadSummary>,
}

impl UploadSession {
    pub fn new(event_id: Uuid, backend: Arc<dyn UploadBackend>) -> Self {
        Self {
            event_id,
            backend,
            previews: PreviewRegistry::new(),
            tasks: Vec::new(),
            message: String::new(),
            posted: None,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    pub fn task(&self, task_id: Uuid) -> Option<&UploadTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    fn pending_caption(&self) -> Option<String> {
        let trimmed = self.message.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn index_of(&self, task_id: Uuid) -> UploadResult<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(UploadError::TaskNotFound(task_id))
    }

    /// Add one pending task per file; returns their ids
    pub fn submit_files(&mut self, files: impl IntoIterator<Item = LocalFile>) -> Vec<Uuid> {
        self.posted = None;
        files
            .into_iter()
            .map(|file| {
                let task = UploadTask::new(file, self.previews.acquire());
                let id = task.id;
                self.tasks.push(task);
                id
            })
            .collect()
    }

    /// Upload a single task. The pending message, if any, becomes its
    /// caption and is cleared on success.
    pub async fn upload_one(&mut self, task_id: Uuid) -> UploadResult<()> {
        let index = self.index_of(task_id)?;
        if !self.tasks[index].is_pending() {
            return Ok(());
        }

        let caption = self.pending_caption();
        let task = &mut self.tasks[index];
        task.start();

        let outcome = self
            .backend
            .upload_image(self.event_id, task.file.clone(), caption.clone(), None)
            .await;
        task.finish(&outcome);

        match outcome {
            Ok(_) => {
                if caption.is_some() {
                    self.message.clear();
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Upload every pending task concurrently. The message is read once
    /// and attached to every image of the batch; the batch shares one
    /// group id. Returns the summary once all tasks are terminal.
    pub async fn upload_all(&mut self) -> Option<UploadSummary> {
        let caption = self.pending_caption();
        let group_id = Uuid::now_v7();

        let mut started = Vec::new();
        for task in self.tasks.iter_mut().filter(|t| t.is_pending()) {
            task.start();
            started.push((task.id, task.file.clone()));
        }
        if started.is_empty() {
            return self.summary();
        }

        let uploads = started.into_iter().map(|(task_id, file)| {
            let backend = Arc::clone(&self.backend);
            let caption = caption.clone();
            let event_id = self.event_id;
            async move {
                let outcome = backend
                    .upload_image(event_id, file, caption, Some(group_id))
                    .await;
                (task_id, outcome)
            }
        });
        let outcomes = join_all(uploads).await;

        let mut any_succeeded = false;
        for (task_id, outcome) in outcomes {
            any_succeeded |= outcome.is_ok();
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                task.finish(&outcome);
            }
        }

        if any_succeeded && caption.is_some() {
            self.message.clear();
        }

        let summary = self.summary();
        if let Some(summary) = summary {
            tracing::info!(
                event_id = %self.event_id,
                total = summary.total,
                successful = summary.successful,
                failed = summary.failed,
                "Upload batch finished"
            );
        }
        summary
    }

    /// Post `text` as a message-only record and clear the input. With no
    /// files selected the summary then reports the one posted message.
    /// Blank text is a no-op.
    pub async fn post_message(&mut self, text: &str) -> UploadResult<Option<EventRecord>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let record = self
            .backend
            .post_message(self.event_id, text.to_string())
            .await?;
        self.message.clear();
        self.posted = Some(UploadSummary {
            total: 1,
            successful: 1,
            failed: 0,
        });
        Ok(Some(record))
    }

    /// Drop a task that is not uploading; its preview is released
    pub fn remove_task(&mut self, task_id: Uuid) -> UploadResult<()> {
        let index = self.index_of(task_id)?;
        if self.tasks[index].uploading {
            return Err(UploadError::TaskBusy(task_id));
        }
        self.tasks.remove(index);
        Ok(())
    }

    /// Start over: no tasks, empty message
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.message.clear();
        self.posted = None;
    }

    /// Counts once at least one task exists and every task is terminal,
    /// or the posted message when no task exists
    pub fn summary(&self) -> Option<UploadSummary> {
        if self.tasks.is_empty() {
            return self.posted;
        }
        if !self.tasks.iter().all(UploadTask::is_terminal) {
            return None;
        }

        let successful = self.tasks.iter().filter(|t| t.completed).count();
        Some(UploadSummary {
            total: self.tasks.len(),
            successful,
            failed: self.tasks.len() - successful,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordContent, RecordKind};
    use crate::service::MockUploadBackend;

    const EVENT: Uuid = Uuid::nil();

    fn jpeg(name: &str) -> LocalFile {
        LocalFile::new(name, "image/jpeg", vec![1u8, 2, 3])
    }

    fn photo_record(file: &LocalFile, caption: Option<String>, group: Option<Uuid>) -> EventRecord {
        EventRecord::new(
            EVENT,
            RecordContent::photo(
                format!("http://localhost:8080/api/blobs/{}", file.file_name),
                file.file_name.clone(),
                caption,
            ),
        )
        .with_group(group)
    }

    /// Backend that fails for files named `bad*`
    fn backend() -> MockUploadBackend {
        let mut backend = MockUploadBackend::new();
        backend
            .expect_upload_image()
            .returning(|_, file, caption, group| {
                if file.file_name.starts_with("bad") {
                    Err(UploadError::Blob("network error".into()))
                } else {
                    Ok(photo_record(&file, caption, group))
                }
            });
        backend.expect_post_message().returning(|event_id, text| {
            Ok(EventRecord::new(event_id, RecordContent::Message { text }))
        });
        backend
    }

    fn session() -> UploadSession {
        UploadSession::new(EVENT, Arc::new(backend()))
    }

    #[test]
    fn test_submit_files_creates_pending_tasks_with_previews() {
        let mut session = session();
        let ids = session.submit_files([jpeg("a.jpg"), jpeg("b.jpg")]);

        assert_eq!(ids.len(), 2);
        assert_eq!(session.previews().live_count(), 2);
        for task in session.tasks() {
            assert_eq!(task.progress(), 0);
            assert_eq!(task.status(), TaskStatus::Pending);
            assert!(task.preview().url().starts_with("preview://"));
        }
        assert_eq!(session.summary(), None);
    }

    #[tokio::test]
    async fn test_upload_all_partial_failure_summary() {
        let mut session = session();
        session.submit_files([jpeg("a.jpg"), jpeg("bad.jpg"), jpeg("c.jpg")]);

        let summary = session.upload_all().await;

        assert_eq!(
            summary,
            Some(UploadSummary {
                total: 3,
                successful: 2,
                failed: 1
            })
        );
        let failed: Vec<&UploadTask> = session
            .tasks()
            .iter()
            .filter(|t| t.status() == TaskStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].file().file_name, "bad.jpg");
        assert!(failed[0].error().unwrap().contains("network error"));
        assert!(failed[0].record().is_none());
    }

    #[tokio::test]
    async fn test_upload_all_shares_caption_and_group() {
        let mut session = session();
        session.submit_files([jpeg("a.jpg"), jpeg("b.jpg")]);
        session.set_message("  Happy birthday!  ");

        session.upload_all().await;

        let records: Vec<&EventRecord> =
            session.tasks().iter().filter_map(|t| t.record()).collect();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind() == RecordKind::Combined));
        assert!(records.iter().all(|r| r.message() == Some("Happy birthday!")));
        assert!(records[0].group_id.is_some());
        assert_eq!(records[0].group_id, records[1].group_id);
        assert_eq!(session.message(), "");
    }

    #[tokio::test]
    async fn test_message_kept_when_whole_batch_fails() {
        let mut session = session();
        session.submit_files([jpeg("bad1.jpg"), jpeg("bad2.jpg")]);
        session.set_message("Keep me");

        let summary = session.upload_all().await.unwrap();

        assert_eq!(summary.failed, 2);
        assert_eq!(session.message(), "Keep me");
    }

    #[tokio::test]
    async fn test_failed_task_retried_by_upload_one() {
        let mut backend = MockUploadBackend::new();
        let mut attempts = 0;
        backend
            .expect_upload_image()
            .times(2)
            .returning(move |_, file, caption, group| {
                attempts += 1;
                if attempts == 1 {
                    Err(UploadError::Blob("timeout".into()))
                } else {
                    Ok(photo_record(&file, caption, group))
                }
            });
        let mut session = UploadSession::new(EVENT, Arc::new(backend));
        let id = session.submit_files([jpeg("a.jpg")])[0];

        assert!(session.upload_one(id).await.is_err());
        assert_eq!(session.task(id).unwrap().status(), TaskStatus::Failed);

        session.upload_one(id).await.unwrap();
        let task = session.task(id).unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.error(), None);
        assert_eq!(task.progress(), 100);
        assert!(task.record().unwrap().group_id.is_none());

        // Completed tasks are not uploaded again
        session.upload_one(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_one_uses_and_clears_message() {
        let mut session = session();
        let id = session.submit_files([jpeg("a.jpg")])[0];
        session.set_message("Cheers");

        session.upload_one(id).await.unwrap();

        let record = session.task(id).unwrap().record().unwrap();
        assert_eq!(record.kind(), RecordKind::Combined);
        assert_eq!(session.message(), "");
    }

    #[tokio::test]
    async fn test_upload_one_unknown_task() {
        let mut session = session();
        let missing = Uuid::new_v4();
        assert!(matches!(
            session.upload_one(missing).await,
            Err(UploadError::TaskNotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_post_message() {
        let mut session = session();
        session.set_message("Congrats!");

        let record = session.post_message("Congrats!").await.unwrap().unwrap();
        assert_eq!(record.kind(), RecordKind::Message);
        assert!(record.url().is_none());
        assert_eq!(session.message(), "");

        assert_eq!(session.post_message("   ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_message_post_reports_summary() {
        let mut session = session();
        assert_eq!(session.summary(), None);

        session.post_message("Congrats!").await.unwrap();
        assert_eq!(
            session.summary(),
            Some(UploadSummary {
                total: 1,
                successful: 1,
                failed: 0
            })
        );

        session.submit_files([jpeg("a.jpg")]);
        assert_eq!(session.summary(), None);

        session.post_message("Again").await.unwrap();
        session.reset();
        assert_eq!(session.summary(), None);
    }

    #[tokio::test]
    async fn test_failed_message_post_reports_nothing() {
        let mut backend = MockUploadBackend::new();
        backend
            .expect_post_message()
            .returning(|_, _| Err(UploadError::Database("down".into())));
        let mut session = UploadSession::new(EVENT, Arc::new(backend));

        assert!(session.post_message("Hello").await.is_err());
        assert_eq!(session.summary(), None);
    }

    #[tokio::test]
    async fn test_remove_and_reset_release_previews() {
        let mut session = session();
        let ids = session.submit_files([jpeg("a.jpg"), jpeg("b.jpg"), jpeg("c.jpg")]);

        session.remove_task(ids[0]).unwrap();
        assert_eq!(session.tasks().len(), 2);
        assert_eq!(session.previews().live_count(), 2);
        assert!(matches!(
            session.remove_task(ids[0]),
            Err(UploadError::TaskNotFound(_))
        ));

        session.set_message("draft");
        session.reset();
        assert!(session.tasks().is_empty());
        assert_eq!(session.message(), "");
        assert_eq!(session.previews().live_count(), 0);
    }

    mod with_service {
        use super::*;
        use crate::blob::{BlobRef, BlobStore, BlobUrls, InMemoryBlobStore, MockBlobStore};
        use crate::repository::{InMemoryRecordRepository, RecordRepository};
        use crate::service::UploadService;
        use chrono::Utc;
        use domain_events::{Event, EventRepository, InMemoryEventRepository};

        async fn seeded_events() -> (InMemoryEventRepository, Uuid) {
            let events = InMemoryEventRepository::new();
            let event = Event {
                id: Uuid::new_v4(),
                title: "Party".into(),
                description: "d".into(),
                date: "2025-06-01".into(),
                location: "l".into(),
                event_type: "Wedding".into(),
                custom_event_type: None,
                created_at: Utc::now(),
                owner_user_id: Uuid::new_v4(),
            };
            let id = event.id;
            events.create(event).await.unwrap();
            (events, id)
        }

        #[tokio::test]
        async fn test_same_named_files_keep_separate_blobs() {
            let (events, event_id) = seeded_events().await;
            let blobs = Arc::new(InMemoryBlobStore::new(BlobUrls::new("http://localhost:8080")));
            let records = InMemoryRecordRepository::new();
            let service = UploadService::new(events, records.clone(), blobs.clone());
            let mut session = UploadSession::new(event_id, Arc::new(service));

            session.submit_files([
                LocalFile::new("image.jpg", "image/jpeg", vec![1u8]),
                LocalFile::new("image.jpg", "image/jpeg", vec![2u8]),
            ]);
            let summary = session.upload_all().await.unwrap();
            assert_eq!(summary.successful, 2);

            assert_eq!(blobs.len().await, 2);
            let stored = records.list_for_event(event_id).await.unwrap();
            let mut contents = Vec::new();
            for record in &stored {
                let path = record.file_name().unwrap();
                assert!(path.ends_with("-image.jpg"));
                let blob = blobs.get(path).await.unwrap().unwrap();
                contents.push(blob.bytes.to_vec());
            }
            contents.sort();
            assert_eq!(contents, vec![vec![1u8], vec![2u8]]);
        }

        #[tokio::test]
        async fn test_partial_failure_stores_only_successful_records() {
            let (events, event_id) = seeded_events().await;
            let mut blobs = MockBlobStore::new();
            blobs.expect_put().returning(|path, _, _| {
                if path.ends_with("-bad.jpg") {
                    Err(UploadError::Blob("network error".into()))
                } else {
                    Ok(BlobRef {
                        path: path.to_string(),
                        url: format!("http://localhost:8080/api/blobs/{}", path),
                    })
                }
            });
            let records = InMemoryRecordRepository::new();
            let service = UploadService::new(events, records.clone(), Arc::new(blobs));
            let mut session = UploadSession::new(event_id, Arc::new(service));

            session.submit_files([jpeg("a.jpg"), jpeg("bad.jpg"), jpeg("c.jpg")]);
            let summary = session.upload_all().await;

            assert_eq!(
                summary,
                Some(UploadSummary {
                    total: 3,
                    successful: 2,
                    failed: 1
                })
            );
            let stored = records.list_for_event(event_id).await.unwrap();
            assert_eq!(stored.len(), 2);
            assert!(
                stored
                    .iter()
                    .all(|r| !r.file_name().unwrap().ends_with("-bad.jpg"))
            );
        }
    }

    #[test]
    fn test_dropping_session_releases_previews() {
        let mut session = session();
        session.submit_files([jpeg("a.jpg")]);
        let registry = session.previews().clone();

        drop(session);
        assert_eq!(registry.live_count(), 0);
    }
}

//! Gallery page state: loaded gallery, lightbox and selection

use domain_events::EventRepository;
use domain_uploads::{EventRecord, RecordRepository};
use std::sync::Arc;
use uuid::Uuid;

use crate::download::{BlobFetcher, DownloadReport, DownloadSink, download_records};
use crate::lightbox::{Lightbox, NavInput};
use crate::model::Gallery;
use crate::selection::Selection;
use crate::service::GalleryService;

pub struct GalleryView<E: EventRepository, R: RecordRepository> {
    service: Arc<GalleryService<E, R>>,
    fetcher: Arc<dyn BlobFetcher>,
    sink: Arc<dyn DownloadSink>,
    gallery: Option<Gallery>,
    lightbox: Lightbox,
    selection: Selection,
}

impl<E: EventRepository, R: RecordRepository> GalleryView<E, R> {
    pub fn new(
        service: Arc<GalleryService<E, R>>,
        fetcher: Arc<dyn BlobFetcher>,
        sink: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            service,
            fetcher,
            sink,
            gallery: None,
            lightbox: Lightbox::default(),
            selection: Selection::new(),
        }
    }

    /// Load an event's gallery. Failures are logged and leave the view
    /// empty. Always clears the selection and returns to the grid.
    pub async fn load(&mut self, event_id: Uuid) {
        self.selection.clear();
        self.gallery = match self.service.load(event_id).await {
            Ok(gallery) => Some(gallery),
            Err(e) => {
                tracing::error!(%event_id, error = %e, "Failed to load gallery");
                None
            }
        };
        let count = self.images().len();
        self.lightbox.reset(count);
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.gallery.as_ref()
    }

    pub fn images(&self) -> &[EventRecord] {
        self.gallery
            .as_ref()
            .map(|g| g.images.as_slice())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> &[EventRecord] {
        self.gallery
            .as_ref()
            .map(|g| g.messages.as_slice())
            .unwrap_or_default()
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Image shown fullscreen, if any
    pub fn current(&self) -> Option<&EventRecord> {
        self.lightbox.index().and_then(|i| self.images().get(i))
    }

    pub fn open(&mut self, index: usize) {
        self.lightbox.open(index);
    }

    pub fn close(&mut self) {
        self.lightbox.close();
    }

    pub fn next(&mut self) {
        self.lightbox.next();
    }

    pub fn prev(&mut self) {
        self.lightbox.prev();
    }

    pub fn jump_to(&mut self, index: usize) {
        self.lightbox.jump_to(index);
    }

    pub fn handle_input(&mut self, input: NavInput) {
        self.lightbox.handle(input);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toggle(&mut self, record_id: Uuid) -> bool {
        self.selection.toggle(record_id)
    }

    /// Download the selected images in gallery order
    pub async fn download_selected(&self) -> DownloadReport {
        let picked = self.selection.pick(self.images());
        download_records(&picked, self.fetcher.as_ref(), self.sink.as_ref()).await
    }
}

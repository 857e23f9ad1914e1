//! Result loading and score export handlers

use std::path::PathBuf;
use std::sync::Arc;

use iced::Task;

use stave_client::NoteSheet;
use stave_core::NoteIndex;

use super::super::app::StaveApp;
use super::super::message::Message;

impl StaveApp {
    /// Handle NotesFetched message
    ///
    /// A failed fetch degrades to an empty listener rather than blocking
    /// the result view.
    pub fn handle_notes_fetched(
        &mut self,
        result: Result<Arc<NoteSheet>, String>,
    ) -> Task<Message> {
        match result {
            Ok(sheet) => {
                log::info!("loaded {} notes ({:.1}s)", sheet.notes.len(), sheet.duration);
                self.listener.duration = sheet.duration;
                self.listener.index = Some(NoteIndex::new(sheet.notes.clone(), sheet.duration));
            }
            Err(e) => {
                log::warn!("notes unavailable: {e}");
                self.listener.index = Some(NoteIndex::default());
            }
        }
        Task::none()
    }

    /// Handle AudioCached message
    pub fn handle_audio_cached(&mut self, result: Result<PathBuf, String>) -> Task<Message> {
        match result {
            Ok(path) => {
                self.listener
                    .transport
                    .load(&path, self.listener.duration);
            }
            Err(e) => {
                log::warn!("audio unavailable ({e}), listener runs on a silent clock");
                self.listener.transport.load_silent(self.listener.duration);
            }
        }
        Task::none()
    }

    /// Handle SavePdf message: ask where to put the score
    pub fn handle_save_pdf(&mut self) -> Task<Message> {
        let Some(job_id) = self.store.bound_id().map(String::from) else {
            return Task::none();
        };

        Task::perform(
            async move {
                rfd::AsyncFileDialog::new()
                    .set_file_name(format!("partition_{job_id}.pdf"))
                    .add_filter("PDF", &["pdf"])
                    .save_file()
                    .await
                    .map(|handle| handle.path().to_path_buf())
            },
            Message::PdfDestinationPicked,
        )
    }

    /// Handle PdfDestinationPicked message: stream the artifact to disk
    pub fn handle_pdf_destination(&mut self, dest: Option<PathBuf>) -> Task<Message> {
        let Some(dest) = dest else {
            return Task::none(); // dialog cancelled
        };
        let Some(job_id) = self.store.bound_id().map(String::from) else {
            return Task::none();
        };

        self.listener.sheet_status = String::from("Saving score...");
        let api = self.api.clone();
        Task::perform(
            async move {
                api.download_pdf(&job_id, &dest)
                    .await
                    .map(|_| dest)
                    .map_err(|e| e.to_string())
            },
            Message::PdfSaved,
        )
    }

    /// Handle PdfSaved message
    pub fn handle_pdf_saved(&mut self, result: Result<PathBuf, String>) -> Task<Message> {
        match result {
            Ok(path) => {
                log::info!("score saved to {path:?}");
                self.listener.sheet_status = format!("Saved to {}", path.display());
            }
            Err(e) => {
                log::warn!("score save failed: {e}");
                self.listener.sheet_status = format!("Save failed: {e}");
            }
        }
        Task::none()
    }
}

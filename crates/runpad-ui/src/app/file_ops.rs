//! Open and save, with the dialogs and disk I/O kept off the UI thread.

use iced::Task;
use rfd::AsyncFileDialog;
use runpad_core::config::FileFilter;
use runpad_core::document::{self, Document};
use std::path::PathBuf;

use super::{App, Message};

/// Error text for a dialog the user dismissed.
pub const CANCELLED: &str = "Cancelled";

impl App {
    /// Saves to the current path, or falls back to Save As when untitled.
    pub fn save_task(&self, then_run: bool) -> Task<Message> {
        let Some(path) = self.document.path().map(|p| p.to_path_buf()) else {
            return self.save_as_task(then_run);
        };

        let revision = self.document.revision();
        let text = self.document.text().into_owned();
        Task::perform(save(path, text), move |result| Message::FileSaved {
            result,
            revision,
            then_run,
        })
    }

    /// Asks for a path, then saves there.
    pub fn save_as_task(&self, then_run: bool) -> Task<Message> {
        let revision = self.document.revision();
        let text = self.document.text().into_owned();
        let filters = self.config.files.filters.clone();
        let file_name = default_file_name(&self.document, &filters);
        let directory = self
            .document
            .path()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf());

        Task::perform(
            pick_and_save(filters, file_name, directory, text),
            move |result| Message::FileSaved {
                result,
                revision,
                then_run,
            },
        )
    }

    pub fn open_task(&self) -> Task<Message> {
        Task::perform(
            pick_and_load(self.config.files.filters.clone()),
            Message::FileOpened,
        )
    }
}

fn dialog(filters: &[FileFilter]) -> AsyncFileDialog {
    filters.iter().fold(AsyncFileDialog::new(), |dialog, filter| {
        dialog.add_filter(filter.name.as_str(), filter.extensions.as_slice())
    })
}

/// Suggested name for the save dialog.
fn default_file_name(document: &Document, filters: &[FileFilter]) -> String {
    if document.path().is_some() {
        return document.name().to_string();
    }
    let extension = filters
        .iter()
        .flat_map(|f| f.extensions.iter())
        .find(|ext| ext.as_str() != "*");
    match extension {
        Some(ext) => format!("untitled.{}", ext),
        None => "untitled".to_string(),
    }
}

pub async fn load(path: PathBuf) -> Result<(PathBuf, String), String> {
    Document::load(path)
        .await
        .map_err(|e| format!("Failed to read file: {}", e))
}

async fn pick_and_load(filters: Vec<FileFilter>) -> Result<(PathBuf, String), String> {
    let file = dialog(&filters)
        .set_title("Open script")
        .pick_file()
        .await
        .ok_or_else(|| CANCELLED.to_string())?;
    load(file.path().to_path_buf()).await
}

async fn save(path: PathBuf, text: String) -> Result<PathBuf, String> {
    document::write_text(path, text)
        .await
        .map_err(|e| format!("Failed to save: {}", e))
}

async fn pick_and_save(
    filters: Vec<FileFilter>,
    file_name: String,
    directory: Option<PathBuf>,
    text: String,
) -> Result<PathBuf, String> {
    let mut dialog = dialog(&filters).set_title("Save script").set_file_name(file_name);
    if let Some(directory) = directory {
        dialog = dialog.set_directory(directory);
    }
    let file = dialog.save_file().await.ok_or_else(|| CANCELLED.to_string())?;
    save(file.path().to_path_buf(), text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untitled_name_uses_first_extension() {
        let filters = vec![
            FileFilter::new("All Files", &["*"]),
            FileFilter::new("Python Files", &["py"]),
        ];
        assert_eq!(default_file_name(&Document::new(), &filters), "untitled.py");
        assert_eq!(default_file_name(&Document::new(), &[]), "untitled");
    }

    #[test]
    fn test_saved_document_keeps_its_name() {
        let doc = Document::opened("/tmp/quiz.py", "");
        assert_eq!(default_file_name(&doc, &[]), "quiz.py");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.py");

        let saved = save(path.clone(), "print('hi')\n".to_string()).await.unwrap();
        assert_eq!(saved, path);

        let (_, text) = load(path).await.unwrap();
        assert_eq!(text, "print('hi')\n");
    }

    #[tokio::test]
    async fn test_load_error_is_readable() {
        let err = load(PathBuf::from("/no/such/dir/x.py")).await.unwrap_err();
        assert!(err.starts_with("Failed to read file"));
    }
}

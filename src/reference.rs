use crate::host::Editor;

/// Markdown image tag for an uploaded image.
///
/// The extension is always `.jpg`, whatever format was uploaded, and an empty
/// id produces `<api_url>/i/.jpg`. Both mirror how the image host links are
/// consumed today.
pub fn image_reference(api_url: &str, image_id: &str) -> String {
    format!("![]({}/i/{}.jpg)", api_url, image_id)
}

pub struct ReferenceInserter;

impl ReferenceInserter {
    /// Replace the editor selection with the reference and return the inserted text.
    pub fn insert(editor: &dyn Editor, api_url: &str, image_id: &str) -> String {
        let text = image_reference(api_url, image_id);
        editor.replace_selection(&text);
        text
    }
}

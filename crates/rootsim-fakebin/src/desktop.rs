/// A freedesktop launcher entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub comment: String,
    pub exec: String,
    pub icon: String,
    pub categories: Vec<String>,
    pub mime_types: Vec<String>,
    pub terminal: bool,
}

impl DesktopEntry {
    pub fn render(&self) -> String {
        let mut content = String::from("[Desktop Entry]\n");
        content.push_str("Type=Application\n");
        content.push_str(&format!("Name={}\n", sanitize(&self.name)));
        if !self.comment.is_empty() {
            content.push_str(&format!("Comment={}\n", sanitize(&self.comment)));
        }
        content.push_str(&format!("Exec={}\n", sanitize(&self.exec)));
        if !self.icon.is_empty() {
            content.push_str(&format!("Icon={}\n", sanitize(&self.icon)));
        }
        content.push_str(&format!("Terminal={}\n", self.terminal));
        if !self.categories.is_empty() {
            content.push_str(&format!("Categories={};\n", self.categories.join(";")));
        }
        if !self.mime_types.is_empty() {
            content.push_str(&format!("MimeType={};\n", self.mime_types.join(";")));
        }
        content
    }
}

fn sanitize(value: &str) -> String {
    value.replace(['\n', '\r'], " ")
}

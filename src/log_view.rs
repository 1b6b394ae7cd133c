#[derive(Debug, Default)]
pub struct LogView {
    pub entries: Vec<String>,
}

impl LogView {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
        if self.entries.len() > 200 {
            self.entries.remove(0);
        }
    }
}

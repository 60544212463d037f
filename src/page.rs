// Display list for one rendered sheet

/// A single drawing operation, in top-down form coordinates (points) with
/// the renderer offset already applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Text whose baseline starts at (x, y).
    Text { x: f32, y: f32, text: String },
    /// Filled slug whose top-left corner is at (x, y).
    Slug {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    },
}

/// The marks drawn on one page, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    marks: Vec<Mark>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Top-left corners of every slug on the page.
    pub fn slugs(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.marks.iter().filter_map(|m| match m {
            Mark::Slug { x, y, .. } => Some((*x, *y)),
            Mark::Text { .. } => None,
        })
    }

    /// Every text run on the page with its baseline origin.
    pub fn texts(&self) -> impl Iterator<Item = (f32, f32, &str)> + '_ {
        self.marks.iter().filter_map(|m| match m {
            Mark::Text { x, y, text } => Some((*x, *y, text.as_str())),
            Mark::Slug { .. } => None,
        })
    }
}

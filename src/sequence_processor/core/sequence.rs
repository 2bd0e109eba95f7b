/// One record handed out by a [`SequenceReader`](super::SequenceReader).
///
/// `quality` holds the raw Phred+33 ASCII scores exactly as read, parallel to
/// `data`, and is `None` for formats without qualities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub data: Vec<u8>,
    pub quality: Option<Vec<u8>>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            description: None,
            data: data.into(),
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: impl Into<Vec<u8>>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Identifier and description joined the way they appear on the header line
    pub fn header(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} {}", self.id, desc),
            None => self.id.clone(),
        }
    }
}

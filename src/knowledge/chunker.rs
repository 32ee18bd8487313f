use crate::knowledge::types::TranscriptEntry;

/// Reassembles timestamped transcript entries into continuous text
pub struct TranscriptChunker {
    batch_size: usize,
}

impl TranscriptChunker {
    /// A zero batch size is treated as one entry per batch
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Join entries batch by batch: entries within a batch are separated by a
    /// single space and every batch is followed by one trailing space.
    /// Callers trim the result; batching only affects spacing.
    pub fn reassemble(&self, entries: &[TranscriptEntry]) -> String {
        let mut output = String::new();

        for batch in entries.chunks(self.batch_size) {
            let joined = batch
                .iter()
                .map(|entry| entry.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&joined);
            output.push(' ');
        }

        output
    }
}

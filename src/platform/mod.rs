pub mod telegram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Audio,
    Document,
}

/// A file attached to a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    /// Opaque platform file handle, reusable for sending the file back
    pub file_id: String,
    pub mime_type: Option<String>,
}

impl Attachment {
    /// Audio uploads always qualify; documents only when their declared
    /// MIME type starts with `audio/`. File names are not inspected.
    pub fn is_audio(&self) -> bool {
        match self.kind {
            AttachmentKind::Audio => true,
            AttachmentKind::Document => self
                .mime_type
                .as_deref()
                .is_some_and(|mime| mime.starts_with("audio/")),
        }
    }
}

/// A message received from the chat platform, already decoded
#[derive(Debug, Clone, Default)]
pub struct ChatEvent {
    pub text: Option<String>,
    pub audio: Option<Attachment>,
    pub document: Option<Attachment>,
}

impl ChatEvent {
    /// The uploaded file, preferring the audio slot over the document slot.
    pub fn attachment(&self) -> Option<&Attachment> {
        self.audio.as_ref().or(self.document.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(mime: Option<&str>) -> Attachment {
        Attachment {
            kind: AttachmentKind::Document,
            file_id: "D".to_string(),
            mime_type: mime.map(str::to_string),
        }
    }

    #[test]
    fn test_document_mime_policy() {
        assert!(document(Some("audio/mpeg")).is_audio());
        assert!(document(Some("audio/flac")).is_audio());
        assert!(!document(Some("application/octet-stream")).is_audio());
        assert!(!document(Some("video/mp4")).is_audio());
        assert!(!document(None).is_audio());
    }

    #[test]
    fn test_audio_always_qualifies() {
        let audio = Attachment {
            kind: AttachmentKind::Audio,
            file_id: "A".to_string(),
            mime_type: None,
        };
        assert!(audio.is_audio());
    }

    #[test]
    fn test_attachment_prefers_audio() {
        let event = ChatEvent {
            text: None,
            audio: Some(Attachment {
                kind: AttachmentKind::Audio,
                file_id: "A".to_string(),
                mime_type: None,
            }),
            document: Some(document(Some("audio/mpeg"))),
        };
        assert_eq!(event.attachment().map(|a| a.file_id.as_str()), Some("A"));

        let doc_only = ChatEvent {
            document: Some(document(Some("text/plain"))),
            ..ChatEvent::default()
        };
        assert_eq!(doc_only.attachment().map(|a| a.file_id.as_str()), Some("D"));
        assert!(ChatEvent::default().attachment().is_none());
    }
}

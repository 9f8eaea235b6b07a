//! Photo payloads

use uuid::Uuid;

/// An image picked on the device.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl std::fmt::Debug for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Photo")
            .field("size", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl Photo {
    /// File extension for the MIME type, if it is an image we accept.
    pub fn extension(&self) -> Option<&'static str> {
        match self.content_type.as_str() {
            "image/jpeg" | "image/jpg" => Some("jpg"),
            "image/png" => Some("png"),
            "image/webp" => Some("webp"),
            "image/heic" => Some("heic"),
            _ => None,
        }
    }

    /// A fresh object path under `folder`; every upload gets a new name so
    /// cached copies of the previous photo never shadow the new one.
    pub fn object_path(&self, folder: &str, owner: impl std::fmt::Display) -> Option<String> {
        self.extension()
            .map(|extension| format!("{folder}/{owner}/{}.{extension}", Uuid::now_v7()))
    }
}

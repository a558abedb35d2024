use shared::domain::GalleryItemId;
use thiserror::Error;

pub const MSG_SAVE_ITEM_FAILED: &str = "Gagal menyimpan item galeri";
pub const MSG_DELETE_ITEM_FAILED: &str = "Gagal menghapus item galeri";
pub const MSG_TOGGLE_STATUS_FAILED: &str = "Gagal mengubah status";
pub const MSG_LOAD_ITEM_FAILED: &str = "Gagal memuat data item galeri";
pub const MSG_SAVE_CATEGORY_FAILED: &str = "Gagal menyimpan kategori";
pub const MSG_DELETE_CATEGORY_FAILED: &str = "Gagal menghapus kategori";
pub const MSG_LOAD_CATEGORIES_FAILED: &str = "Gagal memuat kategori galeri";
pub const MSG_UPLOAD_FAILED: &str = "Gagal mengunggah gambar";

/// Client-side form problems. Raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Judul harus diisi")]
    MissingTitle,
    #[error("Gambar harus dipilih")]
    MissingImage,
    #[error("Nama kategori (label) harus diisi")]
    MissingLabel,
    #[error("Ukuran gambar maksimal 20MB ({size} byte)")]
    ImageTooLarge { size: usize, max: usize },
    #[error("File harus berupa gambar (diterima: {mime})")]
    UnsupportedImageType { mime: String },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("api error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },
    #[error("conflict: {message}")]
    Conflict { message: String },
    #[error("Gagal mengunggah gambar: {source}")]
    Upload {
        #[source]
        source: Box<ClientError>,
    },
    #[error("gallery item {id} is not in the loaded list")]
    NotLoaded { id: GalleryItemId },
}

impl ClientError {
    pub(crate) fn from_status(status: u16, message: Option<String>) -> Self {
        match (status, message) {
            (409, Some(message)) => Self::Conflict { message },
            (409, None) => Self::Conflict {
                message: "resource is still referenced".to_string(),
            },
            (status, message) => Self::Api { status, message },
        }
    }

    pub(crate) fn upload(source: ClientError) -> Self {
        Self::Upload {
            source: Box::new(source),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Message to show the user: the server's own message when it sent one,
    /// the localized validation text, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(validation) => validation.to_string(),
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Conflict { message } => message.clone(),
            Self::Upload { .. } => MSG_UPLOAD_FAILED.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

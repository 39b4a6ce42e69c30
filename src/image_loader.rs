//! Header-only image sniffing for decode-on-add.
//!
//! Only the container header is read: the gallery needs intrinsic
//! dimensions, never pixels.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{ImageDecoder, ImageFormat, ImageReader};

use crate::error::GalleryError;

/// Where a candidate file's bytes come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file handed to the gallery by an upload or a drop.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    /// Declared MIME type, when the host knows one.
    pub mime: Option<String>,
    pub source: ImageSource,
}

impl ImageFile {
    /// A file on disk. The MIME type is inferred from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .map(str::to_owned);
        Self {
            name,
            mime,
            source: ImageSource::Path(path),
        }
    }

    /// An in-memory upload with the MIME type the host reported.
    pub fn from_bytes(name: impl Into<String>, mime: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.map(str::to_owned),
            source: ImageSource::Bytes(bytes),
        }
    }

    /// The `src` string the resulting item will carry.
    pub fn src(&self) -> String {
        match &self.source {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(_) => format!("upload:{}", self.name),
        }
    }

    /// Whether the declared MIME type allows decoding. Files without a
    /// declared type are sniffed.
    pub fn is_image_mime(&self) -> bool {
        self.mime
            .as_deref()
            .map_or(true, |m| m.to_ascii_lowercase().starts_with("image/"))
    }
}

/// Intrinsic size read from an image header.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Reads the intrinsic dimensions of `file`.
///
/// Blocking: callers on an async runtime go through the decode queue.
pub fn decode_dimensions(file: &ImageFile) -> Result<DecodedImage, GalleryError> {
    if !file.is_image_mime() {
        return Err(GalleryError::NotAnImage {
            name: file.name.clone(),
            mime: file.mime.clone().unwrap_or_default(),
        });
    }

    let owned;
    let bytes: &[u8] = match &file.source {
        ImageSource::Path(path) => {
            owned = std::fs::read(path)?;
            &owned
        }
        ImageSource::Bytes(bytes) => bytes,
    };

    let (format, (width, height)) = read_dimensions(&file.name, bytes)?;
    if width == 0 || height == 0 {
        return Err(GalleryError::EmptyImage {
            name: file.name.clone(),
        });
    }

    Ok(DecodedImage {
        src: file.src(),
        width,
        height,
        format,
    })
}

pub fn decode_path(path: &Path) -> Result<DecodedImage, GalleryError> {
    decode_dimensions(&ImageFile::from_path(path))
}

fn read_dimensions(name: &str, bytes: &[u8]) -> Result<(ImageFormat, (u32, u32)), GalleryError> {
    let format = image::guess_format(bytes).map_err(|_| GalleryError::UnknownFormat {
        name: name.to_owned(),
    })?;
    let decode_err = |source| GalleryError::Decode {
        name: name.to_owned(),
        source,
    };

    // GIF headers report the logical screen, which is what gets displayed.
    if format == ImageFormat::Gif {
        let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
        return Ok((format, decoder.dimensions()));
    }

    let dims = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(decode_err)?;
    Ok((format, dims))
}


#[cfg(test)]
mod tests {
    use super::test_images::*;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_png_dimensions_from_bytes() {
        let file = ImageFile::from_bytes("a.png", Some("image/png"), png(40, 20));
        let decoded = decode_dimensions(&file).unwrap();
        assert_eq!((decoded.width, decoded.height), (40, 20));
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.src, "upload:a.png");
    }

    #[test]
    fn test_gif_dimensions() {
        let file = ImageFile::from_bytes("a.gif", None, encoded(7, 3, ImageFormat::Gif));
        let decoded = decode_dimensions(&file).unwrap();
        assert_eq!((decoded.width, decoded.height), (7, 3));
    }

    #[test]
    fn test_non_image_mime_rejected() {
        let file = ImageFile::from_bytes("notes.txt", Some("text/plain"), png(4, 4));
        assert!(matches!(
            decode_dimensions(&file),
            Err(GalleryError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let file = ImageFile::from_bytes("x.png", Some("image/png"), b"not an image".to_vec());
        assert!(matches!(
            decode_dimensions(&file),
            Err(GalleryError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_truncated_png_rejected() {
        let mut bytes = png(10, 10);
        bytes.truncate(12);
        let file = ImageFile::from_bytes("cut.png", None, bytes);
        assert!(decode_dimensions(&file).is_err());
    }

    #[test]
    fn test_path_source_infers_mime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.PNG");
        write_png(&path, 12, 8);

        let file = ImageFile::from_path(&path);
        assert_eq!(file.name, "photo.PNG");
        assert_eq!(file.mime.as_deref(), Some("image/png"));
        let decoded = decode_path(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (12, 8));
        assert_eq!(decoded.src, path.display().to_string());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = decode_path(&dir.path().join("gone.png"));
        assert!(matches!(result, Err(GalleryError::Io(_))));
    }

    #[test]
    fn test_text_extension_rejected_before_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, png(2, 2)).unwrap();
        assert!(matches!(
            decode_path(&path),
            Err(GalleryError::NotAnImage { .. })
        ));
    }
}

use std::fs;
use std::path::Path;

use image::Luma;
use qrcode::types::QrError;
use qrcode::QrCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrGenerateError {
    #[error("payload does not fit into a QR code: {0}")]
    Capacity(#[from] QrError),

    #[error("failed to prepare the QR directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write the QR image: {0}")]
    Image(#[from] image::error::ImageError),
}

/// Renders `payload` into a PNG under `<media_root>/qr/<file_name>` and
/// returns the relative path the frontend resolves against the API host.
///
/// The directory is created if absent. A repeated `file_name` silently
/// overwrites the previous image, so callers embed the spot id in the name
/// when they need isolation.
pub fn generate_qr(
    payload: &str,
    file_name: &str,
    media_root: &Path,
) -> Result<String, QrGenerateError> {
    let qr_dir = media_root.join("qr");
    fs::create_dir_all(&qr_dir)?;

    let code = QrCode::new(payload.as_bytes())?;
    let rendered = code.render::<Luma<u8>>().build();
    rendered.save(qr_dir.join(file_name))?;

    Ok(format!("media/qr/{}", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn decode(path: &Path) -> String {
        let img = image::open(path).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn writes_png_and_round_trips_the_link() {
        let dir = tempdir().unwrap();
        let link = "http://192.168.1.20:8000/api/mark-as-scanned/A1";

        let rel = generate_qr(link, "cancel_A1.png", dir.path()).unwrap();

        assert_eq!(rel, "media/qr/cancel_A1.png");
        let file = dir.path().join("qr").join("cancel_A1.png");
        assert!(file.exists());
        assert_eq!(decode(&file), link);
    }

    #[test]
    fn same_file_name_overwrites_previous_image() {
        let dir = tempdir().unwrap();

        generate_qr("http://host/api/mark-as-scanned/B2", "cancel_B2.png", dir.path()).unwrap();
        generate_qr("http://other/api/mark-as-scanned/B2", "cancel_B2.png", dir.path()).unwrap();

        let file = dir.path().join("qr").join("cancel_B2.png");
        assert_eq!(decode(&file), "http://other/api/mark-as-scanned/B2");
    }

    #[test]
    fn rejects_payload_over_qr_capacity() {
        let dir = tempdir().unwrap();
        let payload = "x".repeat(8000);

        let res = generate_qr(&payload, "too_big.png", dir.path());

        assert!(matches!(res, Err(QrGenerateError::Capacity(_))));
        assert!(!dir.path().join("qr").join("too_big.png").exists());
    }
}

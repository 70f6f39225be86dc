//! Attachment parsing

use std::fs;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::domain::mail::{Attachment, MailArgument};

/// Reads every attachment path into a base64 encoded [`Attachment`].
///
/// A scalar is split into one path per line. Paths that cannot be read are
/// dropped without error. Files whose type cannot be guessed from the name
/// are sent as `application/octet-stream`.
pub fn parse_attachments(attachments: MailArgument) -> Vec<Attachment> {
    attachments
        .into_list('\n')
        .iter()
        .filter_map(|path| read_attachment(path))
        .collect()
}

fn read_attachment(path: &str) -> Option<Attachment> {
    if path.is_empty() {
        return None;
    }

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            debug!(path, error = %e, "dropping unreadable attachment");
            return None;
        }
    };

    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    Some(Attachment {
        content_type: content_type.to_string(),
        filename: file_name(path),
        content: STANDARD.encode(data),
    })
}

/// Last path segment, treating both `/` and `\` as separators
fn file_name(path: &str) -> String {
    let normalized = path.replace('\\', "/");

    normalized
        .rsplit('/')
        .next()
        .unwrap_or(&normalized)
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::io::Result<String> {
        let path = dir.path().join(name);
        File::create(&path)?.write_all(content)?;

        Ok(path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_missing_file_is_dropped() -> TestResult {
        let dir = tempfile::tempdir()?;
        let real = write_file(&dir, "real.txt", b"hello")?;
        let missing = dir.path().join("missing.txt").to_string_lossy().into_owned();

        let attachments = parse_attachments(vec![real, missing].into());

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "real.txt");
        assert_eq!(attachments[0].content_type, "text/plain");
        assert_eq!(attachments[0].content, "aGVsbG8=");

        Ok(())
    }

    #[test]
    fn test_newline_separated_paths_keep_order() -> TestResult {
        let dir = tempfile::tempdir()?;
        let first = write_file(&dir, "report.pdf", b"%PDF")?;
        let second = write_file(&dir, "logo.png", &[0x89, 0x50, 0x4e, 0x47])?;

        let attachments = parse_attachments(format!("{}\r\n{}", first, second).into());

        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].filename, "report.pdf");
        assert_eq!(attachments[0].content_type, "application/pdf");
        assert_eq!(attachments[1].filename, "logo.png");
        assert_eq!(attachments[1].content_type, "image/png");

        Ok(())
    }

    #[test]
    fn test_untyped_readable_file_is_sent_as_octet_stream() -> TestResult {
        let dir = tempfile::tempdir()?;
        let upload = write_file(&dir, "phpA1B2C3", b"%PDF-1.4 hello")?;
        let readme = write_file(&dir, "README", b"plain text")?;

        let attachments = parse_attachments(vec![upload, readme].into());

        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].filename, "phpA1B2C3");
        assert_eq!(attachments[0].content_type, "application/octet-stream");
        assert_eq!(attachments[1].filename, "README");
        assert_eq!(attachments[1].content_type, "application/octet-stream");
        assert_eq!(attachments[1].content, "cGxhaW4gdGV4dA==");

        Ok(())
    }

    #[test]
    fn test_directory_is_dropped() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("folder.txt");
        fs::create_dir(&path)?;

        assert!(parse_attachments(path.to_string_lossy().into_owned().into()).is_empty());

        Ok(())
    }

    #[test]
    fn test_empty_argument_yields_no_attachments() {
        assert!(parse_attachments("".into()).is_empty());
        assert!(parse_attachments(MailArgument::default()).is_empty());
    }

    #[test]
    fn test_file_name_handles_both_separators() {
        assert_eq!(file_name("/var/uploads/a.txt"), "a.txt");
        assert_eq!(file_name("C:\\uploads\\b.txt"), "b.txt");
        assert_eq!(file_name("mixed\\dir/c.txt"), "c.txt");
        assert_eq!(file_name("plain.txt"), "plain.txt");
    }
}

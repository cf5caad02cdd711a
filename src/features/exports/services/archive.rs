use csv::Writer;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::error::{AppError, Result};
use crate::features::students::models::StudentRecord;

/// Download name of the export archive
pub const ARCHIVE_FILENAME: &str = "student_qr_codes_and_data.zip";

/// Name of the student table inside the archive
pub const CSV_ENTRY_NAME: &str = "student_data.csv";

const CSV_HEADER: [&str; 7] = [
    "Student Name",
    "Student ID",
    "Program",
    "Degree Obtained",
    "Issuer",
    "Issue Date",
    "QR Code Link",
];

fn students_csv(students: &[StudentRecord]) -> Result<Vec<u8>> {
    let csv_error = |e: csv::Error| AppError::Internal(format!("Failed to write export CSV: {}", e));

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for student in students {
        let student_id = student.student_id.to_string();
        let issue_date = student.issue_date.to_rfc3339();
        writer
            .write_record([
                student.student_name.as_str(),
                student_id.as_str(),
                student.programm.as_str(),
                student.degree_obtained.as_str(),
                student.issuer_name.as_str(),
                issue_date.as_str(),
                student.qr_code_link.as_deref().unwrap_or(""),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to write export CSV: {}", e)))
}

/// Build the export zip: one CSV row per student plus the given QR images.
///
/// `images` pairs an archive path with the image bytes.
pub fn build_export_archive(
    students: &[StudentRecord],
    images: &[(String, Vec<u8>)],
) -> Result<Vec<u8>> {
    let zip_error = |e: zip::result::ZipError| {
        AppError::Internal(format!("Failed to build export archive: {}", e))
    };
    let write_error =
        |e: std::io::Error| AppError::Internal(format!("Failed to build export archive: {}", e));

    let csv = students_csv(students)?;
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);

        zip.start_file(CSV_ENTRY_NAME, options).map_err(zip_error)?;
        zip.write_all(&csv).map_err(write_error)?;

        for (path, bytes) in images {
            zip.start_file(path.as_str(), options).map_err(zip_error)?;
            zip.write_all(bytes).map_err(write_error)?;
        }

        zip.finish().map_err(zip_error)?;
    }

    Ok(cursor.into_inner())
}

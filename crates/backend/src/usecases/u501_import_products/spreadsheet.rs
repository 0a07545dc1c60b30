use super::error::ImportError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use indexmap::IndexMap;
use std::io::Cursor;

/// Сырая строка файла: заголовок -> значение ячейки (в порядке колонок)
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// Физический номер строки (заголовок: строка 1)
    pub row_number: usize,
    pub cells: IndexMap<String, String>,
}

impl ImportRow {
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// Первый лист файла: заголовки и строки данных
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<ImportRow>,
}

enum FileKind {
    Csv,
    Workbook,
    Unknown,
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn detect_kind(file_name: &str, bytes: &[u8]) -> FileKind {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if extension == "csv" {
        return FileKind::Csv;
    }
    if bytes.starts_with(ZIP_MAGIC)
        || bytes.starts_with(OLE_MAGIC)
        || matches!(extension.as_str(), "xlsx" | "xlsm" | "xls" | "ods")
    {
        return FileKind::Workbook;
    }
    FileKind::Unknown
}

/// Прочитать первый лист файла. Первая строка: заголовки, пустые ячейки -> "".
/// Полностью пустые строки пропускаются.
pub fn read_sheet(file_name: &str, bytes: &[u8]) -> Result<SheetData, ImportError> {
    match detect_kind(file_name, bytes) {
        FileKind::Csv => read_csv(bytes),
        FileKind::Workbook => read_workbook(bytes),
        FileKind::Unknown => {
            if std::str::from_utf8(bytes).is_ok() {
                read_csv(bytes)
            } else {
                Err(ImportError::Parse(format!(
                    "Unsupported file format: {}",
                    file_name
                )))
            }
        }
    }
}

fn build_rows(headers: &[String], data: Vec<(usize, Vec<String>)>) -> Vec<ImportRow> {
    data.into_iter()
        .filter_map(|(row_number, values)| {
            let mut cells = IndexMap::with_capacity(headers.len());
            for (idx, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let value = values.get(idx).cloned().unwrap_or_default();
                cells.entry(header.clone()).or_insert(value);
            }
            let row = ImportRow { row_number, cells };
            (!row.is_blank()).then_some(row)
        })
        .collect()
}

fn finish(headers: Vec<String>, data: Vec<(usize, Vec<String>)>) -> Result<SheetData, ImportError> {
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::Parse("File has no header row".into()));
    }
    let rows = build_rows(&headers, data);
    Ok(SheetData { headers, rows })
}

fn read_csv(bytes: &[u8]) -> Result<SheetData, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Parse(format!("Failed to read CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut data = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| ImportError::Parse(format!("Failed to read CSV row: {}", e)))?;
        // номер записи, а не строки текста: ячейка в кавычках может занимать несколько строк
        data.push((idx + 2, record.iter().map(str::to_string).collect()));
    }

    finish(headers, data)
}

fn read_workbook(bytes: &[u8]) -> Result<SheetData, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Parse(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Parse("Workbook has no sheets".into()))?
        .map_err(|e| ImportError::Parse(format!("Failed to read first sheet: {}", e)))?;

    // Range начинается с первой непустой ячейки
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(|c| cell_to_string(c).trim().to_string()).collect(),
        None => return Err(ImportError::Parse("File has no header row".into())),
    };

    let data = rows
        .enumerate()
        .map(|(idx, cells)| {
            // +1 за заголовок, +1 за нумерацию с единицы
            let row_number = first_row + idx + 2;
            (row_number, cells.iter().map(cell_to_string).collect())
        })
        .collect();

    finish(headers, data)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Целые значения без ".0"
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_basic() {
        let data = b"title,sku,price.list\nRed Mug,MUG-1,100\nBlue Mug,,50\n";
        let sheet = read_sheet("products.csv", data).unwrap();
        assert_eq!(sheet.headers, vec!["title", "sku", "price.list"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].row_number, 2);
        assert_eq!(sheet.rows[0].cells["title"], "Red Mug");
        assert_eq!(sheet.rows[1].row_number, 3);
        assert_eq!(sheet.rows[1].cells["sku"], "");
    }

    #[test]
    fn test_csv_bom_and_short_rows() {
        let data = "\u{feff}Title,SKU,Category\nMug,M1\n".as_bytes();
        let sheet = read_sheet("x.csv", data).unwrap();
        assert_eq!(sheet.headers[0], "Title");
        assert_eq!(sheet.rows[0].cells["Category"], "");
    }

    #[test]
    fn test_blank_rows_skipped_keep_physical_numbers() {
        let data = b"title,sku\nA,1\n,\nB,2\n";
        let sheet = read_sheet("x.csv", data).unwrap();
        let numbers: Vec<usize> = sheet.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 4]);
    }

    #[test]
    fn test_multiline_quoted_cell_keeps_record_numbers() {
        let data = b"title,description\nA,\"line1\nline2\nline3\"\nB,x\n";
        let sheet = read_sheet("x.csv", data).unwrap();
        let numbers: Vec<usize> = sheet.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(sheet.rows[0].cells["description"], "line1\nline2\nline3");
    }

    #[test]
    fn test_unknown_extension_utf8_falls_back_to_csv() {
        let sheet = read_sheet("upload.txt", b"title\nMug\n").unwrap();
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn test_binary_garbage_is_parse_error() {
        let result = read_sheet("upload.bin", &[0xff, 0xfe, 0x00, 0x81]);
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_corrupt_xlsx_is_parse_error() {
        let result = read_sheet("products.xlsx", b"PK\x03\x04not really a zip");
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let result = read_sheet("empty.csv", b"");
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(100.0)), "100");
        assert_eq!(cell_to_string(&Data::Float(19.99)), "19.99");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}

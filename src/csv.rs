//! CSV export and import for catalog records.
//!
//! The interchange format matches what the catalog table shows: one row per
//! product with Chinese column headers, prices fixed to two decimals, and a
//! UTF-8 BOM so spreadsheet software picks the right encoding. Fields
//! containing commas, quotes or newlines are quoted with doubled inner
//! quotes; the importer understands the same quoting, including newlines
//! inside quoted fields (specifications are newline-joined).

use crate::error::CsvError;
use crate::store::ProductRecord;

/// Byte-order mark prepended to exports for spreadsheet compatibility.
const BOM: char = '\u{feff}';

/// Export column headers, in order.
pub const EXPORT_HEADERS: [&str; 10] = [
    "ID",
    "產品標題",
    "品牌",
    "類型",
    "價格",
    "規格",
    "日期",
    "備註",
    "創建時間",
    "網址",
];

/// Import errors collected per row; a bad row never aborts the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based row number in the input, header excluded
    pub row: usize,
    pub message: String,
}

/// Outcome of an import: the usable records plus whatever went wrong.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub records: Vec<ProductRecord>,
    pub errors: Vec<RowError>,
}

/// Serializes records to CSV.
pub fn export_records(records: &[ProductRecord]) -> Result<String, CsvError> {
    if records.is_empty() {
        return Err(CsvError::Empty);
    }

    let mut out = String::new();
    out.push(BOM);
    out.push_str(&EXPORT_HEADERS.join(","));

    for record in records {
        let fields = [
            record.id.map(|id| id.to_string()).unwrap_or_default(),
            record.title.clone(),
            record.brand.clone(),
            record.category.clone(),
            format!("{:.2}", record.price),
            record.specification.clone().unwrap_or_default(),
            record.date.clone(),
            record.remark.clone().unwrap_or_default(),
            record.created_at.clone().unwrap_or_default(),
            record.url.clone(),
        ];

        out.push('\n');
        out.push_str(
            &fields
                .iter()
                .map(|field| escape_field(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    Ok(out)
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parses CSV text back into records.
///
/// The header row maps columns by name, so column order and optional
/// columns do not matter. Title, brand, category and price are required;
/// rows missing them are reported in the outcome instead of failing the
/// whole import.
pub fn import_records(text: &str) -> Result<ImportOutcome, CsvError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rows = split_rows(text).into_iter();

    let header = rows.next().ok_or(CsvError::MissingHeader)?;
    let column = |name: &str| header.iter().position(|h| h.trim() == name);

    let title_at = column("產品標題").ok_or_else(|| CsvError::MissingColumn("產品標題".into()))?;
    let brand_at = column("品牌").ok_or_else(|| CsvError::MissingColumn("品牌".into()))?;
    let category_at = column("類型").ok_or_else(|| CsvError::MissingColumn("類型".into()))?;
    let price_at = column("價格").ok_or_else(|| CsvError::MissingColumn("價格".into()))?;
    let spec_at = column("規格");
    let date_at = column("日期");
    let remark_at = column("備註");
    let url_at = column("網址").or_else(|| column("地址"));

    let mut outcome = ImportOutcome::default();

    for (index, fields) in rows.enumerate() {
        let row = index + 1;
        if fields.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let at = |position: Option<usize>| -> String {
            position
                .and_then(|p| fields.get(p))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let title = at(Some(title_at));
        if title.is_empty() {
            outcome.errors.push(RowError {
                row,
                message: "missing title".to_string(),
            });
            continue;
        }

        let price_field = at(Some(price_at));
        let price = match price_field.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                outcome.errors.push(RowError {
                    row,
                    message: format!("invalid price: {:?}", price_field),
                });
                continue;
            }
        };

        let date = {
            let value = at(date_at);
            if value.is_empty() {
                chrono::Local::now().format("%Y-%m-%d").to_string()
            } else {
                value
            }
        };

        outcome.records.push(ProductRecord {
            id: None,
            url: at(url_at),
            title,
            brand: at(Some(brand_at)),
            category: at(Some(category_at)),
            price,
            specification: non_empty(at(spec_at)),
            date,
            remark: non_empty(at(remark_at)),
            created_at: None,
        });
    }

    Ok(outcome)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Splits CSV text into rows of fields, honoring quoted fields that may
/// contain delimiters, doubled quotes and newlines.
fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                rows.push(std::mem::take(&mut fields));
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        rows.push(fields);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ProductRecord {
        ProductRecord {
            id: Some(1),
            url: "https://item.jd.com/123456.html".to_string(),
            title: "感冒灵颗粒".to_string(),
            brand: "三九".to_string(),
            category: "藥用".to_string(),
            price: 30.0,
            specification: Some("净含量: 120g\n颜色: 白色".to_string()),
            date: "2025-06-01".to_string(),
            remark: None,
            created_at: Some("2025-06-01 10:00:00".to_string()),
        }
    }

    mod succeeds {
        use super::*;

        #[test]
        fn test_export_header_and_bom() {
            let csv = export_records(&[sample_record()]).unwrap();
            assert!(csv.starts_with('\u{feff}'));
            assert!(csv.contains("ID,產品標題,品牌,類型,價格,規格,日期,備註,創建時間,網址"));
        }

        #[test]
        fn test_export_formats_price_to_two_decimals() {
            let csv = export_records(&[sample_record()]).unwrap();
            assert!(csv.contains("30.00"));
        }

        #[test]
        fn test_export_quotes_embedded_newlines() {
            let csv = export_records(&[sample_record()]).unwrap();
            assert!(csv.contains("\"净含量: 120g\n颜色: 白色\""));
        }

        #[test]
        fn test_export_escapes_quotes_and_commas() {
            let mut record = sample_record();
            record.title = "牙膏, \"清火\"款".to_string();
            let csv = export_records(&[record]).unwrap();
            assert!(csv.contains("\"牙膏, \"\"清火\"\"款\""));
        }

        #[test]
        fn test_round_trip() {
            let exported = export_records(&[sample_record()]).unwrap();
            let outcome = import_records(&exported).unwrap();

            assert!(outcome.errors.is_empty());
            assert_eq!(outcome.records.len(), 1);
            let imported = &outcome.records[0];
            assert_eq!(imported.title, "感冒灵颗粒");
            assert_eq!(imported.brand, "三九");
            assert_eq!(imported.category, "藥用");
            assert_eq!(imported.price, 30.0);
            assert_eq!(
                imported.specification.as_deref(),
                Some("净含量: 120g\n颜色: 白色")
            );
            assert_eq!(imported.url, "https://item.jd.com/123456.html");
        }

        #[test]
        fn test_import_defaults_missing_date() {
            let csv = "產品標題,品牌,類型,價格\n感冒灵,三九,藥用,30.00";
            let outcome = import_records(csv).unwrap();
            assert_eq!(outcome.records.len(), 1);
            assert!(!outcome.records[0].date.is_empty());
        }

        #[test]
        fn test_import_collects_row_errors_without_aborting() {
            let csv = "產品標題,品牌,類型,價格\n\
                       感冒灵,三九,藥用,30.00\n\
                       ,缺标题,藥用,10.00\n\
                       牙膏,高露洁,衞浴,not-a-price";
            let outcome = import_records(csv).unwrap();

            assert_eq!(outcome.records.len(), 1);
            assert_eq!(outcome.errors.len(), 2);
            assert_eq!(outcome.errors[0].row, 2);
            assert!(outcome.errors[1].message.contains("invalid price"));
        }

        #[test]
        fn test_import_skips_blank_rows() {
            let csv = "產品標題,品牌,類型,價格\n感冒灵,三九,藥用,30.00\n,,,\n";
            let outcome = import_records(csv).unwrap();
            assert_eq!(outcome.records.len(), 1);
            assert!(outcome.errors.is_empty());
        }

        #[test]
        fn test_import_accepts_legacy_address_header() {
            let csv = "產品標題,品牌,類型,價格,地址\n感冒灵,三九,藥用,30.00,https://a.example";
            let outcome = import_records(csv).unwrap();
            assert_eq!(outcome.records[0].url, "https://a.example");
        }

        #[test]
        fn test_split_rows_handles_crlf() {
            let rows = split_rows("a,b\r\nc,d\r\n");
            assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_export_empty_records() {
            let err = export_records(&[]).unwrap_err();
            assert!(matches!(err, CsvError::Empty));
        }

        #[test]
        fn test_import_empty_text() {
            let err = import_records("").unwrap_err();
            assert!(matches!(err, CsvError::MissingHeader));
        }

        #[test]
        fn test_import_missing_required_column() {
            let err = import_records("產品標題,品牌,價格\nA,B,1.00").unwrap_err();
            assert!(matches!(err, CsvError::MissingColumn(col) if col == "類型"));
        }
    }
}

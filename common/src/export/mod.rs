pub mod sheet_name;
#[cfg(feature = "excel")]
pub mod report_core;

/// 列幅を算出（ヘッダーを含む最長表示文字数 + 余白）
pub fn column_widths(header: &[String], rows: &[Vec<String>], padding: usize) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let longest = rows
                .iter()
                .filter_map(|r| r.get(col))
                .map(|v| v.chars().count())
                .max()
                .unwrap_or(0);
            longest.max(name.chars().count()) + padding
        })
        .collect()
}

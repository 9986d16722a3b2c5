mod common;

use common::{HEADER, sample_rows, write_csv, write_xlsx};
use dashpage::error::LoadError;
use dashpage::loader::{LoadOptions, load_sales, read_sheet};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::tempdir;

#[test]
fn test_load_workbook_with_title_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("supermarket_sales.xlsx");
    write_xlsx(&path, "销售数据", &HEADER, &sample_rows());

    let table = load_sales(&LoadOptions::new(&path)).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.columns, HEADER.map(String::from).to_vec());
    let hours: Vec<u8> = table.records.iter().map(|r| r.hour).collect();
    assert_eq!(hours, vec![10, 11, 10]);
    assert_eq!(table.records[1].city, "大同");
    assert_eq!(table.records[1].total_price, 20.0);
    println!("✓ Workbook loaded past its title row");
}

#[test]
fn test_header_whitespace_is_stripped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("padded.xlsx");
    let mut header = HEADER.to_vec();
    header[1] = " 城市 ";
    header[5] = "总价\t";
    write_xlsx(&path, "销售数据", &header, &sample_rows());

    let table = load_sales(&LoadOptions::new(&path)).unwrap();

    assert_eq!(table.columns[1], "城市");
    assert_eq!(table.columns[5], "总价");
    assert_eq!(table.len(), 3);
    println!("✓ Padded headers matched after stripping");
}

#[test]
fn test_missing_sheet_falls_back_to_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("other_sheet.xlsx");
    write_xlsx(&path, "Sheet1", &HEADER, &sample_rows());

    let table = load_sales(&LoadOptions::new(&path)).unwrap();

    assert_eq!(table.len(), 3);
    println!("✓ First sheet used when 销售数据 is absent");
}

#[test]
fn test_missing_columns_are_named() {
    let dir = tempdir().unwrap();
    let header: Vec<&str> = HEADER.iter().copied().filter(|h| *h != "评分").collect();
    let rows: Vec<Vec<&str>> = sample_rows()
        .into_iter()
        .map(|mut row| {
            row.remove(6);
            row
        })
        .collect();
    let path = write_csv(dir.path(), "no_rating.csv", true, &header, &rows);

    match load_sales(&LoadOptions::new(&path)) {
        Err(LoadError::MissingColumns(missing)) => assert_eq!(missing, vec!["评分".to_string()]),
        other => panic!("expected MissingColumns, got {:?}", other),
    }
    println!("✓ Missing 评分 column reported");
}

#[test]
fn test_missing_file_lists_directory() {
    let dir = tempdir().unwrap();
    write_csv(dir.path(), "other.csv", true, &HEADER, &sample_rows());
    let path = dir.path().join("supermarket_sales.xlsx");

    let err = load_sales(&LoadOptions::new(&path)).unwrap_err();

    match &err {
        LoadError::MissingFile { path: missing, listing } => {
            assert_eq!(missing, &path);
            assert_eq!(listing, &vec!["other.csv".to_string()]);
        }
        other => panic!("expected MissingFile, got {:?}", other),
    }
    assert!(!err.hints().is_empty());
    println!("✓ Missing file reported with directory listing");
}

#[test]
fn test_relative_path_found_under_search_root() {
    let dir = tempdir().unwrap();
    write_csv(dir.path(), "search_root_fixture_sales.csv", true, &HEADER, &sample_rows());

    let mut options = LoadOptions::new("search_root_fixture_sales.csv");
    options.search_roots = vec![dir.path().to_path_buf()];

    assert_eq!(load_sales(&options).unwrap().len(), 3);
    println!("✓ Relative path resolved against search root");
}

#[test]
fn test_hour_minute_fallback_only_when_all_fail() {
    let dir = tempdir().unwrap();

    let short_rows = vec![
        vec!["1", "太原", "会员", "女性", "食品饮料", "10", "8", "09:30"],
        vec!["2", "大同", "普通", "男性", "电子配件", "20", "6", "14:05"],
    ];
    let path = write_csv(dir.path(), "short.csv", true, &HEADER, &short_rows);
    let table = load_sales(&LoadOptions::new(&path)).unwrap();
    let hours: Vec<u8> = table.records.iter().map(|r| r.hour).collect();
    assert_eq!(hours, vec![9, 14]);
    println!("✓ HH:MM column parsed after HH:MM:SS found nothing");

    let mixed_rows = vec![
        vec!["1", "太原", "会员", "女性", "食品饮料", "10", "8", "09:30:00"],
        vec!["2", "大同", "普通", "男性", "电子配件", "20", "6", "14:05"],
    ];
    let path = write_csv(dir.path(), "mixed.csv", true, &HEADER, &mixed_rows);
    let table = load_sales(&LoadOptions::new(&path)).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].hour, 9);
    println!("✓ Mixed column keeps HH:MM:SS and drops the HH:MM row");
}

#[test]
fn test_incomplete_rows_are_dropped() {
    let dir = tempdir().unwrap();
    let rows = vec![
        vec!["1", "太原", "会员", "女性", "食品饮料", "10", "8", "10:15:00"],
        vec!["2", "大同", "普通", "男性", "电子配件", "", "6", "11:20:00"],
        vec!["3", "太原", "普通", "女性", "电子配件", "15", "", "10:45:00"],
        vec!["4", "太原", "普通", "女性", "电子配件", "15", "7", "late"],
        vec!["5", "大同", "会员", "男性", "健康美容", "30", "9", "18:00:00"],
    ];
    let path = dir.path().join("gaps.xlsx");
    write_xlsx(&path, "销售数据", &HEADER, &rows);

    let table = load_sales(&LoadOptions::new(&path)).unwrap();

    let ids: Vec<&str> = table.records.iter().map(|r| r.order_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "5"]);
    println!("✓ Rows without price, rating or hour dropped in order");
}

#[test]
fn test_csv_without_title_row() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "plain.csv", false, &HEADER, &sample_rows());

    let mut options = LoadOptions::new(&path);
    options.skip_rows = 0;
    let table = load_sales(&options).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.records[2].rating, 7.0);
    println!("✓ CSV read with skip_rows = 0");
}

#[test]
fn test_read_sheet_keeps_extra_columns() {
    let dir = tempdir().unwrap();
    let mut header = HEADER.to_vec();
    header.push("备注");
    let rows: Vec<Vec<&str>> = sample_rows()
        .into_iter()
        .map(|mut row| {
            row.push("ok");
            row
        })
        .collect();
    let path = write_csv(dir.path(), "extra.csv", true, &header, &rows);

    let sheet = read_sheet(&LoadOptions::new(&path)).unwrap();
    assert_eq!(sheet.headers.last().map(String::as_str), Some("备注"));

    let table = load_sales(&LoadOptions::new(&path)).unwrap();
    let columns = table.display_columns();
    assert_eq!(columns[8], "备注");
    assert_eq!(columns[9], "小时数");
    assert_eq!(table.display_rows()[0][8], "ok");
    assert_eq!(table.display_rows()[0][9], "10");
    println!("✓ Raw view keeps every source column plus 小时数");
}

#[test]
fn test_native_excel_times_count_as_full_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("native_times.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("销售数据").unwrap();
    worksheet.write_string(0, 0, "超市销售数据").unwrap();
    for (c, name) in HEADER.iter().enumerate() {
        worksheet.write_string(1, c as u16, *name).unwrap();
    }

    let time_format = Format::new().set_num_format("hh:mm:ss");
    let rows = [("1", 9, 15), ("2", 14, 15), ("3", 0, 0)];
    for (i, (order_id, hour, minute)) in rows.iter().enumerate() {
        let r = (i + 2) as u32;
        worksheet.write_string(r, 0, *order_id).unwrap();
        worksheet.write_string(r, 1, "太原").unwrap();
        worksheet.write_string(r, 2, "会员").unwrap();
        worksheet.write_string(r, 3, "女性").unwrap();
        worksheet.write_string(r, 4, "食品饮料").unwrap();
        worksheet.write_number(r, 5, 10.0).unwrap();
        worksheet.write_number(r, 6, 8.0).unwrap();
        if *order_id == "3" {
            // text without seconds in a column that already parsed
            worksheet.write_string(r, 7, "16:30").unwrap();
        } else {
            let time = ExcelDateTime::from_hms(*hour, *minute, 0).unwrap();
            worksheet
                .write_datetime_with_format(r, 7, &time, &time_format)
                .unwrap();
        }
    }
    workbook.save(&path).unwrap();

    let table = load_sales(&LoadOptions::new(&path)).unwrap();

    let hours: Vec<u8> = table.records.iter().map(|r| r.hour).collect();
    let times: Vec<&str> = table.records.iter().map(|r| r.time.as_str()).collect();
    assert_eq!(hours, vec![9, 14]);
    assert_eq!(times, vec!["09:15:00", "14:15:00"]);
    println!("✓ Native time cells parsed, HH:MM text row dropped");
}

#![cfg(feature = "parallel")]

mod common;

use common::{numbered_grid, single_sheet_snapshot};
use rayon::ThreadPoolBuilder;
use workbook_history::{CellData, DiffConfig, RowData, Snapshot, compare_versions};

fn run_in_pool<T>(threads: usize, f: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .expect("build pool");
    pool.install(f)
}

fn evolving_versions(count: usize) -> Vec<Snapshot> {
    let mut rows = numbered_grid(500, 10, 0);
    let mut versions = vec![single_sheet_snapshot("s1", "Data", rows.clone())];
    for v in 1..count {
        let target = (v * 37) % rows.len();
        rows[target].cells[v % 10] = CellData::value(format!("edit{v}").as_str());
        rows[target] = RowData::new(rows[target].cells.clone());
        if v % 3 == 0 {
            rows.insert(v * 11, RowData::new(vec![CellData::value(v as f64 * -1.0)]));
        }
        versions.push(single_sheet_snapshot("s1", "Data", rows.clone()));
    }
    versions
}

#[test]
fn reports_are_identical_across_thread_counts() {
    let versions = evolving_versions(12);
    let config = DiffConfig::default();

    let report_1 = run_in_pool(1, || compare_versions(&versions, &config).expect("diff"));
    let report_4 = run_in_pool(4, || compare_versions(&versions, &config).expect("diff"));

    assert_eq!(report_1, report_4);
    assert!(report_1.has_changes());
}

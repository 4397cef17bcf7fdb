use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const RUNS_DIR: &str = ".bench_runs";
const KEEP_RUNS: usize = 50;

/// Nearest ancestor of the working directory holding a `Cargo.toml`.
pub fn find_project_root() -> io::Result<PathBuf> {
    let start = std::env::current_dir()?;
    let mut dir = start.clone();
    loop {
        if dir.join("Cargo.toml").exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Ok(start);
        }
    }
}

pub fn runs_dir() -> io::Result<PathBuf> {
    Ok(find_project_root()?.join(RUNS_DIR))
}

/// Write `json` as `<timestamp>.json` and `latest.json`, returning the
/// path of `latest.json`.
pub fn save_run(timestamp: &str, json: &str) -> io::Result<PathBuf> {
    let dir = runs_dir()?;
    fs::create_dir_all(&dir)?;

    fs::write(dir.join(format!("{}.json", timestamp)), json)?;
    let latest = dir.join("latest.json");
    fs::write(&latest, json)?;

    cleanup_old_runs(&dir, KEEP_RUNS)?;
    Ok(latest)
}

/// Timestamped run files, oldest first.
pub fn list_runs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension().map(|x| x == "json").unwrap_or(false)
                && p.file_stem().map(|s| s != "latest").unwrap_or(false)
        })
        .collect();
    // Unix-second names of equal length sort chronologically
    files.sort();
    Ok(files)
}

fn cleanup_old_runs(dir: &Path, keep: usize) -> io::Result<()> {
    let files = list_runs(dir)?;
    if files.len() <= keep {
        return Ok(());
    }
    let to_remove = files.len() - keep;
    for path in files.into_iter().take(to_remove) {
        let _ = fs::remove_file(path);
    }
    Ok(())
}

/// Unix seconds (for file names) and a UTC `YYYY-MM-DDTHH:MM:SSZ` string.
pub fn get_timestamps() -> (String, String) {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let time_of_day = secs % 86_400;
    let human = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    );

    (secs.to_string(), human)
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

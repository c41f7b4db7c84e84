// Source file ingestion and normalization into a `DeliveryLedger`.
//
// Reads Cricsheet-style ball-by-ball CSV files (one match per file). The
// corpus is externally produced, so a bad file is skipped with a recorded
// reason instead of failing the whole load.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::delivery::{parse_ball_position, Delivery, DeliveryLedger, WicketType};

/// Default number of source files considered per load.
pub const DEFAULT_MAX_FILES: usize = 150;
/// Most runs off the bat one delivery can credit (six plus overthrows).
pub const MAX_RUNS_OFF_BAT: u32 = 8;

/// Columns every accepted file must carry.
const REQUIRED_COLUMNS: &[&str] = &["striker", "bowler"];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One raw source: a file name plus its bytes, or the reason it could not be
/// read.
#[derive(Debug)]
pub struct SourceFile {
    pub name: String,
    pub contents: Result<Vec<u8>, String>,
}

impl SourceFile {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        SourceFile {
            name: name.into(),
            contents: Ok(bytes.into()),
        }
    }

    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            contents: Err(reason.into()),
        }
    }
}

/// Why a source file was left out of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("not a ball-by-ball match file")]
    NotMatchFile,

    #[error("unreadable: {0}")]
    Unreadable(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("row {line}: empty striker or bowler")]
    MissingPlayer { line: u64 },

    #[error("row {line}: {runs} runs off the bat from one ball")]
    ImplausibleRuns { line: u64, runs: u32 },
}

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Accepted { name: String, rows: usize },
    Skipped { name: String, reason: SkipReason },
}

impl FileOutcome {
    pub fn name(&self) -> &str {
        match self {
            FileOutcome::Accepted { name, .. } | FileOutcome::Skipped { name, .. } => name,
        }
    }
}

/// Per-file outcomes of one ledger build, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub outcomes: Vec<FileOutcome>,
}

impl IngestReport {
    pub fn accepted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Accepted { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Skipped { name, reason } => Some((name.as_str(), reason)),
            FileOutcome::Accepted { .. } => None,
        })
    }
}

/// A built ledger together with the report of how it was built.
#[derive(Debug, Clone, Default)]
pub struct LedgerBuild {
    pub ledger: DeliveryLedger,
    pub report: IngestReport,
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private): Cricsheet format
// ---------------------------------------------------------------------------

/// Cricsheet ball-by-ball row. Only `striker` and `bowler` are mandatory;
/// other columns fall back to defaults and extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawDelivery {
    #[serde(default)]
    match_id: String,
    #[serde(default)]
    innings: u32,
    #[serde(default)]
    ball: Option<String>,
    striker: String,
    bowler: String,
    #[serde(default)]
    runs_off_bat: u32,
    #[serde(default)]
    extras: u32,
    #[serde(default)]
    wicket_type: Option<String>,
}

// ---------------------------------------------------------------------------
// File filtering and parsing
// ---------------------------------------------------------------------------

/// True when the file name looks like a per-match ball-by-ball CSV rather
/// than a metadata (`*_info.csv`) or README file.
pub fn is_match_file(name: &str) -> bool {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let lower = base.to_ascii_lowercase();
    lower.ends_with(".csv") && !lower.contains("info") && !lower.contains("readme")
}

fn parse_from_reader<R: Read>(rdr: R) -> Result<Vec<Delivery>, SkipReason> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| SkipReason::Csv(e.to_string()))?
        .clone();
    for &column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SkipReason::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawDelivery>() {
        let raw = result.map_err(|e| SkipReason::Csv(e.to_string()))?;
        let line = rows.len() as u64 + 2;
        if raw.striker.is_empty() || raw.bowler.is_empty() {
            return Err(SkipReason::MissingPlayer { line });
        }
        if raw.runs_off_bat > MAX_RUNS_OFF_BAT {
            return Err(SkipReason::ImplausibleRuns {
                line,
                runs: raw.runs_off_bat,
            });
        }
        let (over, ball_in_over) = match raw.ball.as_deref().map(parse_ball_position) {
            Some(Some(position)) => position,
            Some(None) | None => {
                debug!("row {line}: no usable ball position, phase unknown");
                (0, 0)
            }
        };
        rows.push(Delivery {
            match_id: raw.match_id,
            innings: raw.innings,
            over,
            ball_in_over,
            striker: raw.striker,
            bowler: raw.bowler,
            runs_off_bat: raw.runs_off_bat,
            extras: raw.extras,
            wicket_type: raw.wicket_type.as_deref().and_then(WicketType::parse),
        });
    }
    Ok(rows)
}

/// Parse one source into deliveries, or the reason it must be skipped.
pub fn parse_source(source: &SourceFile) -> Result<Vec<Delivery>, SkipReason> {
    if !is_match_file(&source.name) {
        return Err(SkipReason::NotMatchFile);
    }
    let bytes = source
        .contents
        .as_ref()
        .map_err(|e| SkipReason::Unreadable(e.clone()))?;
    parse_from_reader(bytes.as_slice())
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Build a ledger from the first `max_files` sources.
///
/// Accepted files are concatenated in input order without de-duplication.
/// Zero accepted files yields an empty ledger.
pub fn normalize<I>(sources: I, max_files: usize) -> LedgerBuild
where
    I: IntoIterator<Item = SourceFile>,
{
    let mut deliveries = Vec::new();
    let mut report = IngestReport::default();

    for source in sources.into_iter().take(max_files) {
        match parse_source(&source) {
            Ok(rows) => {
                debug!("accepted {} ({} rows)", source.name, rows.len());
                report.outcomes.push(FileOutcome::Accepted {
                    name: source.name,
                    rows: rows.len(),
                });
                deliveries.extend(rows);
            }
            Err(SkipReason::NotMatchFile) => {
                debug!("ignoring non-match file {}", source.name);
                report.outcomes.push(FileOutcome::Skipped {
                    name: source.name,
                    reason: SkipReason::NotMatchFile,
                });
            }
            Err(reason) => {
                warn!("skipping {}: {}", source.name, reason);
                report.outcomes.push(FileOutcome::Skipped {
                    name: source.name,
                    reason,
                });
            }
        }
    }

    info!(
        "ledger built: {} deliveries from {} files ({} skipped)",
        deliveries.len(),
        report.accepted_count(),
        report.skipped_count()
    );

    LedgerBuild {
        ledger: DeliveryLedger::new(deliveries),
        report,
    }
}

/// List `dir`, sort entries by file name and read the first `max_files`
/// regular files. A file that cannot be read is returned as unreadable so
/// the normalizer can record it.
pub fn read_source_dir(dir: &Path, max_files: usize) -> std::io::Result<Vec<SourceFile>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let sources = paths
        .into_iter()
        .take(max_files)
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match std::fs::read(&path) {
                Ok(bytes) => SourceFile::from_bytes(name, bytes),
                Err(e) => SourceFile::unreadable(name, e.to_string()),
            }
        })
        .collect();
    Ok(sources)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "match_id,season,start_date,venue,innings,ball,batting_team,bowling_team,striker,non_striker,bowler,runs_off_bat,extras,wides,noballs,byes,legbyes,penalty,wicket_type,player_dismissed,other_wicket_type,other_player_dismissed";

    fn match_csv(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for row in rows {
            s.push('\n');
            s.push_str(row);
        }
        s
    }

    fn row(ball: &str, striker: &str, bowler: &str, runs: u32, wicket: &str) -> String {
        format!(
            "1082591,2017,2017-04-05,Rajiv Gandhi International Stadium,1,{ball},Sunrisers Hyderabad,Royal Challengers Bangalore,{striker},S Dhawan,{bowler},{runs},0,,,,,,{wicket},,,"
        )
    }

    // -- File name filter --

    #[test]
    fn match_file_names() {
        assert!(is_match_file("1082591.csv"));
        assert!(is_match_file("t20s_csv/1082591.CSV"));
        assert!(!is_match_file("1082591_info.csv"));
        assert!(!is_match_file("README.txt"));
        assert!(!is_match_file("README.csv"));
        assert!(!is_match_file("1082591.json"));
    }

    // -- Row parsing --

    #[test]
    fn cricsheet_rows_parse() {
        let r1 = row("0.1", "DA Warner", "TS Mills", 0, "");
        let r2 = row("5.3", "DA Warner", "A Choudhary", 4, "");
        let r3 = row("17.2", "DA Warner", "TS Mills", 1, "caught");
        let csv = match_csv(&[&r1, &r2, &r3]);

        let rows = parse_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].match_id, "1082591");
        assert_eq!(rows[0].innings, 1);
        assert_eq!((rows[0].over, rows[0].ball_in_over), (1, 1));
        assert_eq!((rows[1].over, rows[1].ball_in_over), (6, 3));
        assert_eq!(rows[1].runs_off_bat, 4);
        assert_eq!(rows[1].bowler, "A Choudhary");
        assert_eq!(rows[0].wicket_type, None);
        assert_eq!(rows[2].wicket_type, Some(WicketType::Caught));
        assert_eq!(rows[2].over, 18);
    }

    #[test]
    fn minimal_columns_accepted() {
        let csv = "striker,bowler\nKohli,Starc\nKohli,Cummins";
        let rows = parse_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].runs_off_bat, 0);
        assert_eq!(rows[0].over, 0);
        assert_eq!(rows[1].bowler, "Cummins");
    }

    #[test]
    fn fields_are_trimmed() {
        let csv = "striker,bowler,ball,runs_off_bat\n  Kohli  , Starc ,1.2, 4";
        let rows = parse_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].striker, "Kohli");
        assert_eq!(rows[0].bowler, "Starc");
        assert_eq!(rows[0].runs_off_bat, 4);
    }

    #[test]
    fn malformed_ball_keeps_row_without_phase() {
        let csv = "striker,bowler,ball,runs_off_bat\nKohli,Starc,??,2";
        let rows = parse_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].over, 0);
        assert_eq!(rows[0].runs_off_bat, 2);
    }

    #[test]
    fn header_only_file_is_accepted_empty() {
        let rows = parse_from_reader(HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    // -- File rejection --

    #[test]
    fn missing_bowler_column_rejected() {
        let csv = "striker,runs_off_bat\nKohli,4";
        assert_eq!(
            parse_from_reader(csv.as_bytes()).unwrap_err(),
            SkipReason::MissingColumn("bowler")
        );
    }

    #[test]
    fn negative_runs_reject_file() {
        let csv = "striker,bowler,runs_off_bat\nKohli,Starc,4\nKohli,Starc,-1";
        assert!(matches!(
            parse_from_reader(csv.as_bytes()),
            Err(SkipReason::Csv(_))
        ));
    }

    #[test]
    fn implausible_runs_reject_file() {
        let csv = "striker,bowler,runs_off_bat\nKohli,Starc,4000000000\nKohli,Starc,4000000000";
        assert_eq!(
            parse_from_reader(csv.as_bytes()).unwrap_err(),
            SkipReason::ImplausibleRuns {
                line: 2,
                runs: 4_000_000_000
            }
        );

        let build = normalize(vec![SourceFile::from_bytes("9.csv", csv)], DEFAULT_MAX_FILES);
        assert!(build.ledger.is_empty());
        assert_eq!(build.report.skipped_count(), 1);
    }

    #[test]
    fn eight_off_one_ball_is_accepted() {
        let csv = "striker,bowler,runs_off_bat\nKohli,Starc,8";
        let rows = parse_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].runs_off_bat, MAX_RUNS_OFF_BAT);
    }

    #[test]
    fn ragged_row_rejects_file() {
        let csv = "striker,bowler,runs_off_bat\nKohli,Starc,4\nKohli,Starc";
        assert!(matches!(
            parse_from_reader(csv.as_bytes()),
            Err(SkipReason::Csv(_))
        ));
    }

    #[test]
    fn empty_player_name_rejects_file() {
        let csv = "striker,bowler,runs_off_bat\nKohli,Starc,4\n,Starc,1";
        assert_eq!(
            parse_from_reader(csv.as_bytes()).unwrap_err(),
            SkipReason::MissingPlayer { line: 3 }
        );
    }

    #[test]
    fn unreadable_source_is_skipped() {
        let source = SourceFile::unreadable("9.csv", "permission denied");
        assert_eq!(
            parse_source(&source).unwrap_err(),
            SkipReason::Unreadable("permission denied".into())
        );
    }

    // -- Normalizer --

    #[test]
    fn good_file_plus_missing_bowler_file() {
        let good = match_csv(&[
            &row("0.1", "Kohli", "Starc", 1, ""),
            &row("0.2", "Kohli", "Starc", 4, ""),
        ]);
        let bad = "match_id,ball,striker,runs_off_bat\n1,0.1,Kohli,6";

        let build = normalize(
            vec![
                SourceFile::from_bytes("1.csv", good),
                SourceFile::from_bytes("2.csv", bad),
            ],
            DEFAULT_MAX_FILES,
        );

        assert_eq!(build.ledger.len(), 2);
        assert!(build.ledger.iter().all(|d| d.bowler == "Starc"));
        assert_eq!(build.report.accepted_count(), 1);
        assert_eq!(build.report.skipped_count(), 1);
        let skipped: Vec<_> = build.report.skipped().collect();
        assert_eq!(skipped, vec![("2.csv", &SkipReason::MissingColumn("bowler"))]);
    }

    #[test]
    fn files_concatenate_in_order_without_dedup() {
        let a = match_csv(&[&row("0.1", "Kohli", "Starc", 1, "")]);
        let b = match_csv(&[&row("0.1", "Rohit", "Starc", 2, "")]);

        let build = normalize(
            vec![
                SourceFile::from_bytes("a.csv", a.clone()),
                SourceFile::from_bytes("b.csv", b),
                SourceFile::from_bytes("c.csv", a),
            ],
            DEFAULT_MAX_FILES,
        );

        let strikers: Vec<&str> = build.ledger.iter().map(|d| d.striker.as_str()).collect();
        assert_eq!(strikers, vec!["Kohli", "Rohit", "Kohli"]);
    }

    #[test]
    fn info_and_readme_files_ignored() {
        let good = match_csv(&[&row("0.1", "Kohli", "Starc", 1, "")]);
        let build = normalize(
            vec![
                SourceFile::from_bytes("README.txt", "Cricsheet data"),
                SourceFile::from_bytes("1_info.csv", "version,1.0\ninfo,team,India"),
                SourceFile::from_bytes("1.csv", good),
            ],
            DEFAULT_MAX_FILES,
        );
        assert_eq!(build.ledger.len(), 1);
        assert_eq!(build.report.accepted_count(), 1);
        assert_eq!(build.report.outcomes[0].name(), "README.txt");
    }

    #[test]
    fn cap_limits_files_considered() {
        let sources = (0..5).map(|i| {
            SourceFile::from_bytes(
                format!("{i}.csv"),
                match_csv(&[&row("0.1", "Kohli", "Starc", 1, "")]),
            )
        });
        let build = normalize(sources, 3);
        assert_eq!(build.report.outcomes.len(), 3);
        assert_eq!(build.ledger.len(), 3);
    }

    #[test]
    fn nothing_accepted_gives_empty_ledger() {
        let build = normalize(
            vec![SourceFile::from_bytes("x.csv", "not,a\n\"broken")],
            DEFAULT_MAX_FILES,
        );
        assert!(build.ledger.is_empty());

        let build = normalize(Vec::new(), DEFAULT_MAX_FILES);
        assert!(build.ledger.is_empty());
        assert!(build.report.outcomes.is_empty());
    }
}

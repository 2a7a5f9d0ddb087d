//! Reading of the division records exported by the Commons votes portal.
//!
//! Every record is a small text file with a fixed layout:
//!
//! ```text
//! 0   Division: 441            <- division number (first run of digits)
//! 1   Date: 05/12/2018         <- day/month/year after the last colon
//! 2
//! 3   Title of the motion
//! 4
//! 5   Ayes: 311
//! 6   Noes: 293
//! 7..9 (ignored)
//! 10.. "Name","Party","Constituency","Aye","..."
//! ```

use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use snafu::prelude::*;

use crate::config::*;

const NUMBER_LINE: usize = 0;
const DATE_LINE: usize = 1;
const TITLE_LINE: usize = 3;
const AYE_LINE: usize = 5;
const NOES_LINE: usize = 6;
const FIRST_VOTE_LINE: usize = 10;
const VOTE_FIELDS: usize = 5;

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Parses the content of a full division record.
pub fn parse_division(content: &str) -> Result<Division, ParseError> {
    let lines: Vec<&str> = content.lines().collect();
    parse_division_lines(&lines)
}

/// Parses a division record that has already been split into lines.
pub fn parse_division_lines(lines: &[&str]) -> Result<Division, ParseError> {
    let division_nr = parse_division_number(line_at(lines, NUMBER_LINE, "division number")?)?;
    let date = parse_division_date(line_at(lines, DATE_LINE, "date")?)?;
    let title = clean_value(line_at(lines, TITLE_LINE, "title")?).to_string();
    let aye_count = parse_count(line_at(lines, AYE_LINE, "aye count")?, AYE_LINE)?;
    let noes_count = parse_count(line_at(lines, NOES_LINE, "noes count")?, NOES_LINE)?;
    let vote_lines: &[&str] = lines.get(FIRST_VOTE_LINE..).unwrap_or(&[]);
    let votes = parse_votes(vote_lines, division_nr)?;
    debug!(
        "parse_division_lines: division {} ({}) with {} votes",
        division_nr,
        date,
        votes.len()
    );
    Ok(Division {
        division_nr,
        date,
        title,
        aye_count,
        noes_count,
        votes,
    })
}

fn line_at<'a>(lines: &[&'a str], lineno: usize, what: &str) -> Result<&'a str, ParseError> {
    lines
        .get(lineno)
        .cloned()
        .context(MissingLineSnafu { lineno, what })
}

// Header values are sometimes exported between quotes.
fn clean_value(s: &str) -> &str {
    s.trim().trim_matches('"').trim()
}

// The value of a "label: value" line.
fn labeled_value(line: &str) -> &str {
    clean_value(line.rsplit(':').next().unwrap_or(line))
}

/// The division number: the first run of digits on the line.
pub fn parse_division_number(line: &str) -> Result<u32, ParseError> {
    let digits = DIGITS
        .find(line)
        .context(MissingDivisionNumberSnafu { line })?
        .as_str();
    digits
        .parse::<u32>()
        .context(DivisionNumberRangeSnafu { line })
}

pub fn parse_division_date(line: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(labeled_value(line), "%d/%m/%Y").context(InvalidDateSnafu { line })
}

pub fn parse_count(line: &str, lineno: usize) -> Result<u32, ParseError> {
    labeled_value(line)
        .parse::<u32>()
        .context(InvalidCountSnafu { lineno, line })
}

/// Parses the vote rows of a division.
///
/// A row that does not have exactly 5 fields makes the whole record invalid.
/// Blank rows are ignored.
pub fn parse_votes(vote_lines: &[&str], division_nr: u32) -> Result<Vec<VoteRecord>, ParseError> {
    let body = vote_lines.join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut res: Vec<VoteRecord> = Vec::new();
    for (idx, record_r) in rdr.records().enumerate() {
        let record = record_r.context(VoteRowSnafu {})?;
        // Line of the row in the record.
        let lineno = record
            .position()
            .map(|p| p.line() as usize - 1)
            .unwrap_or(idx)
            + FIRST_VOTE_LINE;
        let fields: Vec<&str> = record.iter().collect();
        ensure!(
            fields.len() == VOTE_FIELDS,
            VoteFieldCountSnafu {
                lineno,
                found: fields.len(),
                content: vote_lines
                    .get(lineno - FIRST_VOTE_LINE)
                    .cloned()
                    .unwrap_or_default()
            }
        );
        let vote = VoteRecord {
            id: format!("{:04}_{:03}", division_nr, idx + 1),
            name: fields[0].to_string(),
            party: fields[1].to_string(),
            constituency: fields[2].to_string(),
            decision: fields[3].to_string(),
            extra: fields[4].to_string(),
        };
        res.push(vote);
    }
    Ok(res)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(nr: u32, date: &str, title: &str, ayes: u32, noes: u32, rows: &[&str]) -> String {
        let mut lines: Vec<String> = vec![
            format!("Division: {}", nr),
            format!("Date: {}", date),
            "".to_string(),
            title.to_string(),
            "".to_string(),
            format!("Ayes: {}", ayes),
            format!("Noes: {}", noes),
            "".to_string(),
            "".to_string(),
            "\"Member\",\"Party\",\"Constituency\",\"Vote\",\"Proxy Vote\"".to_string(),
        ];
        lines.extend(rows.iter().map(|s| s.to_string()));
        lines.join("\n") + "\n"
    }

    pub(crate) fn row(name: &str, party: &str, decision: &str) -> String {
        format!(
            "\"{}\",\"{}\",\"{} Central\",\"{}\",\"\"",
            name, party, name, decision
        )
    }

    #[test]
    fn parses_well_formed_record() {
        let rows = vec![
            row("Diane Abbott", "Labour", "Aye"),
            row("Nigel Adams", "Conservative", "No"),
            row("Bim Afolami", "Conservative", "No"),
        ];
        let rows_s: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        let content = record(441, "05/12/2018", "European Union (Withdrawal) Act", 311, 293, &rows_s);

        let d = parse_division(&content).unwrap();
        assert_eq!(d.division_nr, 441);
        assert_eq!(d.date, NaiveDate::from_ymd_opt(2018, 12, 5).unwrap());
        assert_eq!(d.title, "European Union (Withdrawal) Act");
        assert_eq!(d.aye_count, 311);
        assert_eq!(d.noes_count, 293);
        assert_eq!(d.votes.len(), 3);
        assert!(d.passed());

        let first = d.vote("0441_001").unwrap();
        assert_eq!(first.name, "Diane Abbott");
        assert_eq!(first.party, "Labour");
        assert_eq!(first.constituency, "Diane Abbott Central");
        assert!(first.is_aye());
        assert_eq!(d.votes[2].id, "0441_003");
        assert_eq!(d.votes[1].decision(), Decision::No);
    }

    #[test]
    fn vote_ids_cover_every_row() {
        let rows: Vec<String> = (0..12)
            .map(|i| row(&format!("Member {}", i), "Labour", "Aye"))
            .collect();
        let rows_s: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        let content = record(7, "01/02/2019", "Title", 12, 0, &rows_s);

        let d = parse_division(&content).unwrap();
        let by_id = d.votes_by_id();
        assert_eq!(by_id.len(), 12);
        assert!(by_id.contains_key("0007_012"));
        for v in by_id.values() {
            assert_eq!(v.fields().len(), 5);
        }
    }

    #[test]
    fn rejects_rows_with_wrong_field_count() {
        for bad in [
            "\"A\",\"Labour\",\"Somewhere\",\"Aye\"",
            "\"A\",\"Labour\",\"Somewhere\",\"Aye\",\"\",\"extra\"",
        ] {
            let good = row("B", "Labour", "No");
            let content = record(3, "01/02/2019", "Title", 1, 1, &[good.as_str(), bad]);
            match parse_division(&content) {
                Err(ParseError::VoteFieldCount { lineno, .. }) => assert_eq!(lineno, 11),
                x => panic!("unexpected result {:?}", x),
            }
        }
    }

    #[test]
    fn quoted_commas_stay_in_their_field() {
        let line = "\"Smith, John\",\"Labour\",\"Leeds, North\",\"Aye\",\"\"";
        let votes = parse_votes(&[line], 12).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].name, "Smith, John");
        assert_eq!(votes[0].constituency, "Leeds, North");
    }

    #[test]
    fn rejects_number_line_without_digits() {
        let content = record(1, "01/02/2019", "Title", 0, 0, &[]).replacen("Division: 1", "Division: none", 1);
        assert!(matches!(
            parse_division(&content),
            Err(ParseError::MissingDivisionNumber { .. })
        ));
    }

    #[test]
    fn rejects_bad_header_values() {
        assert!(parse_division_date("Date: 31/02/2019").is_err());
        assert!(parse_division_date("Date: 2019-02-01").is_err());
        assert!(parse_count("Ayes: many", 5).is_err());
        assert_eq!(parse_count("\"Noes: 12\"", 6).unwrap(), 12);
        assert_eq!(parse_division_number("Division 2019/441").unwrap(), 2019);
    }

    #[test]
    fn rejects_truncated_record() {
        let content = "Division: 1\nDate: 01/02/2019\n\nTitle\n";
        assert!(matches!(
            parse_division(content),
            Err(ParseError::MissingLine { lineno: 5, .. })
        ));
    }

    #[test]
    fn record_without_votes() {
        let content = record(5, "01/02/2019", "Title", 0, 0, &[]);
        let d = parse_division(&content).unwrap();
        assert!(d.votes.is_empty());
        assert!(!d.passed());
    }
}

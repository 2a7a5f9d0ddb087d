// Writing figures and tables.

use std::fs;
use std::io;
use std::path::Path;

use division_network::VotingMatrix;

use crate::divisions::*;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub fn figure_to_json(figure: &Figure) -> DivnetResult<String> {
    serde_json::to_string_pretty(figure).context(SerializingJsonSnafu {})
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A standalone page that draws the figure with plotly.js.
pub fn figure_to_html(figure: &Figure) -> DivnetResult<String> {
    let js = serde_json::to_string(figure).context(SerializingJsonSnafu {})?;
    // The figure is embedded in a script element.
    let js = js.replace("</", "<\\/");
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="divnet-figure" style="width:100%;height:100vh;"></div>
<script>
var figure = {js};
Plotly.newPlot("divnet-figure", figure.data, figure.layout);
</script>
</body>
</html>
"#,
        title = escape_html(&figure.layout.title.text),
        cdn = PLOTLY_CDN,
        js = js
    ))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Writes the figure to a file, or prints its JSON when there is no path.
pub fn write_figure(figure: &Figure, out: &Option<std::path::PathBuf>) -> DivnetResult<()> {
    match out {
        None => {
            println!("{}", figure_to_json(figure)?);
        }
        Some(path) => {
            let content = if is_html(path) {
                figure_to_html(figure)?
            } else {
                figure_to_json(figure)?
            };
            fs::write(path, content).context(WritingOutputSnafu {
                path: path.display().to_string(),
            })?;
            info!("Figure written to {}", path.display());
        }
    }
    Ok(())
}

/// The matrix as CSV: a `name` column, then one column per division.
pub fn write_matrix_csv<W: io::Write>(matrix: &VotingMatrix, writer: W) -> DivnetResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = vec!["name".to_string()];
    header.extend(matrix.divisions().iter().map(|d| d.to_string()));
    wtr.write_record(&header).context(CsvSnafu {})?;
    for (name, votes) in matrix.rows() {
        let mut record: Vec<String> = Vec::with_capacity(votes.len() + 1);
        record.push(name.clone());
        record.extend(votes.iter().map(|v| v.to_string()));
        wtr.write_record(&record).context(CsvSnafu {})?;
    }
    wtr.flush().context(WritingOutputSnafu { path: "matrix" })?;
    Ok(())
}

pub fn write_matrix(matrix: &VotingMatrix, out: &Option<std::path::PathBuf>) -> DivnetResult<()> {
    match out {
        None => write_matrix_csv(matrix, io::stdout().lock()),
        Some(path) => {
            let file = fs::File::create(path).context(WritingOutputSnafu {
                path: path.display().to_string(),
            })?;
            write_matrix_csv(matrix, file)?;
            info!("Matrix written to {}", path.display());
            Ok(())
        }
    }
}

pub fn read_reference(path: &str) -> DivnetResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divisions::io_history::tests::write_records;
    use crate::divisions::io_history::read_history;
    use std::path::PathBuf;

    fn empty_figure(title: &str) -> Figure {
        let options = RenderOptions {
            title: title.to_string(),
            ..RenderOptions::default()
        };
        division_network::visualize(VoteGraph::default(), &options, &PartyColors::default())
            .unwrap()
    }

    #[test]
    fn html_page_embeds_the_figure() {
        let html = figure_to_html(&empty_figure("Votes <2022>")).unwrap();
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("<title>Votes &lt;2022&gt;</title>"));
        assert!(html.contains("Plotly.newPlot(\"divnet-figure\""));
        assert!(html.contains("\"showlegend\":false"));
    }

    #[test]
    fn output_format_follows_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let fig = empty_figure("t");
        let html_p: PathBuf = dir.path().join("figure.html");
        let json_p: PathBuf = dir.path().join("figure.json");
        write_figure(&fig, &Some(html_p.clone())).unwrap();
        write_figure(&fig, &Some(json_p.clone())).unwrap();
        assert!(fs::read_to_string(&html_p).unwrap().starts_with("<!DOCTYPE html>"));
        let back: Figure = serde_json::from_str(&fs::read_to_string(&json_p).unwrap()).unwrap();
        assert_eq!(back, fig);
    }

    #[test]
    fn matrix_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        write_records(dir.path());
        let history = read_history(dir.path(), MalformedPolicy::Abort).unwrap();
        let matrix = VotingMatrix::from_history(&history);
        let mut buf: Vec<u8> = Vec::new();
        write_matrix_csv(&matrix, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "name,1,2\nAnna,1,-1\nBob,-1,1\n"
        );
    }
}
